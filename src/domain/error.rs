use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("No videos found in the account")]
    EmptyCatalog,

    #[error("API error: {0}")]
    Api(String),

    #[error("No video files available")]
    NoFiles,

    #[error("No downloadable URL found")]
    NoDownloadUrl,

    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    /// Fatal errors abort the whole run; everything else only fails one unit of work.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Auth(_) | AppError::EmptyCatalog | AppError::Io(_))
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_fatal() {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(AppError::Auth("bad password".into()).is_fatal());
        assert!(AppError::EmptyCatalog.is_fatal());
        assert!(AppError::Io("read-only".into()).is_fatal());

        assert!(!AppError::NoFiles.is_fatal());
        assert!(!AppError::NoDownloadUrl.is_fatal());
        assert!(!AppError::Api("status 500".into()).is_fatal());
        assert!(!AppError::Transfer("connection reset".into()).is_fatal());
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(AppError::EmptyCatalog.exit_code(), 1);
        assert_eq!(AppError::Auth("expired".into()).exit_code(), 1);
        assert_eq!(AppError::NoFiles.exit_code(), 0);
    }
}
