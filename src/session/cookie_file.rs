use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use super::{Session, SessionAcquirer, SessionCookie};
use crate::domain::AppError;

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

/// Reuses a session exported from a browser in Netscape `cookies.txt` format.
pub struct CookieFile {
    path: PathBuf,
}

impl CookieFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parse the tab-separated Netscape format:
/// `domain  include_subdomains  path  secure  expiry  name  value`.
pub fn parse_netscape_cookies(contents: &str) -> Vec<SessionCookie> {
    contents
        .lines()
        .filter_map(|line| {
            let line = line.trim_end_matches('\r');
            let line = match line.strip_prefix(HTTP_ONLY_PREFIX) {
                Some(rest) => rest,
                None if line.starts_with('#') || line.trim().is_empty() => return None,
                None => line,
            };

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 7 {
                return None;
            }

            let mut domain = fields[0].to_string();
            if fields[1].eq_ignore_ascii_case("TRUE") && !domain.starts_with('.') {
                domain.insert(0, '.');
            }

            Some(SessionCookie {
                name: fields[5].to_string(),
                value: fields[6].to_string(),
                domain,
                path: Some(fields[2].to_string()),
            })
        })
        .collect()
}

#[async_trait]
impl SessionAcquirer for CookieFile {
    fn name(&self) -> &'static str {
        "cookie file"
    }

    async fn acquire(&self) -> Result<Session, AppError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::Auth(format!(
                "cannot read cookie file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let cookies = parse_netscape_cookies(&contents);
        if cookies.is_empty() {
            return Err(AppError::Auth(format!(
                "no cookies found in {}",
                self.path.display()
            )));
        }

        info!(
            "Loaded {} cookies from {}",
            cookies.len(),
            self.path.display()
        );
        Session::from_cookies(&cookies)
    }
}
