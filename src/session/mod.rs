//! Session acquisition.
//!
//! Logging in is treated as an external collaborator: whatever performs it,
//! the result is a cookie jar that a plain HTTP client can reuse against the
//! same origin. Three sources are provided:
//! - [`PasswordLogin`] posts the credentials to the login endpoint
//! - [`LoginHelper`] delegates to an external program (e.g. a browser script)
//! - [`CookieFile`] imports a Netscape `cookies.txt` export

mod cookie_file;
mod helper;
mod password;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use serde::Deserialize;
use url::Url;

use crate::domain::AppError;

pub use cookie_file::{parse_netscape_cookies, CookieFile};
pub use helper::LoginHelper;
pub use password::PasswordLogin;

#[async_trait]
pub trait SessionAcquirer: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &'static str;

    async fn acquire(&self) -> Result<Session, AppError>;
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A cookie as reported by browser tooling (name, value, domain and optional path).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default)]
    pub path: Option<String>,
}

/// Authenticated cookie state shared with every request of the run.
#[derive(Clone, Default)]
pub struct Session {
    jar: Arc<Jar>,
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_jar(jar: Arc<Jar>) -> Self {
        Self { jar }
    }

    /// Domain cookies (leading dot) apply to every subdomain; others are host-only.
    pub fn from_cookies(cookies: &[SessionCookie]) -> Result<Self, AppError> {
        let jar = Jar::default();

        for cookie in cookies {
            let host = cookie.domain.trim_start_matches('.');
            let origin = Url::parse(&format!("https://{}/", host)).map_err(|e| {
                AppError::Auth(format!("invalid cookie domain {:?}: {}", cookie.domain, e))
            })?;

            let mut header = format!(
                "{}={}; Path={}",
                cookie.name,
                cookie.value,
                cookie.path.as_deref().unwrap_or("/")
            );
            if cookie.domain.starts_with('.') {
                header.push_str("; Domain=");
                header.push_str(host);
            }
            jar.add_cookie_str(&header, &origin);
        }

        Ok(Self { jar: Arc::new(jar) })
    }

    pub fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }
}
