use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::Client;
use tracing::{debug, info};

use super::{Credentials, Session, SessionAcquirer};
use crate::api::models::LoginRequest;
use crate::domain::AppError;

const LOGIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Logs in by posting the credentials to the account login endpoint and
/// keeping whatever cookies the response sets.
pub struct PasswordLogin {
    login_url: String,
    credentials: Credentials,
}

impl PasswordLogin {
    pub fn new(login_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            login_url: login_url.into(),
            credentials,
        }
    }
}

#[async_trait]
impl SessionAcquirer for PasswordLogin {
    fn name(&self) -> &'static str {
        "password login"
    }

    async fn acquire(&self) -> Result<Session, AppError> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(LOGIN_TIMEOUT)
            .build()
            .map_err(|e| AppError::Auth(format!("failed to build HTTP client: {}", e)))?;

        debug!(url = %self.login_url, email = %self.credentials.email, "posting credentials");
        let response = client
            .post(&self.login_url)
            .json(&LoginRequest {
                username: &self.credentials.email,
                password: &self.credentials.password,
            })
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("login request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Auth(format!(
                "login endpoint returned status {}",
                status
            )));
        }

        info!("Login accepted");
        Ok(Session::from_jar(jar))
    }
}
