use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{Credentials, Session, SessionAcquirer, SessionCookie};
use crate::domain::AppError;

/// Delegates login to an external program, typically a browser-automation
/// script.
///
/// The program is invoked as `<program> --email <email> --headless` (or
/// `--no-headless`), receives the password on stdin and must print a JSON
/// array of `{name, value, domain, path?}` cookies on stdout.
pub struct LoginHelper {
    program: PathBuf,
    credentials: Credentials,
    headless: bool,
}

impl LoginHelper {
    pub fn new(program: impl Into<PathBuf>, credentials: Credentials, headless: bool) -> Self {
        Self {
            program: program.into(),
            credentials,
            headless,
        }
    }
}

pub(crate) fn parse_helper_output(stdout: &[u8]) -> Result<Vec<SessionCookie>, AppError> {
    let cookies: Vec<SessionCookie> = serde_json::from_slice(stdout)
        .map_err(|e| AppError::Auth(format!("login helper printed invalid cookies: {}", e)))?;

    if cookies.is_empty() {
        return Err(AppError::Auth("login helper returned no cookies".to_string()));
    }
    Ok(cookies)
}

#[async_trait]
impl SessionAcquirer for LoginHelper {
    fn name(&self) -> &'static str {
        "login helper"
    }

    async fn acquire(&self) -> Result<Session, AppError> {
        let mode = if self.headless { "--headless" } else { "--no-headless" };
        debug!(program = %self.program.display(), mode, "spawning login helper");

        let mut child = Command::new(&self.program)
            .arg("--email")
            .arg(&self.credentials.email)
            .arg(mode)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                AppError::Auth(format!(
                    "failed to start login helper {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let line = format!("{}\n", self.credentials.password);
            if let Err(e) = stdin.write_all(line.as_bytes()).await {
                warn!("could not pass password to login helper: {}", e);
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| AppError::Auth(format!("login helper failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Auth(format!(
                "login helper exited with {}: {}",
                output.status,
                stderr.lines().last().unwrap_or("no output")
            )));
        }

        let cookies = parse_helper_output(&output.stdout)?;
        info!("Login helper returned {} cookies", cookies.len());
        Session::from_cookies(&cookies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_helper_output() {
        let stdout = br#"[
            {"name": "session", "value": "abc", "domain": ".streamable.com", "path": "/",
             "expires": 1893456000, "httpOnly": true, "secure": true, "sameSite": "Lax"},
            {"name": "csrftoken", "value": "xyz", "domain": "streamable.com"}
        ]"#;
        let cookies = parse_helper_output(stdout).unwrap();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].path.as_deref(), Some("/"));
        assert_eq!(cookies[1].path, None);
    }

    #[test]
    fn test_parse_helper_output_rejects_empty_and_garbage() {
        assert!(matches!(parse_helper_output(b"[]"), Err(AppError::Auth(_))));
        assert!(matches!(
            parse_helper_output(b"Login failed"),
            Err(AppError::Auth(_))
        ));
    }

    #[cfg(unix)]
    fn write_script(dir: &std::path::Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("login-helper.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "me@example.com".into(),
            password: "hunter2".into(),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_helper_receives_flags_and_password() {
        use reqwest::cookie::CookieStore;

        let dir = tempfile::tempdir().unwrap();
        let script = write_script(
            dir.path(),
            r#"read pw
[ "$1" = "--email" ] || exit 2
[ "$2" = "me@example.com" ] || exit 3
[ "$3" = "--no-headless" ] || exit 4
[ "$pw" = "hunter2" ] || exit 5
echo '[{"name":"session","value":"abc","domain":".streamable.com","path":"/"}]'
"#,
        );

        let helper = LoginHelper::new(script, credentials(), false);
        let session = helper.acquire().await.unwrap();

        let url = url::Url::parse("https://api.streamable.com/videos/x").unwrap();
        let header = session.jar().cookies(&url).unwrap();
        assert_eq!(header.to_str().unwrap(), "session=abc");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_helper_failure_is_auth_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "echo 'still on login page' >&2\nexit 1\n");

        let helper = LoginHelper::new(script, credentials(), true);
        let err = helper.acquire().await.err().unwrap();
        match err {
            AppError::Auth(msg) => assert!(msg.contains("still on login page")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_helper_program() {
        let helper = LoginHelper::new("/nonexistent/login-helper", credentials(), true);
        assert!(matches!(helper.acquire().await, Err(AppError::Auth(_))));
    }
}
