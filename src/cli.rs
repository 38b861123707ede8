use std::path::{Path, PathBuf};

use clap::Parser;

use crate::api::ApiConfig;
use crate::application::RunConfig;
use crate::domain::AppError;
use crate::session::{CookieFile, Credentials, LoginHelper, PasswordLogin, SessionAcquirer};

const EXAMPLES: &str = "\
Examples:
  streamable-dl --email user@example.com --password mypassword
  streamable-dl --email user@example.com --password mypassword -o ~/Videos/Streamable
  streamable-dl --email user@example.com --password mypassword --login-helper ./login.py --no-headless
  streamable-dl --cookies ~/cookies.txt";

#[derive(Parser, Debug)]
#[command(
    name = "streamable-dl",
    version,
    about = "Download all videos from your Streamable account",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Streamable email or username
    #[arg(short, long, env = "STREAMABLE_EMAIL", required_unless_present = "cookies")]
    pub email: Option<String>,

    /// Streamable password
    #[arg(
        short,
        long,
        env = "STREAMABLE_PASSWORD",
        hide_env_values = true,
        required_unless_present = "cookies"
    )]
    pub password: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = "./streamable_videos")]
    pub output: PathBuf,

    /// Run the login helper's browser headless (default)
    #[arg(long, overrides_with = "no_headless")]
    pub headless: bool,

    /// Show the login helper's browser window (useful for debugging)
    #[arg(long, overrides_with = "headless")]
    pub no_headless: bool,

    /// Reuse a browser session exported as a Netscape cookies.txt file
    #[arg(long, value_name = "FILE", conflicts_with = "login_helper")]
    pub cookies: Option<PathBuf>,

    /// External program that performs the login and prints the session cookies as JSON
    #[arg(long, value_name = "PROGRAM")]
    pub login_helper: Option<PathBuf>,

    /// Videos requested per catalog page
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: u32,
}

impl Cli {
    pub fn headless(&self) -> bool {
        !self.no_headless
    }

    fn credentials(&self) -> Result<Credentials, AppError> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Ok(Credentials {
                email: email.clone(),
                password: password.clone(),
            }),
            _ => Err(AppError::Auth("email and password are required".to_string())),
        }
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            api: ApiConfig {
                page_size: self.page_size,
                ..ApiConfig::default()
            },
            output_dir: expand_home(&self.output),
        }
    }

    pub fn acquirer(&self, api: &ApiConfig) -> Result<Box<dyn SessionAcquirer>, AppError> {
        if let Some(path) = &self.cookies {
            return Ok(Box::new(CookieFile::new(expand_home(path))));
        }

        let credentials = self.credentials()?;
        match &self.login_helper {
            Some(program) => Ok(Box::new(LoginHelper::new(
                expand_home(program),
                credentials,
                self.headless(),
            ))),
            None => Ok(Box::new(PasswordLogin::new(
                api.login_url.clone(),
                credentials,
            ))),
        }
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}
