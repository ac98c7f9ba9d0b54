//! Runtime settings.
//!
//! Settings come from an optional YAML file; every key has a default, so an
//! empty or partial file is valid. Command-line flags are applied on top by
//! [`Settings::apply_cli`].
//!
//! ```yaml
//! data_dir: scraped_data
//! database_url: sqlite://users.db
//! bind: 127.0.0.1:8000
//! user_agent: Mozilla/5.0
//! timeout_secs: 10
//! require_auth: true
//! static_dir: static
//! password_cost: 12
//! ```

use crate::cli::{Cli, Command};
use crate::error::AppError;
use crate::fetch::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory for snapshot and combined CSV files.
    pub data_dir: PathBuf,
    /// SQLite URL of the accounts database.
    pub database_url: String,
    /// Listen address of the web server.
    pub bind: String,
    /// `User-Agent` header sent with every fetch.
    pub user_agent: String,
    /// Per-request fetch timeout in seconds.
    pub timeout_secs: u64,
    /// Whether `/scrape` needs a signed-in user.
    pub require_auth: bool,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// bcrypt cost used when hashing new passwords.
    pub password_cost: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: PathBuf::from("scraped_data"),
            database_url: "sqlite://users.db".to_string(),
            bind: "127.0.0.1:8000".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            require_auth: true,
            static_dir: PathBuf::from("static"),
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                let settings = Self::from_yaml(&raw)?;
                info!(path = %path.display(), "Loaded settings");
                Ok(settings)
            }
            None => Ok(Settings::default()),
        }
    }

    pub fn from_yaml(raw: &str) -> Result<Self, AppError> {
        if raw.trim().is_empty() {
            return Ok(Settings::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Override settings with flags given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.data_dir {
            self.data_dir = dir.clone();
        }
        if let Command::Serve {
            bind,
            database_url,
            no_auth,
        } = &cli.command
        {
            if let Some(bind) = bind {
                self.bind = bind.clone();
            }
            if let Some(url) = database_url {
                self.database_url = url.clone();
            }
            if *no_auth {
                self.require_auth = false;
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
