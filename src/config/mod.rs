use crate::constants::{self, env_vars};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Where the team directory comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSource {
    /// The canonical franchise list compiled into the binary
    #[default]
    Bundled,
    /// The provider's `teams` endpoint. The default provider does not serve
    /// one, so this needs an `api_domain` pointing at a provider that does.
    Remote,
}

impl fmt::Display for TeamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSource::Bundled => write!(f, "bundled"),
            TeamSource::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for TeamSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bundled" => Ok(TeamSource::Bundled),
            "remote" => Ok(TeamSource::Remote),
            other => Err(AppError::config_error(format!(
                "Unknown team source '{other}', expected 'bundled' or 'remote'"
            ))),
        }
    }
}

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the stats provider.
    #[serde(default = "default_api_domain")]
    pub api_domain: String,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for API requests.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Retries for transient HTTP failures (429, 5xx, timeouts).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Team game logs fetched in parallel while aggregating a season.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
    /// Entry bound of each memo cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default)]
    pub team_source: TeamSource,
}

fn default_api_domain() -> String {
    constants::DEFAULT_API_DOMAIN.to_string()
}

fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_max_retries() -> u32 {
    constants::retry::MAX_RETRIES
}

fn default_fetch_concurrency() -> usize {
    constants::DEFAULT_FETCH_CONCURRENCY
}

fn default_cache_capacity() -> usize {
    constants::DEFAULT_CACHE_CAPACITY
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_domain: default_api_domain(),
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            max_retries: default_max_retries(),
            fetch_concurrency: default_fetch_concurrency(),
            cache_capacity: default_cache_capacity(),
            team_source: TeamSource::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location, falling back
    /// to defaults when no file exists. Environment variables override values
    /// from the file.
    ///
    /// # Environment Variables
    /// - `COURT_API_DOMAIN` - Override API domain
    /// - `COURT_LOG_FILE` - Override log file path
    /// - `COURT_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    /// - `COURT_FETCH_CONCURRENCY` - Override season aggregation concurrency
    /// - `COURT_TEAM_SOURCE` - `bundled` or `remote`
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            debug!("No config file at {config_path}, using defaults");
            Config::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Applies `COURT_*` environment variable overrides in place.
    pub fn apply_env_overrides(&mut self) -> Result<(), AppError> {
        if let Ok(api_domain) = std::env::var(env_vars::API_DOMAIN) {
            self.api_domain = api_domain;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Ok(raw) = std::env::var(env_vars::HTTP_TIMEOUT) {
            match raw.parse::<u64>() {
                Ok(timeout) => self.http_timeout_seconds = timeout,
                Err(_) => warn!("Ignoring non-numeric {}={raw}", env_vars::HTTP_TIMEOUT),
            }
        }

        if let Ok(raw) = std::env::var(env_vars::FETCH_CONCURRENCY) {
            match raw.parse::<usize>() {
                Ok(concurrency) => self.fetch_concurrency = concurrency,
                Err(_) => warn!("Ignoring non-numeric {}={raw}", env_vars::FETCH_CONCURRENCY),
            }
        }

        if let Ok(raw) = std::env::var(env_vars::TEAM_SOURCE) {
            self.team_source = raw.parse()?;
        }

        Ok(())
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Base URL with a scheme and without a trailing slash.
    pub fn normalized_api_domain(&self) -> String {
        normalize_api_domain(&self.api_domain)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let exists = Path::new(&config_path).exists();

        let config = Config::load().await?;
        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        if exists {
            println!("{config_path}");
        } else {
            println!("{config_path} (not created, using defaults)");
        }
        println!("────────────────────────────────────");
        println!("API Domain:");
        println!("{}", config.api_domain);
        println!("────────────────────────────────────");
        println!("HTTP Timeout / Retries:");
        println!(
            "{} seconds / {} retries",
            config.http_timeout_seconds, config.max_retries
        );
        println!("────────────────────────────────────");
        println!("Fetch Concurrency / Cache Capacity:");
        println!("{} / {}", config.fetch_concurrency, config.cache_capacity);
        println!("────────────────────────────────────");
        println!("Team Source:");
        println!("{}", config.team_source);
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/court_standings.log");
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist and normalizes the
    /// API domain before writing.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }

        let content = toml::to_string_pretty(&Config {
            api_domain: self.normalized_api_domain(),
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without env overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Adds `https://` when no scheme is present and drops trailing slashes.
/// An explicit `http://` is kept so local providers keep working.
pub fn normalize_api_domain(api_domain: &str) -> String {
    let trimmed = api_domain.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
