use crate::constants::{DEFAULT_API_DOMAIN, MAX_FETCH_CONCURRENCY};
use crate::error::AppError;
use std::path::Path;

use super::{Config, TeamSource, normalize_api_domain};

/// Validates the configuration settings
///
/// # Validation Rules
/// - API domain cannot be empty and must look like a URL or domain name
/// - If log file path is provided, it cannot be empty and its parent directory
///   must exist or be creatable
/// - HTTP timeout must be positive
/// - Fetch concurrency must be between 1 and `MAX_FETCH_CONCURRENCY`
/// - Cache capacity must be positive
/// - A remote team directory needs a provider other than the default one,
///   which has no `teams` endpoint
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    validate_api_domain(&config.api_domain)?;
    validate_log_file_path(&config.log_file_path)?;

    if config.team_source == TeamSource::Remote
        && normalize_api_domain(&config.api_domain) == DEFAULT_API_DOMAIN
    {
        return Err(AppError::config_error(format!(
            "Team source 'remote' needs an API domain serving /teams; {DEFAULT_API_DOMAIN} does not"
        )));
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error("HTTP timeout must be at least 1 second"));
    }

    if config.fetch_concurrency == 0 || config.fetch_concurrency > MAX_FETCH_CONCURRENCY {
        return Err(AppError::config_error(format!(
            "Fetch concurrency must be between 1 and {MAX_FETCH_CONCURRENCY}, got {}",
            config.fetch_concurrency
        )));
    }

    if config.cache_capacity == 0 {
        return Err(AppError::config_error("Cache capacity must be at least 1"));
    }

    Ok(())
}

fn validate_api_domain(api_domain: &str) -> Result<(), AppError> {
    if api_domain.is_empty() {
        return Err(AppError::config_error("API domain cannot be empty"));
    }

    if !api_domain.starts_with("http://") && !api_domain.starts_with("https://") {
        // Without a protocol it should at least look like a domain
        if !api_domain.contains('.') && !api_domain.starts_with("localhost") {
            return Err(AppError::config_error(
                "API domain must be a valid URL or domain name",
            ));
        }
    }

    Ok(())
}

fn validate_log_file_path(log_file_path: &Option<String>) -> Result<(), AppError> {
    if let Some(log_path) = log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
