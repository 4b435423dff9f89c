use crate::app_config::AppConfig;
use crate::keywords::{load_keywords_file, KeywordSet};
use crate::ConfigError;

/// Default SQLite location, relative to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://tweets.db";

const MIN_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let bearer_token = require("TWITTER_BEARER_TOKEN")?;
    let database_url = or_default("SNSPULSE_DATABASE_URL", DEFAULT_DATABASE_URL);

    let keywords = match lookup("SNSPULSE_KEYWORDS") {
        Ok(raw) => KeywordSet::from_csv(&raw)?,
        Err(_) => {
            let path = PathBuf::from(or_default(
                "SNSPULSE_KEYWORDS_PATH",
                "./config/keywords.yaml",
            ));
            load_keywords_file(&path)?
        }
    };

    let page_size = parse_u32("SNSPULSE_PAGE_SIZE", "10")?;
    if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(ConfigError::InvalidEnvVar {
            var: "SNSPULSE_PAGE_SIZE".to_string(),
            reason: format!("must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}, got {page_size}"),
        });
    }

    let poll_interval_secs = parse_u64("SNSPULSE_POLL_INTERVAL_SECS", "60")?;
    let rate_limit_cooldown_secs = parse_u64("SNSPULSE_RATE_LIMIT_COOLDOWN_SECS", "900")?;
    let request_timeout_secs = parse_u64("SNSPULSE_REQUEST_TIMEOUT_SECS", "30")?;

    let search_base_url = or_default("SNSPULSE_SEARCH_BASE_URL", "https://api.twitter.com/");
    let query_filter = or_default("SNSPULSE_QUERY_FILTER", "lang:en -is:retweet");
    let user_agent = or_default("SNSPULSE_USER_AGENT", "snspulse/0.1 (sentiment-ingest)");
    let log_level = or_default("SNSPULSE_LOG_LEVEL", "info");
    let log_dir = PathBuf::from(or_default("SNSPULSE_LOG_DIR", "./logs"));

    let db_max_connections = parse_u32("SNSPULSE_DB_MAX_CONNECTIONS", "4")?;
    if db_max_connections == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SNSPULSE_DB_MAX_CONNECTIONS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let db_acquire_timeout_secs = parse_u64("SNSPULSE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        bearer_token,
        database_url,
        keywords,
        page_size,
        poll_interval_secs,
        rate_limit_cooldown_secs,
        request_timeout_secs,
        search_base_url,
        query_filter,
        user_agent,
        log_level,
        log_dir,
        db_max_connections,
        db_acquire_timeout_secs,
    })
}
