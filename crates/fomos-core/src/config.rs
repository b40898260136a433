use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Browser-like default so storefront search pages serve their normal markup.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    // Timeouts and concurrency limits must be finite and non-zero.
    let parse_positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        match or_default(var, default).parse::<u64>() {
            Ok(0) => Err(invalid(var, "must be greater than zero".to_string())),
            Ok(v) => Ok(v),
            Err(e) => Err(invalid(var, e.to_string())),
        }
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        match or_default(var, default).parse::<usize>() {
            Ok(0) => Err(invalid(var, "must be greater than zero".to_string())),
            Ok(v) => Ok(v),
            Err(e) => Err(invalid(var, e.to_string())),
        }
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let env = parse_environment(&or_default("FOMOS_ENV", "development"))?;

    let bind_addr = parse_addr("FOMOS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("FOMOS_LOG_LEVEL", "info");
    let sources_path = lookup("FOMOS_SOURCES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let scraper_request_timeout_secs =
        parse_positive_u64("FOMOS_SCRAPER_REQUEST_TIMEOUT_SECS", "20")?;
    let scraper_user_agent = or_default("FOMOS_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_max_retries = parse_u32("FOMOS_SCRAPER_MAX_RETRIES", "2")?;
    let scraper_retry_backoff_base_secs = parse_u64("FOMOS_SCRAPER_RETRY_BACKOFF_BASE_SECS", "1")?;
    let scraper_max_concurrent_sources =
        parse_positive_usize("FOMOS_SCRAPER_MAX_CONCURRENT_SOURCES", "3")?;
    let source_timeout_secs = parse_positive_u64("FOMOS_SOURCE_TIMEOUT_SECS", "45")?;

    let image_timeout_secs = parse_positive_u64("FOMOS_IMAGE_TIMEOUT_SECS", "10")?;
    let image_max_bytes = parse_positive_usize("FOMOS_IMAGE_MAX_BYTES", "10485760")?;
    let image_max_concurrent = parse_positive_usize("FOMOS_IMAGE_MAX_CONCURRENT", "8")?;
    let fingerprint_images = parse_bool("FOMOS_FINGERPRINT_IMAGES", "true")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        sources_path,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        scraper_max_concurrent_sources,
        source_timeout_secs,
        image_timeout_secs,
        image_max_bytes,
        image_max_concurrent,
        fingerprint_images,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FOMOS_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
