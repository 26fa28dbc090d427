use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_SAFETY_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_USER_AGENT: &str = "tourplan/0.1 (itinerary-sync)";

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
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("TOURPLAN_ENV", "development"))?;
    let log_level = or_default("TOURPLAN_LOG_LEVEL", "info");

    // Production must point at a real deployment, never the local default.
    let safety_api_url = if env == Environment::Production {
        require("TOURPLAN_SAFETY_API_URL")?
    } else {
        or_default("TOURPLAN_SAFETY_API_URL", DEFAULT_SAFETY_API_URL)
    };
    if !(safety_api_url.starts_with("http://") || safety_api_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "TOURPLAN_SAFETY_API_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{safety_api_url}'"),
        });
    }
    let safety_api_token = lookup("TOURPLAN_SAFETY_API_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());

    let request_timeout_secs = parse_u64("TOURPLAN_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TOURPLAN_USER_AGENT", DEFAULT_USER_AGENT);
    let saved_flash_ms = parse_u64("TOURPLAN_SAVED_FLASH_MS", "2000")?;

    Ok(AppConfig {
        env,
        log_level,
        safety_api_url,
        safety_api_token,
        request_timeout_secs,
        user_agent,
        saved_flash_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TOURPLAN_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
