use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup, no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let shop_domain = require("WHEELFIT_SHOP_DOMAIN")?;
    let admin_token = require("WHEELFIT_ADMIN_TOKEN")?;

    let env = parse_environment(&or_default("WHEELFIT_ENV", "development"));

    let bind_addr = parse_addr("WHEELFIT_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("WHEELFIT_LOG_LEVEL", "info");
    let user_agent = or_default("WHEELFIT_USER_AGENT", "wheelfit/0.1 (fitment-relay)");

    let request_timeout_secs = parse_u64("WHEELFIT_REQUEST_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("WHEELFIT_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("WHEELFIT_RETRY_BACKOFF_BASE_SECS", "2")?;
    let page_limit = parse_u32("WHEELFIT_PAGE_LIMIT", "250")?;

    Ok(AppConfig {
        shop_domain,
        admin_token,
        env,
        bind_addr,
        log_level,
        user_agent,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_secs,
        page_limit,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
