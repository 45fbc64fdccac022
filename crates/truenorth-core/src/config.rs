use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Every setting has a default, so an empty environment yields a usable
/// development config.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        parse_value(var, &or_default(var, default))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        parse_value(var, &or_default(var, default))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        parse_value(var, &or_default(var, default))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        parse_value(var, &or_default(var, default))
    };

    let parse_amount = |var: &str, default: &str| -> Result<Decimal, ConfigError> {
        let value: Decimal = parse_value(var, &or_default(var, default))?;
        if value.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("must not be negative, got {value}"),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("TRUENORTH_ENV", "development"))?;

    let bind_addr = parse("TRUENORTH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("TRUENORTH_LOG_LEVEL", "info");
    let catalog_path = lookup("TRUENORTH_CATALOG_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let cart_path = PathBuf::from(or_default("TRUENORTH_CART_PATH", "./.truenorth-cart.json"));

    let shipping_flat_rate = parse_amount("TRUENORTH_SHIPPING_FLAT_RATE", "5000")?;
    let free_shipping_threshold = parse_amount("TRUENORTH_FREE_SHIPPING_THRESHOLD", "50000")?;
    let vat_rate = parse_amount("TRUENORTH_VAT_RATE", "0.075")?;
    if vat_rate > Decimal::ONE {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRUENORTH_VAT_RATE".to_string(),
            reason: format!("must be a fraction between 0 and 1, got {vat_rate}"),
        });
    }

    let low_stock_threshold = parse_u32("TRUENORTH_LOW_STOCK_THRESHOLD", "5")?;
    let rate_limit_max_requests = parse_usize("TRUENORTH_RATE_LIMIT_MAX_REQUESTS", "120")?;
    let rate_limit_window_secs = parse_u64("TRUENORTH_RATE_LIMIT_WINDOW_SECS", "60")?;
    let cart_idle_ttl_secs = parse_u64("TRUENORTH_CART_IDLE_TTL_SECS", "86400")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_path,
        cart_path,
        shipping_flat_rate,
        free_shipping_threshold,
        vat_rate,
        low_stock_threshold,
        rate_limit_max_requests,
        rate_limit_window_secs,
        cart_idle_ttl_secs,
    })
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TRUENORTH_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
