use crate::app_config::{
    Environment, PhfMapping, WidgetConfig, DEFAULT_CART_DELAY_MS, DEFAULT_CURRENCY_CODE,
    DEFAULT_GRAPHQL_ENDPOINT, DEFAULT_LEAD_DAYS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::ConfigError;

/// Load widget configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_widget_config() -> Result<WidgetConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_widget_config_from_env()
}

/// Load widget configuration from environment variables already in the process.
///
/// Unlike [`load_widget_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_widget_config_from_env() -> Result<WidgetConfig, ConfigError> {
    build_widget_config(|key| std::env::var(key))
}

/// Build widget configuration using the provided env-var lookup function.
fn build_widget_config<F>(lookup: F) -> Result<WidgetConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match optional(var) {
            None => Ok(default),
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        }
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        match optional(var) {
            None => Ok(default),
            Some(raw) => raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        }
    };

    let store_url = require("INSTALLBOOK_STORE_URL")?;
    let product_sku = require("INSTALLBOOK_PRODUCT_SKU")?;

    let phf_mapping = match optional("INSTALLBOOK_PHF_MAPPING") {
        None => PhfMapping::default(),
        Some(raw) => {
            serde_json::from_str::<PhfMapping>(&raw).map_err(|e| ConfigError::InvalidEnvVar {
                var: "INSTALLBOOK_PHF_MAPPING".to_string(),
                reason: e.to_string(),
            })?
        }
    };

    let config = WidgetConfig {
        token: or_default("INSTALLBOOK_TOKEN", ""),
        endpoint: or_default("INSTALLBOOK_GRAPHQL_ENDPOINT", DEFAULT_GRAPHQL_ENDPOINT),
        mode: Environment::from_mode(&or_default("INSTALLBOOK_MODE", "development")),
        product_id_th: or_default("INSTALLBOOK_PRODUCT_ID", ""),
        product_sku,
        currency_code: or_default("INSTALLBOOK_CURRENCY_CODE", DEFAULT_CURRENCY_CODE),
        program_id: or_default("INSTALLBOOK_PROGRAM_ID", ""),
        phf_mapping,
        variant_product: optional("INSTALLBOOK_VARIANT_PRODUCT"),
        store_logo: optional("INSTALLBOOK_STORE_LOGO"),
        api_base_url: optional("INSTALLBOOK_API_BASE_URL"),
        store_url,
        request_timeout_secs: parse_u64(
            "INSTALLBOOK_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?,
        user_agent: or_default("INSTALLBOOK_USER_AGENT", DEFAULT_USER_AGENT),
        cart_delay_ms: parse_u64("INSTALLBOOK_CART_DELAY_MS", DEFAULT_CART_DELAY_MS)?,
        lead_days: parse_u32("INSTALLBOOK_LEAD_DAYS", DEFAULT_LEAD_DAYS)?,
    };

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
