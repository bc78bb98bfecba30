use serde::{Deserialize, Deserializer};

use crate::ConfigError;

pub(crate) const DEFAULT_GRAPHQL_ENDPOINT: &str = "/graphql";
pub(crate) const DEFAULT_CURRENCY_CODE: &str = "USD";
pub(crate) const DEFAULT_USER_AGENT: &str = "installbook/0.1 (installation-booking)";
pub(crate) const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_CART_DELAY_MS: u64 = 500;
pub(crate) const DEFAULT_LEAD_DAYS: u32 = 3;

/// Deployment mode injected by the storefront as a plain string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Production,
    Test,
    #[default]
    Development,
    Local,
}

impl Environment {
    /// Parses the injected mode string.
    ///
    /// Unrecognized modes fall back to [`Environment::Development`] with a
    /// warning.
    #[must_use]
    pub fn from_mode(mode: &str) -> Self {
        match mode.trim().to_ascii_lowercase().as_str() {
            "production" => Environment::Production,
            "test" => Environment::Test,
            "development" => Environment::Development,
            "local" => Environment::Local,
            other => {
                tracing::warn!(mode = other, "unknown mode; falling back to development");
                Environment::Development
            }
        }
    }

    /// Placeholder base URL of the installer/vehicle API for this mode.
    ///
    /// Real deployments set `api_base_url`.
    #[must_use]
    pub fn default_api_base_url(self) -> &'static str {
        match self {
            Environment::Production => "https://installer-api.example.com",
            Environment::Test => "https://installer-api.test.example.com",
            Environment::Development => "https://installer-api.dev.example.com",
            Environment::Local => "http://127.0.0.1:8000",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Local => write!(f, "local"),
        }
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Environment::from_mode(&raw))
    }
}

/// Display-name keywords configured by the merchant, one per booking field.
///
/// Each value is matched case-insensitively as a substring of a product
/// option's display name. Unset fields fall back to the built-in keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PhfMapping {
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default, alias = "memberId")]
    pub member_id: Option<String>,
    #[serde(default, alias = "zip")]
    pub zipcode: Option<String>,
}

/// Configuration for one booking widget instance.
///
/// Built once by the host (from the injected storefront object or from the
/// environment) and passed into every client and the flow controller.
#[derive(Clone, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub token: String,
    /// GraphQL endpoint; relative paths resolve against `store_url`.
    #[serde(default = "default_graphql_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub mode: Environment,
    /// Entity id of the main product, used when checking out without installation.
    #[serde(default, alias = "productId", deserialize_with = "string_or_number")]
    pub product_id_th: String,
    #[serde(default, alias = "productSku")]
    pub product_sku: String,
    #[serde(default = "default_currency_code", alias = "currencyCode")]
    pub currency_code: String,
    #[serde(
        default,
        rename = "programId",
        alias = "program_id",
        deserialize_with = "string_or_number"
    )]
    pub program_id: String,
    #[serde(default)]
    pub phf_mapping: PhfMapping,
    /// SKU or entity id of the related product sold as the installation line item.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub variant_product: Option<String>,
    #[serde(default)]
    pub store_logo: Option<String>,
    /// Overrides the mode's default installer API base URL.
    #[serde(default, alias = "apiBaseUrl")]
    pub api_base_url: Option<String>,
    /// Storefront origin that hosts `cart.php`.
    #[serde(default, alias = "storeUrl")]
    pub store_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Pause between consecutive cart submissions.
    #[serde(default = "default_cart_delay_ms")]
    pub cart_delay_ms: u64,
    /// First bookable appointment is this many days after today.
    #[serde(default = "default_lead_days")]
    pub lead_days: u32,
}

impl WidgetConfig {
    /// Parses the storefront-injected configuration object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidJson`] if the payload is malformed, or any
    /// error from [`WidgetConfig::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: WidgetConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the fields every booking needs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when `store_url` or `product_sku`
    /// is empty, and [`ConfigError::InvalidUrl`] when a URL field is not an
    /// absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_url.trim().is_empty() {
            return Err(ConfigError::MissingField("store_url"));
        }
        if self.product_sku.trim().is_empty() {
            return Err(ConfigError::MissingField("product_sku"));
        }
        ensure_absolute("store_url", &self.store_url)?;
        if let Some(base) = &self.api_base_url {
            ensure_absolute("api_base_url", base)?;
        }
        Ok(())
    }

    /// Installer/vehicle API base URL: the explicit override, else the mode default.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or_else(|| self.mode.default_api_base_url())
    }

    /// Absolute GraphQL URL.
    #[must_use]
    pub fn graphql_url(&self) -> String {
        if is_absolute(&self.endpoint) {
            self.endpoint.clone()
        } else {
            format!(
                "{}/{}",
                self.store_url.trim_end_matches('/'),
                self.endpoint.trim_start_matches('/')
            )
        }
    }
}

impl std::fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("token", &"[redacted]")
            .field("endpoint", &self.endpoint)
            .field("mode", &self.mode)
            .field("product_id_th", &self.product_id_th)
            .field("product_sku", &self.product_sku)
            .field("currency_code", &self.currency_code)
            .field("program_id", &self.program_id)
            .field("phf_mapping", &self.phf_mapping)
            .field("variant_product", &self.variant_product)
            .field("store_logo", &self.store_logo)
            .field("api_base_url", &self.api_base_url)
            .field("store_url", &self.store_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("cart_delay_ms", &self.cart_delay_ms)
            .field("lead_days", &self.lead_days)
            .finish()
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn ensure_absolute(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if is_absolute(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}

fn default_graphql_endpoint() -> String {
    DEFAULT_GRAPHQL_ENDPOINT.to_string()
}

fn default_currency_code() -> String {
    DEFAULT_CURRENCY_CODE.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_cart_delay_ms() -> u64 {
    DEFAULT_CART_DELAY_MS
}

fn default_lead_days() -> u32 {
    DEFAULT_LEAD_DAYS
}

/// Storefront templates emit ids as either JSON strings or numbers.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(optional_string_or_number(deserializer)?.unwrap_or_default())
}

fn optional_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
