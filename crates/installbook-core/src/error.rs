use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid widget config JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("missing required config field: {0}")]
    MissingField(&'static str),

    #[error("config field {field} is not an absolute http(s) URL: \"{value}\"")]
    InvalidUrl { field: &'static str, value: String },
}
