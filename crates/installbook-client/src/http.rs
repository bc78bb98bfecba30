//! Shared `reqwest` plumbing for the installer, catalog, and cart clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};

use crate::error::ClientError;

pub(crate) fn build_client(
    timeout_secs: u64,
    user_agent: &str,
    cookie_store: bool,
) -> Result<Client, ClientError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .cookie_store(cookie_store)
        .build()?;
    Ok(client)
}

/// Validates `base_url` and returns it without a trailing slash so paths can
/// be appended with `format!("{base}/path")`.
pub(crate) fn normalize_base_url(base_url: &str) -> Result<String, ClientError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    Url::parse(trimmed).map_err(|e| ClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(trimmed.to_string())
}

/// Attaches `Authorization: Bearer <token>` when a token is configured.
pub(crate) fn with_bearer(request: RequestBuilder, token: &str) -> RequestBuilder {
    if token.is_empty() {
        request
    } else {
        request.bearer_auth(token)
    }
}

/// Sends `request`, maps non-2xx statuses to typed errors, and parses the body
/// as JSON.
///
/// An empty body is returned as `Value::Null` so callers can coerce it to an
/// empty result instead of failing.
pub(crate) async fn send_json(
    request: RequestBuilder,
    url: &str,
    context: &str,
) -> Result<serde_json::Value, ClientError> {
    let response = request.send().await?;
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound {
            url: url.to_string(),
        });
    }

    if !status.is_success() {
        return Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}
