//! Platform cart submission through `cart.php`.
//!
//! The storefront cart accepts a URL-encoded `action=add` request with one
//! `attribute[<option entity id>]=<value>` pair per product option. Brackets
//! in the attribute keys are sent literally; values are percent-encoded.

use installbook_core::{AttributeMapping, WidgetConfig};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;

use crate::error::ClientError;
use crate::http::{build_client, normalize_base_url};

/// Characters left unescaped in query values (RFC 3986 unreserved set).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Booking context attached to a cart request for logging and receipts.
///
/// Not sent to the platform; the cart only understands option attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartMetadata {
    pub booking_id: Option<String>,
    pub zipcode: Option<String>,
    pub member_id: Option<String>,
    pub vehicle: Option<String>,
    pub appointment: Option<String>,
}

/// One `cart.php?action=add` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRequest {
    pub product_id: String,
    pub attributes: AttributeMapping,
    /// Entity id of the installation line item this product is booked with.
    pub installation_id: Option<String>,
    pub metadata: Option<CartMetadata>,
}

/// Builds a cart request for `product_id` with the mapped option values.
#[must_use]
pub fn build_cart_request(
    product_id: impl Into<String>,
    options: AttributeMapping,
    installation_id: Option<String>,
    metadata: Option<CartMetadata>,
) -> CartRequest {
    CartRequest {
        product_id: product_id.into(),
        attributes: options,
        installation_id: installation_id.filter(|id| !id.trim().is_empty()),
        metadata,
    }
}

impl CartRequest {
    /// Serializes the query string.
    ///
    /// `action` and `product_id` come first, then one pair per non-empty
    /// attribute in mapping order, then the installation link if present.
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut pairs = vec![
            "action=add".to_string(),
            format!("product_id={}", encode(&self.product_id)),
        ];
        for (id, value) in self.attributes.filled() {
            pairs.push(format!("attribute[{}]={}", encode(id), encode(value)));
        }
        if let Some(installation_id) = &self.installation_id {
            pairs.push(format!("installation_id={}", encode(installation_id)));
        }
        pairs.join("&")
    }

    /// Storefront-relative cart URL, e.g. `/cart.php?action=add&product_id=219`.
    #[must_use]
    pub fn to_path(&self) -> String {
        format!("/cart.php?{}", self.to_query())
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Client that posts cart requests to the storefront.
///
/// Keeps a cookie store so consecutive additions land in the same cart
/// session.
pub struct CartClient {
    client: Client,
    store_url: String,
}

impl CartClient {
    /// Creates a client for `config.store_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if the store URL does not
    /// parse, or [`ClientError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(config: &WidgetConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_client(config.request_timeout_secs, &config.user_agent, true)?,
            store_url: normalize_base_url(&config.store_url)?,
        })
    }

    /// Adds one product to the cart.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] / [`ClientError::UnexpectedStatus`] for
    ///   non-2xx responses (after redirects).
    /// - [`ClientError::Http`] on network failure.
    pub async fn add(&self, request: &CartRequest) -> Result<(), ClientError> {
        let url = format!("{}{}", self.store_url, request.to_path());
        let response = self.client.post(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound { url });
        }
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        tracing::info!(
            product_id = %request.product_id,
            attributes = request.attributes.filled().count(),
            installation_id = request.installation_id.as_deref(),
            metadata = ?request.metadata,
            "added product to cart"
        );
        Ok(())
    }
}
