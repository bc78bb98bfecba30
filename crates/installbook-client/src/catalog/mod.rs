//! GraphQL client for storefront product data.

mod query;
mod types;

use installbook_core::{Product, WidgetConfig};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::http::{build_client, normalize_base_url, send_json, with_bearer};

use types::{GraphQlResponse, ProductQueryData};

/// Client for the storefront GraphQL API.
pub struct CatalogClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl CatalogClient {
    /// Creates a client for the GraphQL endpoint configured in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if the resolved endpoint does
    /// not parse, or [`ClientError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(config: &WidgetConfig) -> Result<Self, ClientError> {
        Self::with_endpoint(config, &config.graphql_url())
    }

    /// Creates a client against an explicit GraphQL URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::new`].
    pub fn with_endpoint(config: &WidgetConfig, endpoint: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_client(config.request_timeout_secs, &config.user_agent, false)?,
            endpoint: normalize_base_url(endpoint)?,
            token: config.token.clone(),
        })
    }

    /// Executes one GraphQL document and decodes its `data` member.
    ///
    /// # Errors
    ///
    /// - [`ClientError::GraphQl`] if the response carries an `errors` array
    ///   or no `data`.
    /// - [`ClientError::Deserialize`] if `data` does not match `T`.
    /// - [`ClientError::Http`], [`ClientError::NotFound`],
    ///   [`ClientError::UnexpectedStatus`] for transport failures.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
        context: &str,
    ) -> Result<T, ClientError> {
        let body = serde_json::json!({ "query": query, "variables": variables });
        let request = with_bearer(self.client.post(&self.endpoint), &self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body);
        let payload = send_json(request, &self.endpoint, context).await?;

        let envelope: GraphQlResponse<T> =
            serde_json::from_value(payload).map_err(|e| ClientError::Deserialize {
                context: context.to_string(),
                source: e,
            })?;

        if let Some(first) = envelope.errors.first() {
            tracing::error!(
                context,
                count = envelope.errors.len(),
                error = %first.message,
                "GraphQL query returned errors"
            );
            let message = if first.message.is_empty() {
                "Unknown error".to_string()
            } else {
                first.message.clone()
            };
            return Err(ClientError::GraphQl { message });
        }

        envelope.data.ok_or_else(|| ClientError::GraphQl {
            message: format!("no data returned for {context}"),
        })
    }

    /// Fetches a product, its declared options, and its related products by SKU.
    ///
    /// Prices are in `currency_code`; the sale price is preferred over the
    /// base price. Failures are returned as-is, with no retry.
    ///
    /// # Errors
    ///
    /// [`ClientError::ProductNotFound`] if the storefront has no product with
    /// this SKU, plus everything [`CatalogClient::execute`] returns.
    pub async fn fetch_product_by_sku(
        &self,
        sku: &str,
        currency_code: &str,
    ) -> Result<Product, ClientError> {
        let variables = serde_json::json!({ "sku": sku, "currencyCode": currency_code });
        let data: ProductQueryData = self
            .execute(query::PRODUCT_BY_SKU, variables, &format!("product sku {sku}"))
            .await?;

        let symbol = data
            .site
            .currency
            .and_then(|currency| currency.display)
            .and_then(|display| display.symbol);

        let node = data.site.product.ok_or_else(|| ClientError::ProductNotFound {
            sku: sku.to_string(),
        })?;

        let product = node.into_product(symbol.as_deref());
        tracing::debug!(
            sku,
            entity_id = product.entity_id,
            options = product.options.len(),
            related = product.related_products.len(),
            "fetched product"
        );
        Ok(product)
    }

    /// Related products of the product with `sku`.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::fetch_product_by_sku`].
    pub async fn fetch_related_products_by_sku(
        &self,
        sku: &str,
        currency_code: &str,
    ) -> Result<Vec<Product>, ClientError> {
        Ok(self
            .fetch_product_by_sku(sku, currency_code)
            .await?
            .related_products)
    }
}
