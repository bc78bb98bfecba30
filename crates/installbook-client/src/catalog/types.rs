//! Storefront GraphQL response types.
//!
//! Connections follow the Relay `edges { node }` shape. Every nested field is
//! optional or defaulted: storefronts hide fields per channel, and a missing
//! image or option list must not fail the whole product.

use installbook_core::{Price, Product, ProductImage, ProductOption};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductQueryData {
    pub site: SiteNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SiteNode {
    pub product: Option<ProductNode>,
    pub currency: Option<CurrencyNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrencyNode {
    pub display: Option<CurrencyDisplay>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrencyDisplay {
    pub symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Connection<T> {
    #[serde(default)]
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

impl<T> Connection<T> {
    fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|edge| edge.node)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductNode {
    pub id: String,
    pub entity_id: i64,
    pub name: String,
    pub sku: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    pub add_to_cart_url: Option<String>,
    pub prices: Option<PricesNode>,
    #[serde(default)]
    pub images: Option<Connection<ImageNode>>,
    #[serde(default)]
    pub product_options: Option<Connection<OptionNode>>,
    #[serde(default)]
    pub related_products: Option<Connection<ProductNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PricesNode {
    pub sale_price: Option<MoneyNode>,
    pub base_price: Option<MoneyNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoneyNode {
    pub value: f64,
    pub currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageNode {
    pub url_original: String,
    pub alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OptionNode {
    pub entity_id: i64,
    pub display_name: String,
}

impl ProductNode {
    /// Converts to the core [`Product`], preferring the sale price.
    pub(crate) fn into_product(self, currency_symbol: Option<&str>) -> Product {
        let price = self
            .prices
            .and_then(|prices| prices.sale_price.or(prices.base_price))
            .map(|money| Price {
                value: money.value,
                currency_code: money.currency_code,
            });

        let images = self
            .images
            .unwrap_or_default()
            .into_nodes()
            .map(|image| ProductImage {
                url: image.url_original,
                alt_text: image.alt_text.filter(|alt| !alt.is_empty()),
            })
            .collect();

        let options = self
            .product_options
            .unwrap_or_default()
            .into_nodes()
            .map(|option| ProductOption {
                entity_id: option.entity_id.to_string(),
                display_name: option.display_name,
            })
            .collect();

        let related_products = self
            .related_products
            .unwrap_or_default()
            .into_nodes()
            .map(|related| ProductNode {
                related_products: None,
                ..related
            })
            .map(|related| related.into_product(currency_symbol))
            .collect();

        Product {
            id: self.id,
            entity_id: self.entity_id,
            name: self.name,
            sku: self.sku.filter(|sku| !sku.is_empty()),
            path: self.path,
            description: self.description,
            add_to_cart_url: self.add_to_cart_url,
            price,
            currency_symbol: currency_symbol.map(str::to_string),
            images,
            options,
            related_products,
        }
    }
}
