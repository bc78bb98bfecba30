use serde::{Deserialize, Serialize};

/// A storefront product as returned by the catalog GraphQL query.
///
/// Related products share this type; their own `related_products` list is
/// always empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque GraphQL node id.
    pub id: String,
    /// Numeric platform id, the value `cart.php` expects as `product_id`.
    pub entity_id: i64,
    pub name: String,
    pub sku: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    pub add_to_cart_url: Option<String>,
    /// Sale price when one is set, base price otherwise.
    pub price: Option<Price>,
    /// Display symbol for the requested currency, e.g. `"$"`.
    pub currency_symbol: Option<String>,
    pub images: Vec<ProductImage>,
    /// Declared product options in storefront order.
    pub options: Vec<ProductOption>,
    pub related_products: Vec<Product>,
}

impl Product {
    /// Picks the related product sold as the installation line item.
    ///
    /// `variant_product` matches either the SKU or the entity id. Without a
    /// configured variant the first related product is used.
    #[must_use]
    pub fn installation_product(&self, variant_product: Option<&str>) -> Option<&Product> {
        match variant_product.map(str::trim).filter(|v| !v.is_empty()) {
            Some(wanted) => self.related_products.iter().find(|p| {
                p.sku.as_deref().is_some_and(|sku| sku.eq_ignore_ascii_case(wanted))
                    || p.entity_id.to_string() == wanted
            }),
            None => self.related_products.first(),
        }
    }

    /// Price formatted with the currency symbol, e.g. `"$299.99"`.
    #[must_use]
    pub fn display_price(&self) -> Option<String> {
        let price = self.price.as_ref()?;
        let symbol = self
            .currency_symbol
            .clone()
            .unwrap_or_else(|| format!("{} ", price.currency_code));
        Some(format!("{symbol}{:.2}", price.value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub value: f64,
    /// ISO 4217 currency code (e.g., `"USD"`).
    pub currency_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    pub alt_text: Option<String>,
}

/// A merchant-declared product option, e.g. `"Vehicle Year"` with entity id `375`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option entity id as the string used in `attribute[<id>]`.
    pub entity_id: String,
    pub display_name: String,
}
