//! GraphQL documents sent to the storefront API.

/// Product, options, prices, and related products for one SKU.
///
/// Prices are requested in `$currencyCode`; the same code selects the
/// currency display symbol.
pub(crate) const PRODUCT_BY_SKU: &str = r"
query productBySku($sku: String!, $currencyCode: currencyCode!) {
  site {
    currency(currencyCode: $currencyCode) {
      display {
        symbol
      }
    }
    product(sku: $sku) {
      ...ProductFields
      relatedProducts(first: 10) {
        edges {
          node {
            ...ProductFields
          }
        }
      }
    }
  }
}

fragment ProductFields on Product {
  id
  entityId
  name
  sku
  path
  description
  addToCartUrl
  prices(currencyCode: $currencyCode) {
    salePrice {
      value
      currencyCode
    }
    basePrice {
      value
      currencyCode
    }
  }
  images {
    edges {
      node {
        urlOriginal
        altText
      }
    }
  }
  productOptions(first: 50) {
    edges {
      node {
        entityId
        displayName
      }
    }
  }
}
";
