pub mod cart;
pub mod catalog;
pub mod error;
mod http;
pub mod installer;
pub mod zipcode;

pub use cart::{build_cart_request, CartClient, CartMetadata, CartRequest};
pub use catalog::CatalogClient;
pub use error::ClientError;
pub use installer::{InstallerClient, RawListResponse};
pub use zipcode::is_valid_zipcode;
