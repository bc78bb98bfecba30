pub mod app_config;
pub mod attributes;
pub mod config;
pub mod error;
pub mod locations;
pub mod products;
pub mod vehicles;

pub use app_config::{Environment, PhfMapping, WidgetConfig};
pub use attributes::AttributeMapping;
pub use config::{load_widget_config, load_widget_config_from_env};
pub use error::ConfigError;
pub use locations::Location;
pub use products::{Price, Product, ProductImage, ProductOption};
pub use vehicles::{
    resolve_make, resolve_make_id, MakeSelection, VehicleKind, VehicleOption, VehicleSelection,
};
