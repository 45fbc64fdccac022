//! Domain core for the TrueNorth storefront: catalog, cart, checkout pricing,
//! and the admin dashboard read model.

mod app_config;
pub mod cart;
pub mod catalog;
pub mod checkout;
mod config;
pub mod dashboard;
pub mod home;
pub mod money;
pub mod products;
pub mod query;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use cart::{Cart, CartError, CartEvent, CartItem, CART_STORAGE_KEY};
pub use catalog::{load_catalog, slugify, Brand, Catalog, CatalogError, Category};
pub use checkout::{CartSummary, CheckoutPolicy};
pub use config::{load_app_config, load_app_config_from_env};
pub use dashboard::{BadgeTone, Dashboard, InventoryAlert, OrderStatus};
pub use home::HomePage;
pub use money::{format_count, format_naira};
pub use products::{Product, ProductVariant};
pub use query::{Facets, ProductQuery, ShopParams, SortOrder};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
