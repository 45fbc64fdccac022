use std::net::SocketAddr;
use std::path::PathBuf;

use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Catalog YAML to serve. `None` means the bundled catalog.
    pub catalog_path: Option<PathBuf>,
    /// Where the CLI keeps its cart snapshot between runs.
    pub cart_path: PathBuf,
    pub shipping_flat_rate: Decimal,
    pub free_shipping_threshold: Decimal,
    /// VAT as a fraction, e.g. `0.075` for 7.5%.
    pub vat_rate: Decimal,
    pub low_stock_threshold: u32,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
    /// Server carts untouched for this long are dropped.
    pub cart_idle_ttl_secs: u64,
}
