use serde::Deserialize;
use std::env;
use cendres_catalog::PricingConfig;
use cendres_order::Charges;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// JSON file of products loaded at startup
    pub seed_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkerConfig {
    /// Seconds between repricing passes; 0 disables the worker
    #[serde(default = "default_reprice_interval")]
    pub reprice_interval_seconds: u64,
    /// Idle time after which an open cart is dropped; 0 keeps carts forever
    #[serde(default = "default_cart_ttl")]
    pub cart_ttl_seconds: u64,
    #[serde(default = "default_cart_sweep_interval")]
    pub cart_sweep_interval_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            reprice_interval_seconds: default_reprice_interval(),
            cart_ttl_seconds: default_cart_ttl(),
            cart_sweep_interval_seconds: default_cart_sweep_interval(),
        }
    }
}

fn default_reprice_interval() -> u64 { 60 }

fn default_cart_ttl() -> u64 { 86_400 }

fn default_cart_sweep_interval() -> u64 { 300 }

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    pub tax_rate: f64,
    pub shipping_fee: f64,
    #[serde(default = "default_free_shipping")]
    pub free_shipping_threshold: f64,
}

fn default_free_shipping() -> f64 { f64::INFINITY }

impl BusinessRules {
    pub fn charges(&self) -> Charges {
        Charges {
            tax_rate: self.tax_rate,
            shipping_fee: self.shipping_fee,
            free_shipping_threshold: self.free_shipping_threshold,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Layered load: `default`, then `{RUN_MODE}` and `local` if present,
    /// then `CENDRES__*` environment variables.
    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)))
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            // Eg.. `CENDRES__SERVER__PORT=9000` sets `server.port`
            .add_source(config::Environment::with_prefix("CENDRES").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
