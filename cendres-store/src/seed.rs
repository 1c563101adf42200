use serde::Deserialize;
use std::path::Path;
use tracing::info;
use cendres_catalog::Product;

/// One catalog entry as written in the seed file
#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub base_price: f64,
    pub base_stock: u64,
    /// Defaults to `base_price`
    pub current_price: Option<f64>,
    /// Defaults to `base_stock`
    pub current_stock: Option<u64>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub purchase_count: u64,
}

impl From<SeedProduct> for Product {
    fn from(seed: SeedProduct) -> Self {
        let mut product = Product::new(seed.sku, seed.name, seed.category, seed.base_price, seed.base_stock);
        product.description = seed.description;
        product.current_price = seed.current_price.unwrap_or(seed.base_price);
        product.current_stock = seed.current_stock.unwrap_or(seed.base_stock);
        product.view_count = seed.view_count;
        product.purchase_count = seed.purchase_count;
        product
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid seed data: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn parse_seed(json: &str) -> Result<Vec<Product>, SeedError> {
    let seeds: Vec<SeedProduct> = serde_json::from_str(json)?;
    Ok(seeds.into_iter().map(Product::from).collect())
}

pub fn load_seed_file(path: impl AsRef<Path>) -> Result<Vec<Product>, SeedError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let products = parse_seed(&json)?;
    info!("Loaded {} products from {}", products.len(), path.display());
    Ok(products)
}
