pub mod product;
pub mod pricing;
pub mod inventory;

pub use product::{Product, PriceQuote};
pub use pricing::{PricingConfig, PricingEngine, PricingInput, PricingResult, Trend, TrendIndicator};
pub use inventory::{InventoryError, StockMove};
