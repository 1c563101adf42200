use async_trait::async_trait;
use uuid::Uuid;
use cendres_catalog::{PricingResult, Product, StockMove};
use cendres_order::Order;
use crate::CoreResult;

/// Product catalog access.
///
/// Mutating methods apply their change atomically and return the updated
/// record; unknown ids yield `CoreError::NotFound`.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_product(&self, id: Uuid) -> CoreResult<Option<Product>>;

    /// Products ordered by name, optionally restricted to one category
    async fn list_products(&self, category: Option<&str>) -> CoreResult<Vec<Product>>;

    async fn record_view(&self, id: Uuid) -> CoreResult<Product>;

    async fn record_purchase(&self, id: Uuid, quantity: u64) -> CoreResult<Product>;

    async fn revert_purchase(&self, id: Uuid, quantity: u64) -> CoreResult<Product>;

    /// Store `pricing.new_price` if the product is still at
    /// `pricing.old_price`. Returns whether the price moved.
    async fn apply_price(&self, id: Uuid, pricing: &PricingResult) -> CoreResult<bool>;

    async fn adjust_stock(&self, id: Uuid, stock_move: StockMove) -> CoreResult<Product>;
}

/// Order data access
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create_order(&self, order: &Order) -> CoreResult<Uuid>;

    async fn get_order(&self, id: Uuid) -> CoreResult<Option<Order>>;

    /// Replace a stored order with `order`
    async fn save_order(&self, order: &Order) -> CoreResult<()>;

    /// Orders of one customer, newest first
    async fn list_orders(&self, customer_email: &str) -> CoreResult<Vec<Order>>;
}
