use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct PriceChangedEvent {
    pub product_id: Uuid,
    pub sku: String,
    pub old_price: f64,
    pub new_price: f64,
    pub price_change_percent: f64,
    pub trend: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderPlacedEvent {
    pub order_id: Uuid,
    pub customer_email: String,
    pub total: f64,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderPaidEvent {
    pub order_id: Uuid,
    pub customer_email: String,
    pub total: f64,
    pub timestamp: i64,
}

/// Everything the storefront can subscribe to
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StoreEvent {
    PriceChanged(PriceChangedEvent),
    OrderPlaced(OrderPlacedEvent),
    OrderPaid(OrderPaidEvent),
}

impl StoreEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::PriceChanged(_) => "price_changed",
            StoreEvent::OrderPlaced(_) => "order_placed",
            StoreEvent::OrderPaid(_) => "order_paid",
        }
    }
}
