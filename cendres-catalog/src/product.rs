use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use crate::pricing::{PricingEngine, PricingInput, PricingResult};

/// A catalog entry together with the market counters the pricing engine reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub base_price: f64,
    pub current_price: f64,
    pub base_stock: u64,
    pub current_stock: u64,
    #[serde(default)]
    pub reserved_stock: u64,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub purchase_count: u64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// New product priced at its base price with full stock
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        base_price: f64,
        base_stock: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sku: sku.into(),
            name: name.into(),
            description: None,
            category: category.into(),
            base_price,
            current_price: base_price,
            base_stock,
            current_stock: base_stock,
            reserved_stock: 0,
            view_count: 0,
            purchase_count: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn record_view(&mut self) {
        self.view_count = self.view_count.saturating_add(1);
        self.updated_at = Utc::now();
    }

    pub fn record_purchase(&mut self, quantity: u64) {
        self.purchase_count = self.purchase_count.saturating_add(quantity);
        self.updated_at = Utc::now();
    }

    /// Take back purchases of a refunded order
    pub fn revert_purchase(&mut self, quantity: u64) {
        self.purchase_count = self.purchase_count.saturating_sub(quantity);
        self.updated_at = Utc::now();
    }

    pub fn pricing_input(&self) -> PricingInput {
        PricingInput {
            base_price: self.base_price,
            current_price: self.current_price,
            current_stock: self.current_stock,
            base_stock: self.base_stock,
            view_count: self.view_count,
            purchase_count: self.purchase_count,
        }
    }

    /// Price this product without touching it
    pub fn quote(&self, engine: &PricingEngine) -> PricingResult {
        engine.calculate_new_price(&self.pricing_input())
    }

    /// Store a computed price as the next current price.
    ///
    /// The result only applies to the price it was computed from: a quote
    /// whose `old_price` no longer matches is stale and is ignored.
    /// Returns true when the price actually moved.
    pub fn apply_price(&mut self, result: &PricingResult) -> bool {
        let changed = result.old_price == self.current_price
            && result.new_price != self.current_price;
        if changed {
            self.current_price = result.new_price;
            self.updated_at = Utc::now();
        }
        changed
    }

    pub fn is_available(&self) -> bool {
        self.is_active && self.current_stock > 0
    }
}

/// A product summary paired with its live price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub product_id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub base_price: f64,
    pub in_stock: bool,
    pub pricing: PricingResult,
}

impl PriceQuote {
    pub fn for_product(product: &Product, engine: &PricingEngine) -> Self {
        Self {
            product_id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            base_price: product.base_price,
            in_stock: product.is_available(),
            pricing: product.quote(engine),
        }
    }
}
