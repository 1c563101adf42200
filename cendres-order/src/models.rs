use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use cendres_shared::money::round_cents;

pub const CURRENCY: &str = "EUR";

/// Order status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// One line of a shopping cart, priced when it was added
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u64,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        round_cents(self.unit_price * self.quantity as f64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: Uuid,
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn subtotal(&self) -> f64 {
        round_cents(self.items.iter().map(CartItem::line_total).sum())
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// Amounts charged on top of the goods
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Charges {
    pub tax_rate: f64,
    pub shipping_fee: f64,
    pub free_shipping_threshold: f64,
}

/// A customer's purchase, created at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_email: String,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping_fee: f64,
    pub total: f64,
    pub currency: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a pending order from a cart's lines
    pub fn from_cart(cart: &Cart, customer_email: String, charges: &Charges) -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let items: Vec<OrderItem> = cart.items.iter()
            .map(|item| OrderItem::from_cart_item(id, item))
            .collect();

        let subtotal = cart.subtotal();
        let tax = round_cents(subtotal * charges.tax_rate);
        let shipping_fee = if subtotal >= charges.free_shipping_threshold {
            0.0
        } else {
            charges.shipping_fee
        };

        Self {
            id,
            customer_email,
            items,
            subtotal,
            tax,
            shipping_fee,
            total: round_cents(subtotal + tax + shipping_fee),
            currency: CURRENCY.to_string(),
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_status(&mut self, new_status: OrderStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }
}

/// An individual product within an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: u64,
    pub line_total: f64,
}

impl OrderItem {
    pub fn from_cart_item(order_id: Uuid, item: &CartItem) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            product_id: item.product_id,
            product_name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}
