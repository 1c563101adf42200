pub mod models;
pub mod lifecycle;
pub mod cart;

pub use models::{Cart, CartItem, Charges, Order, OrderItem, OrderStatus};
pub use lifecycle::OrderError;
pub use cart::{CartError, CartManager};
