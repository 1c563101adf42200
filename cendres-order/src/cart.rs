use crate::models::{Cart, CartItem};
use chrono::Utc;
use uuid::Uuid;
use std::collections::HashMap;
use std::time::Duration;

/// Holds the open shopping carts
pub struct CartManager {
    carts: HashMap<Uuid, Cart>,
}

impl CartManager {
    pub fn new() -> Self {
        Self {
            carts: HashMap::new(),
        }
    }

    pub fn create_cart(&mut self) -> Cart {
        let cart = Cart::new();
        self.carts.insert(cart.id, cart.clone());
        cart
    }

    pub fn get_cart(&self, cart_id: &Uuid) -> Option<&Cart> {
        self.carts.get(cart_id)
    }

    /// Add a line, merging with an existing line for the same product.
    /// A line keeps the unit price it was first added at.
    pub fn add_item(&mut self, cart_id: &Uuid, item: CartItem) -> Result<&Cart, CartError> {
        if item.quantity == 0 {
            return Err(CartError::InvalidQuantity(item.quantity));
        }

        let cart = self.get_cart_mut(cart_id)?;
        match cart.items.iter_mut().find(|line| line.product_id == item.product_id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(item.quantity);
            }
            None => cart.items.push(item),
        }
        cart.updated_at = Utc::now();

        Ok(cart)
    }

    /// Set a line's quantity; zero removes the line
    pub fn set_quantity(&mut self, cart_id: &Uuid, product_id: &Uuid, quantity: u64) -> Result<&Cart, CartError> {
        if quantity == 0 {
            return self.remove_item(cart_id, product_id);
        }

        let cart = self.get_cart_mut(cart_id)?;
        let line = cart.items.iter_mut()
            .find(|line| &line.product_id == product_id)
            .ok_or(CartError::ProductNotInCart(*product_id))?;
        line.quantity = quantity;
        cart.updated_at = Utc::now();

        Ok(cart)
    }

    pub fn remove_item(&mut self, cart_id: &Uuid, product_id: &Uuid) -> Result<&Cart, CartError> {
        let cart = self.get_cart_mut(cart_id)?;
        let before = cart.items.len();
        cart.items.retain(|line| &line.product_id != product_id);

        if cart.items.len() == before {
            return Err(CartError::ProductNotInCart(*product_id));
        }
        cart.updated_at = Utc::now();

        Ok(cart)
    }

    /// Drop a cart once it has been turned into an order
    pub fn close_cart(&mut self, cart_id: &Uuid) -> Option<Cart> {
        self.carts.remove(cart_id)
    }

    pub fn open_carts(&self) -> usize {
        self.carts.len()
    }

    /// Drop carts left untouched for longer than `ttl`
    pub fn cleanup_expired(&mut self, ttl: Duration) -> usize {
        let cutoff = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_sub_signed(ttl));
        let Some(cutoff) = cutoff else {
            return 0;
        };

        let initial_count = self.carts.len();
        self.carts.retain(|_, cart| cart.updated_at > cutoff);

        initial_count - self.carts.len()
    }

    fn get_cart_mut(&mut self, cart_id: &Uuid) -> Result<&mut Cart, CartError> {
        self.carts.get_mut(cart_id)
            .ok_or(CartError::NotFound(*cart_id))
    }
}

impl Default for CartManager {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("Cart not found: {0}")]
    NotFound(Uuid),

    #[error("Product {0} is not in the cart")]
    ProductNotInCart(Uuid),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u64),

    #[error("Cannot check out an empty cart")]
    EmptyCart,
}
