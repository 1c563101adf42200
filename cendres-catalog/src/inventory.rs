use uuid::Uuid;
use serde::{Deserialize, Serialize};
use chrono::Utc;
use crate::product::Product;

/// Stock movement applied to a product during checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "quantity", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockMove {
    /// Hold stock for a pending order
    Reserve(u64),
    /// Give a hold back (order cancelled before payment)
    Release(u64),
    /// Consume a hold (order paid)
    Commit(u64),
    /// Put sold stock back on the shelf (paid order cancelled)
    Return(u64),
}

impl Product {
    /// Apply a stock movement; on error the product is left untouched
    pub fn apply_stock_move(&mut self, stock_move: StockMove) -> Result<(), InventoryError> {
        match stock_move {
            StockMove::Reserve(quantity) => {
                if self.current_stock < quantity {
                    return Err(InventoryError::InsufficientStock {
                        product_id: self.id,
                        requested: quantity,
                        available: self.current_stock,
                    });
                }
                self.current_stock -= quantity;
                self.reserved_stock += quantity;
            }
            StockMove::Release(quantity) => {
                self.check_reserved(quantity)?;
                self.reserved_stock -= quantity;
                self.current_stock = self.current_stock.saturating_add(quantity);
            }
            StockMove::Commit(quantity) => {
                self.check_reserved(quantity)?;
                self.reserved_stock -= quantity;
            }
            StockMove::Return(quantity) => {
                self.current_stock = self.current_stock.saturating_add(quantity);
            }
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    fn check_reserved(&self, quantity: u64) -> Result<(), InventoryError> {
        if self.reserved_stock < quantity {
            return Err(InventoryError::InsufficientReserved {
                product_id: self.id,
                requested: quantity,
                reserved: self.reserved_stock,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: Uuid,
        requested: u64,
        available: u64,
    },

    #[error("Insufficient reserved stock for {product_id}: requested {requested}, reserved {reserved}")]
    InsufficientReserved {
        product_id: Uuid,
        requested: u64,
        reserved: u64,
    },
}
