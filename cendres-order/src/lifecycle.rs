use crate::models::{Order, OrderStatus};

impl OrderStatus {
    /// Allowed moves: PENDING -> PAID -> SHIPPED -> DELIVERED,
    /// and PENDING or PAID -> CANCELLED.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Paid, OrderStatus::Shipped)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Paid, OrderStatus::Cancelled)
        )
    }
}

impl Order {
    /// Move the order to `next`, returning the status it left
    pub fn transition(&mut self, next: OrderStatus) -> Result<OrderStatus, OrderError> {
        let from = self.status;
        if !from.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: from.to_string(),
                to: next.to_string(),
            });
        }

        self.update_status(next);
        Ok(from)
    }

    /// Transition: Pending → Paid (payment confirmed)
    pub fn mark_paid(&mut self) -> Result<(), OrderError> {
        self.transition(OrderStatus::Paid).map(|_| ())
    }

    /// Transition: Paid → Shipped
    pub fn mark_shipped(&mut self) -> Result<(), OrderError> {
        self.transition(OrderStatus::Shipped).map(|_| ())
    }

    /// Transition: Shipped → Delivered
    pub fn mark_delivered(&mut self) -> Result<(), OrderError> {
        self.transition(OrderStatus::Delivered).map(|_| ())
    }

    /// Cancel an order that has not shipped yet
    pub fn cancel(&mut self) -> Result<OrderStatus, OrderError> {
        self.transition(OrderStatus::Cancelled)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: String,
        to: String,
    },
}
