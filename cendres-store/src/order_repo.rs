use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;
use cendres_order::Order;
use cendres_core::repository::OrderRepository;
use cendres_core::{CoreError, CoreResult};

pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create_order(&self, order: &Order) -> CoreResult<Uuid> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(order.id)
    }

    async fn get_order(&self, id: Uuid) -> CoreResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn save_order(&self, order: &Order) -> CoreResult<()> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(&order.id) {
            Some(stored) => {
                *stored = order.clone();
                Ok(())
            }
            None => Err(CoreError::NotFound(format!("order {}", order.id))),
        }
    }

    async fn list_orders(&self, customer_email: &str) -> CoreResult<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut result: Vec<Order> = orders.values()
            .filter(|o| o.customer_email.eq_ignore_ascii_case(customer_email))
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cendres_order::{Cart, Charges, OrderStatus};

    fn order_for(email: &str) -> Order {
        let charges = Charges { tax_rate: 0.2, shipping_fee: 5.0, free_shipping_threshold: 50.0 };
        Order::from_cart(&Cart::new(), email.to_string(), &charges)
    }

    #[tokio::test]
    async fn test_create_save_list() {
        let repo = InMemoryOrderRepository::new();
        let mut order = order_for("nemo@nautilus.fr");
        repo.create_order(&order).await.unwrap();
        repo.create_order(&order_for("other@example.com")).await.unwrap();

        order.mark_paid().unwrap();
        repo.save_order(&order).await.unwrap();

        let stored = repo.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);

        let mine = repo.list_orders("NEMO@nautilus.fr").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, order.id);
    }

    #[tokio::test]
    async fn test_save_unknown_order() {
        let repo = InMemoryOrderRepository::new();
        let result = repo.save_order(&order_for("x@example.com")).await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }
}
