use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};
use uuid::Uuid;
use cendres_catalog::{PricingEngine, StockMove};
use cendres_core::repository::{OrderRepository, ProductRepository};
use cendres_order::{Cart, CartError, CartItem, CartManager, Charges, Order, OrderError, OrderStatus};
use cendres_shared::models::events::{OrderPaidEvent, OrderPlacedEvent, StoreEvent};
use cendres_shared::money::round_cents;

use crate::error::AppError;

/// Cart editing, checkout and the order lifecycle
#[derive(Clone)]
pub struct CheckoutService {
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    carts: Arc<Mutex<CartManager>>,
    /// Serialises order status changes so two requests cannot both move
    /// the same order's stock
    order_lock: Arc<Mutex<()>>,
    pricing: Arc<PricingEngine>,
    events: broadcast::Sender<StoreEvent>,
    charges: Charges,
}

impl CheckoutService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        carts: Arc<Mutex<CartManager>>,
        order_lock: Arc<Mutex<()>>,
        pricing: Arc<PricingEngine>,
        events: broadcast::Sender<StoreEvent>,
        charges: Charges,
    ) -> Self {
        Self { products, orders, carts, order_lock, pricing, events, charges }
    }

    pub async fn create_cart(&self) -> Cart {
        self.carts.lock().await.create_cart()
    }

    pub async fn get_cart(&self, cart_id: Uuid) -> Result<Cart, AppError> {
        self.carts.lock().await
            .get_cart(&cart_id)
            .cloned()
            .ok_or_else(|| CartError::NotFound(cart_id).into())
    }

    /// Add a product at the price the storefront is showing for it
    pub async fn add_item(&self, cart_id: Uuid, product_id: Uuid, quantity: u64) -> Result<Cart, AppError> {
        let product = self.products.get_product(product_id).await?
            .filter(|p| p.is_active)
            .ok_or_else(|| AppError::NotFoundError(format!("Product not found: {}", product_id)))?;

        let unit_price = round_cents(product.quote(&self.pricing).new_price);
        let item = CartItem {
            product_id,
            name: product.name,
            unit_price,
            quantity,
        };

        let mut carts = self.carts.lock().await;
        Ok(carts.add_item(&cart_id, item)?.clone())
    }

    pub async fn set_quantity(&self, cart_id: Uuid, product_id: Uuid, quantity: u64) -> Result<Cart, AppError> {
        let mut carts = self.carts.lock().await;
        Ok(carts.set_quantity(&cart_id, &product_id, quantity)?.clone())
    }

    pub async fn remove_item(&self, cart_id: Uuid, product_id: Uuid) -> Result<Cart, AppError> {
        let mut carts = self.carts.lock().await;
        Ok(carts.remove_item(&cart_id, &product_id)?.clone())
    }

    /// Turn a cart into a pending order.
    ///
    /// Stock for every line is reserved before the order exists; if any line
    /// cannot be reserved the reservations already made are released and the
    /// cart is left as it was.
    pub async fn checkout(&self, cart_id: Uuid, customer_email: &str) -> Result<Order, AppError> {
        let customer_email = customer_email.trim();
        if customer_email.is_empty() || !customer_email.contains('@') {
            return Err(AppError::ValidationError(format!("Invalid customer email: {:?}", customer_email)));
        }

        let mut carts = self.carts.lock().await;
        let cart = carts.get_cart(&cart_id)
            .cloned()
            .ok_or(CartError::NotFound(cart_id))?;

        if cart.is_empty() {
            return Err(CartError::EmptyCart.into());
        }

        let mut reserved: Vec<&CartItem> = Vec::with_capacity(cart.items.len());
        for item in &cart.items {
            if let Err(e) = self.products.adjust_stock(item.product_id, StockMove::Reserve(item.quantity)).await {
                warn!("Checkout of cart {} failed on {}: {}", cart_id, item.product_id, e);
                self.release_all(&reserved).await;
                return Err(e.into());
            }
            reserved.push(item);
        }

        let order = Order::from_cart(&cart, customer_email.to_string(), &self.charges);
        if let Err(e) = self.orders.create_order(&order).await {
            self.release_all(&reserved).await;
            return Err(e.into());
        }
        carts.close_cart(&cart_id);

        info!("Order {} placed by {} for {:.2} {}", order.id, order.customer_email, order.total, order.currency);
        let _ = self.events.send(StoreEvent::OrderPlaced(OrderPlacedEvent {
            order_id: order.id,
            customer_email: order.customer_email.clone(),
            total: order.total,
            timestamp: chrono::Utc::now().timestamp(),
        }));

        Ok(order)
    }

    pub async fn get_order(&self, order_id: Uuid) -> Result<Order, AppError> {
        self.orders.get_order(order_id).await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()).into())
    }

    pub async fn list_orders(&self, customer_email: &str) -> Result<Vec<Order>, AppError> {
        Ok(self.orders.list_orders(customer_email.trim()).await?)
    }

    /// Pending → Paid: consume the reserved stock and count the purchases
    pub async fn pay(&self, order_id: Uuid) -> Result<Order, AppError> {
        let _guard = self.order_lock.lock().await;
        let mut order = self.get_order(order_id).await?;
        order.mark_paid()?;

        for item in &order.items {
            self.products.adjust_stock(item.product_id, StockMove::Commit(item.quantity)).await?;
            self.products.record_purchase(item.product_id, item.quantity).await?;
        }
        self.orders.save_order(&order).await?;

        info!("Order {} paid", order.id);
        let _ = self.events.send(StoreEvent::OrderPaid(OrderPaidEvent {
            order_id: order.id,
            customer_email: order.customer_email.clone(),
            total: order.total,
            timestamp: chrono::Utc::now().timestamp(),
        }));

        Ok(order)
    }

    pub async fn ship(&self, order_id: Uuid) -> Result<Order, AppError> {
        let _guard = self.order_lock.lock().await;
        let mut order = self.get_order(order_id).await?;
        order.mark_shipped()?;
        self.orders.save_order(&order).await?;
        Ok(order)
    }

    pub async fn deliver(&self, order_id: Uuid) -> Result<Order, AppError> {
        let _guard = self.order_lock.lock().await;
        let mut order = self.get_order(order_id).await?;
        order.mark_delivered()?;
        self.orders.save_order(&order).await?;
        Ok(order)
    }

    /// Cancel and put the goods back: reservations are released, paid
    /// quantities returned to the shelf and their purchases taken back.
    pub async fn cancel(&self, order_id: Uuid) -> Result<Order, AppError> {
        let _guard = self.order_lock.lock().await;
        let mut order = self.get_order(order_id).await?;
        let previous = order.cancel()?;

        for item in &order.items {
            match previous {
                OrderStatus::Paid => {
                    self.products.adjust_stock(item.product_id, StockMove::Return(item.quantity)).await?;
                    self.products.revert_purchase(item.product_id, item.quantity).await?;
                }
                _ => {
                    self.products.adjust_stock(item.product_id, StockMove::Release(item.quantity)).await?;
                }
            }
        }
        self.orders.save_order(&order).await?;

        info!("Order {} cancelled (was {})", order.id, previous);
        Ok(order)
    }

    async fn release_all(&self, items: &[&CartItem]) {
        for item in items {
            if let Err(e) = self.products.adjust_stock(item.product_id, StockMove::Release(item.quantity)).await {
                tracing::error!("Failed to release {} of {}: {}", item.quantity, item.product_id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cendres_catalog::Product;
    use cendres_store::{InMemoryOrderRepository, InMemoryProductRepository};

    struct Fixture {
        service: CheckoutService,
        products: Arc<InMemoryProductRepository>,
        lantern: Uuid,
        kettle: Uuid,
    }

    fn fixture() -> Fixture {
        let lantern = Product::new("CV-003", "Lantern", "lighting", 50.0, 10);
        let kettle = Product::new("CV-004", "Kettle", "kitchen", 20.0, 2);
        let (lantern_id, kettle_id) = (lantern.id, kettle.id);

        let products = Arc::new(InMemoryProductRepository::with_products(vec![lantern, kettle]));
        let (tx, _) = broadcast::channel(16);
        let service = CheckoutService::new(
            products.clone(),
            Arc::new(InMemoryOrderRepository::new()),
            Arc::new(Mutex::new(CartManager::new())),
            Arc::new(Mutex::new(())),
            Arc::new(PricingEngine::default()),
            tx,
            Charges { tax_rate: 0.2, shipping_fee: 5.0, free_shipping_threshold: 1000.0 },
        );

        Fixture { service, products, lantern: lantern_id, kettle: kettle_id }
    }

    async fn stock_of(products: &InMemoryProductRepository, id: Uuid) -> (u64, u64) {
        let product = products.get_product(id).await.unwrap().unwrap();
        (product.current_stock, product.reserved_stock)
    }

    #[tokio::test]
    async fn test_checkout_and_pay() {
        let f = fixture();
        let cart = f.service.create_cart().await;
        f.service.add_item(cart.id, f.lantern, 2).await.unwrap();

        let order = f.service.checkout(cart.id, "nemo@nautilus.fr").await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.subtotal, 100.0);
        assert_eq!(order.total, 125.0);
        assert_eq!(stock_of(&f.products, f.lantern).await, (8, 2));

        // Cart is gone after checkout
        assert!(f.service.get_cart(cart.id).await.is_err());

        let order = f.service.pay(order.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(stock_of(&f.products, f.lantern).await, (8, 0));

        let lantern = f.products.get_product(f.lantern).await.unwrap().unwrap();
        assert_eq!(lantern.purchase_count, 2);
    }

    #[tokio::test]
    async fn test_checkout_is_all_or_nothing() {
        let f = fixture();
        let cart = f.service.create_cart().await;
        f.service.add_item(cart.id, f.lantern, 3).await.unwrap();
        f.service.add_item(cart.id, f.kettle, 5).await.unwrap();

        let result = f.service.checkout(cart.id, "nemo@nautilus.fr").await;
        assert!(matches!(result, Err(AppError::ConflictError(_))));

        // Nothing stays reserved and the cart survives
        assert_eq!(stock_of(&f.products, f.lantern).await, (10, 0));
        assert_eq!(stock_of(&f.products, f.kettle).await, (2, 0));
        assert_eq!(f.service.get_cart(cart.id).await.unwrap().items.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_cart_and_bad_email() {
        let f = fixture();
        let cart = f.service.create_cart().await;

        assert!(matches!(
            f.service.checkout(cart.id, "nemo@nautilus.fr").await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            f.service.checkout(cart.id, "   ").await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_restores_stock() {
        let f = fixture();

        // Cancel while pending
        let cart = f.service.create_cart().await;
        f.service.add_item(cart.id, f.kettle, 2).await.unwrap();
        let order = f.service.checkout(cart.id, "a@example.com").await.unwrap();
        assert_eq!(stock_of(&f.products, f.kettle).await, (0, 2));
        f.service.cancel(order.id).await.unwrap();
        assert_eq!(stock_of(&f.products, f.kettle).await, (2, 0));

        // Cancel after payment
        let cart = f.service.create_cart().await;
        f.service.add_item(cart.id, f.kettle, 1).await.unwrap();
        let order = f.service.checkout(cart.id, "a@example.com").await.unwrap();
        f.service.pay(order.id).await.unwrap();
        let order = f.service.cancel(order.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(stock_of(&f.products, f.kettle).await, (2, 0));

        // Refunded purchases no longer count as demand
        let kettle = f.products.get_product(f.kettle).await.unwrap().unwrap();
        assert_eq!(kettle.purchase_count, 0);

        // Terminal
        assert!(matches!(f.service.cancel(order.id).await, Err(AppError::ConflictError(_))));
    }

    #[tokio::test]
    async fn test_line_keeps_first_quoted_price() {
        let f = fixture();
        let cart = f.service.create_cart().await;
        let cart_id = cart.id;

        let cart = f.service.add_item(cart_id, f.lantern, 1).await.unwrap();
        assert_eq!(cart.items[0].unit_price, 50.0);

        // Heavy traffic lifts the quote to +50%
        for _ in 0..200 {
            f.products.record_view(f.lantern).await.unwrap();
        }
        let lantern = f.products.get_product(f.lantern).await.unwrap().unwrap();
        assert_eq!(lantern.quote(&PricingEngine::default()).new_price, 75.0);

        let cart = f.service.add_item(cart_id, f.lantern, 1).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.items[0].unit_price, 50.0);
        assert_eq!(cart.subtotal(), 100.0);

        // A new line is priced at the current quote
        let cart = f.service.add_item(cart_id, f.kettle, 1).await.unwrap();
        assert_eq!(cart.items[1].unit_price, 20.0);
    }

    #[tokio::test]
    async fn test_shipping_flow() {
        let f = fixture();
        let cart = f.service.create_cart().await;
        f.service.add_item(cart.id, f.lantern, 1).await.unwrap();
        let order = f.service.checkout(cart.id, "a@example.com").await.unwrap();

        assert!(matches!(f.service.ship(order.id).await, Err(AppError::ConflictError(_))));

        f.service.pay(order.id).await.unwrap();
        f.service.ship(order.id).await.unwrap();
        let order = f.service.deliver(order.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);

        let orders = f.service.list_orders("a@example.com").await.unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_product_not_added() {
        let f = fixture();
        let cart = f.service.create_cart().await;

        assert!(matches!(
            f.service.add_item(cart.id, Uuid::new_v4(), 1).await,
            Err(AppError::NotFoundError(_))
        ));
    }
}
