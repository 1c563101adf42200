use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use cendres_catalog::{PricingEngine, Product};
use cendres_core::repository::{OrderRepository, ProductRepository};
use cendres_order::CartManager;
use cendres_shared::models::events::StoreEvent;
use cendres_store::app_config::BusinessRules;
use cendres_store::{InMemoryOrderRepository, InMemoryProductRepository};

use crate::catalog::CatalogService;
use crate::checkout::CheckoutService;

const EVENT_CHANNEL_CAPACITY: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub carts: Arc<Mutex<CartManager>>,
    pub order_lock: Arc<Mutex<()>>,
    pub pricing: Arc<PricingEngine>,
    pub events: broadcast::Sender<StoreEvent>,
    pub business_rules: BusinessRules,
}

impl AppState {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        pricing: PricingEngine,
        business_rules: BusinessRules,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            products,
            orders,
            carts: Arc::new(Mutex::new(CartManager::new())),
            order_lock: Arc::new(Mutex::new(())),
            pricing: Arc::new(pricing),
            events,
            business_rules,
        }
    }

    /// State backed by the in-memory repositories
    pub fn in_memory(products: Vec<Product>, pricing: PricingEngine, business_rules: BusinessRules) -> Self {
        Self::new(
            Arc::new(InMemoryProductRepository::with_products(products)),
            Arc::new(InMemoryOrderRepository::new()),
            pricing,
            business_rules,
        )
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.products.clone(), self.pricing.clone(), self.events.clone())
    }

    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(
            self.products.clone(),
            self.orders.clone(),
            self.carts.clone(),
            self.order_lock.clone(),
            self.pricing.clone(),
            self.events.clone(),
            self.business_rules.charges(),
        )
    }
}
