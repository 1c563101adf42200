use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;
use cendres_catalog::{PricingResult, Product, StockMove};
use cendres_core::repository::ProductRepository;
use cendres_core::{CoreError, CoreResult};

/// Catalog held in process memory
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    /// Run `f` against one product under the write lock and return the result
    async fn modify<F>(&self, id: Uuid, f: F) -> CoreResult<Product>
    where
        F: FnOnce(&mut Product) -> CoreResult<()> + Send,
    {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id)
            .ok_or_else(|| CoreError::NotFound(format!("product {}", id)))?;

        f(product)?;
        Ok(product.clone())
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get_product(&self, id: Uuid) -> CoreResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn list_products(&self, category: Option<&str>) -> CoreResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut result: Vec<Product> = products.values()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect();

        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn record_view(&self, id: Uuid) -> CoreResult<Product> {
        self.modify(id, |product| {
            product.record_view();
            Ok(())
        }).await
    }

    async fn record_purchase(&self, id: Uuid, quantity: u64) -> CoreResult<Product> {
        self.modify(id, |product| {
            product.record_purchase(quantity);
            Ok(())
        }).await
    }

    async fn revert_purchase(&self, id: Uuid, quantity: u64) -> CoreResult<Product> {
        self.modify(id, |product| {
            product.revert_purchase(quantity);
            Ok(())
        }).await
    }

    async fn apply_price(&self, id: Uuid, pricing: &PricingResult) -> CoreResult<bool> {
        let mut changed = false;
        self.modify(id, |product| {
            changed = product.apply_price(pricing);
            Ok(())
        }).await?;
        Ok(changed)
    }

    async fn adjust_stock(&self, id: Uuid, stock_move: StockMove) -> CoreResult<Product> {
        self.modify(id, |product| {
            product.apply_stock_move(stock_move)?;
            Ok(())
        }).await
    }
}
