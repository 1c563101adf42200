use std::sync::Arc;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;
use cendres_catalog::{PriceQuote, PricingEngine, PricingResult, Product};
use cendres_core::repository::ProductRepository;
use cendres_core::{CoreError, CoreResult};
use cendres_shared::models::events::{PriceChangedEvent, StoreEvent};

/// Outcome of persisting one product's next price
#[derive(Debug, Clone, Serialize)]
pub struct RepriceOutcome {
    pub product_id: Uuid,
    pub changed: bool,
    pub pricing: PricingResult,
}

/// Prices the catalog and writes repriced values back
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
    pricing: Arc<PricingEngine>,
    events: broadcast::Sender<StoreEvent>,
}

impl CatalogService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        pricing: Arc<PricingEngine>,
        events: broadcast::Sender<StoreEvent>,
    ) -> Self {
        Self { products, pricing, events }
    }

    /// Active products with a fresh quote each. Does not touch counters.
    pub async fn list_quotes(&self, category: Option<&str>) -> CoreResult<Vec<PriceQuote>> {
        let products = self.products.list_products(category).await?;

        Ok(products.iter()
            .filter(|p| p.is_active)
            .map(|p| PriceQuote::for_product(p, &self.pricing))
            .collect())
    }

    /// Count a product page view and quote the product
    pub async fn view_product(&self, id: Uuid) -> CoreResult<PriceQuote> {
        self.active_product(id).await?;
        let product = self.products.record_view(id).await?;
        debug!("View recorded for {} (total {})", product.sku, product.view_count);

        Ok(PriceQuote::for_product(&product, &self.pricing))
    }

    /// Persist the computed price as the product's current price
    pub async fn reprice(&self, id: Uuid) -> CoreResult<RepriceOutcome> {
        let product = self.active_product(id).await?;
        self.reprice_product(&product).await
    }

    /// Reprice every active product; returns how many prices moved
    pub async fn reprice_all(&self) -> CoreResult<usize> {
        let products = self.products.list_products(None).await?;
        let mut changed = 0;

        for product in products.iter().filter(|p| p.is_active) {
            if self.reprice_product(product).await?.changed {
                changed += 1;
            }
        }

        Ok(changed)
    }

    async fn reprice_product(&self, product: &Product) -> CoreResult<RepriceOutcome> {
        let pricing = product.quote(&self.pricing);
        // Check and write happen under the repository lock, so a concurrent
        // reprice of the same snapshot reports no move
        let changed = self.products.apply_price(product.id, &pricing).await?;

        if changed {
            info!(
                "Repriced {}: {:.2} -> {:.2} ({})",
                product.sku, pricing.old_price, pricing.new_price, pricing.trend_indicator.label
            );

            let _ = self.events.send(StoreEvent::PriceChanged(PriceChangedEvent {
                product_id: product.id,
                sku: product.sku.clone(),
                old_price: pricing.old_price,
                new_price: pricing.new_price,
                price_change_percent: pricing.price_change_percent,
                trend: pricing.trend_indicator.trend.as_str().to_string(),
                timestamp: chrono::Utc::now().timestamp(),
            }));
        }

        Ok(RepriceOutcome {
            product_id: product.id,
            changed,
            pricing,
        })
    }

    async fn active_product(&self, id: Uuid) -> CoreResult<Product> {
        self.products.get_product(id).await?
            .filter(|p| p.is_active)
            .ok_or_else(|| CoreError::NotFound(format!("product {}", id)))
    }
}
