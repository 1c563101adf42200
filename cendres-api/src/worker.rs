use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use cendres_order::CartManager;

use crate::catalog::CatalogService;

/// Periodically persist every product's next price.
/// The first pass runs immediately.
pub fn start_repricing_worker(catalog: CatalogService, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Repricing worker started, every {:?}", interval);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match catalog.reprice_all().await {
                Ok(0) => {}
                Ok(changed) => info!("Repricing pass moved {} prices", changed),
                Err(e) => error!("Repricing pass failed: {}", e),
            }
        }
    })
}

/// Evict carts idle for longer than `ttl`, checking every `interval`
pub fn start_cart_sweeper(carts: Arc<Mutex<CartManager>>, ttl: Duration, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Cart sweeper started, ttl {:?}", ttl);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let mut carts = carts.lock().await;
            let evicted = carts.cleanup_expired(ttl);
            if evicted > 0 {
                info!("Evicted {} abandoned carts, {} still open", evicted, carts.open_carts());
            } else {
                debug!("No abandoned carts, {} open", carts.open_carts());
            }
        }
    })
}
