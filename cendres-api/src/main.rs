use std::net::SocketAddr;
use std::time::Duration;
use anyhow::Context;
use cendres_api::{app, worker, AppState};
use cendres_catalog::PricingEngine;
use cendres_store::{app_config::Config, seed};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cendres_api=debug,cendres_store=info,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Cendres et Vapeur API on port {}", config.server.port);

    let products = match &config.catalog.seed_file {
        Some(path) => seed::load_seed_file(path).context("Failed to seed catalog")?,
        None => {
            tracing::warn!("No catalog seed file configured, starting with an empty catalog");
            Vec::new()
        }
    };

    let app_state = AppState::in_memory(
        products,
        PricingEngine::new(config.pricing.clone()),
        config.business_rules.clone(),
    );

    if config.worker.reprice_interval_seconds > 0 {
        worker::start_repricing_worker(
            app_state.catalog(),
            Duration::from_secs(config.worker.reprice_interval_seconds),
        );
    } else {
        tracing::info!("Repricing worker disabled");
    }

    if config.worker.cart_ttl_seconds > 0 {
        worker::start_cart_sweeper(
            app_state.carts.clone(),
            Duration::from_secs(config.worker.cart_ttl_seconds),
            Duration::from_secs(config.worker.cart_sweep_interval_seconds.max(1)),
        );
    }

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
