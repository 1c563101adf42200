use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use cendres_catalog::{PriceQuote, PricingInput, PricingResult};

use crate::catalog::RepriceOutcome;
use crate::error::AppError;
use crate::state::AppState;
use crate::stream;

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub category: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/products", get(list_products))
        .route("/v1/products/stream", get(stream::price_stream))
        .route("/v1/products/{id}", get(get_product))
        .route("/v1/products/{id}/reprice", post(reprice_product))
        .route("/v1/pricing/quote", post(quote))
}

/// GET /v1/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<PriceQuote>>, AppError> {
    let quotes = state.catalog().list_quotes(query.category.as_deref()).await?;
    Ok(Json(quotes))
}

/// GET /v1/products/{id}
/// Counts as a product view
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<PriceQuote>, AppError> {
    Ok(Json(state.catalog().view_product(product_id).await?))
}

/// POST /v1/products/{id}/reprice
pub async fn reprice_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<RepriceOutcome>, AppError> {
    Ok(Json(state.catalog().reprice(product_id).await?))
}

/// POST /v1/pricing/quote
/// Run the engine on caller-supplied signals; nothing is stored
pub async fn quote(
    State(state): State<AppState>,
    Json(input): Json<PricingInput>,
) -> Json<PricingResult> {
    Json(state.pricing.calculate_new_price(&input))
}
