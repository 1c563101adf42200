use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use cendres_order::{Cart, CartItem, Order};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: u64,
}

fn default_quantity() -> u64 { 1 }

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u64,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer_email: String,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub id: Uuid,
    pub items: Vec<CartItem>,
    pub item_count: u64,
    pub subtotal: f64,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            id: cart.id,
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
            items: cart.items,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/carts", post(create_cart))
        .route("/v1/carts/{id}", get(get_cart))
        .route("/v1/carts/{id}/items", post(add_item))
        .route("/v1/carts/{id}/items/{product_id}", put(set_quantity).delete(remove_item))
        .route("/v1/carts/{id}/checkout", post(checkout))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/carts
pub async fn create_cart(State(state): State<AppState>) -> (StatusCode, Json<CartResponse>) {
    let cart = state.checkout().create_cart().await;
    (StatusCode::CREATED, Json(cart.into()))
}

/// GET /v1/carts/{id}
pub async fn get_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
) -> Result<Json<CartResponse>, AppError> {
    Ok(Json(state.checkout().get_cart(cart_id).await?.into()))
}

/// POST /v1/carts/{id}/items
pub async fn add_item(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, AppError> {
    let cart = state.checkout().add_item(cart_id, req.product_id, req.quantity).await?;
    Ok(Json(cart.into()))
}

/// PUT /v1/carts/{id}/items/{product_id}
pub async fn set_quantity(
    State(state): State<AppState>,
    Path((cart_id, product_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SetQuantityRequest>,
) -> Result<Json<CartResponse>, AppError> {
    let cart = state.checkout().set_quantity(cart_id, product_id, req.quantity).await?;
    Ok(Json(cart.into()))
}

/// DELETE /v1/carts/{id}/items/{product_id}
pub async fn remove_item(
    State(state): State<AppState>,
    Path((cart_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CartResponse>, AppError> {
    let cart = state.checkout().remove_item(cart_id, product_id).await?;
    Ok(Json(cart.into()))
}

/// POST /v1/carts/{id}/checkout
pub async fn checkout(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.checkout().checkout(cart_id, &req.customer_email).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
