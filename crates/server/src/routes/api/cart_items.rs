//! Cart mutation API.
//!
//! Every mutation returns the full cart snapshot so the client can redraw
//! its cart widget from one response:
//!
//! ```json
//! { "success": true,
//!   "cart": { "items": [...], "total_items": 3, "total_amount": "26.00" } }
//! ```
//!
//! Prices in the snapshot are resolved against the products table at
//! request time; the session cart itself never stores prices.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use coffee_run_core::{CupSize, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Cart;
use crate::state::AppState;

/// One priced line in the cart snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product_id: i32,
    pub product_name: String,
    pub size: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// The full cart snapshot returned by every mutation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total_items: u32,
    pub total_amount: Decimal,
}

#[derive(Serialize)]
struct CartResponse {
    success: bool,
    cart: CartView,
}

/// Price the session cart against the products table.
///
/// # Errors
///
/// Returns `AppError::NotFound` when a cart line references a product that
/// no longer exists.
pub async fn build_cart_view(state: &AppState, cart: &Cart) -> Result<CartView> {
    let products = ProductRepository::new(state.pool());
    let mut items = Vec::with_capacity(cart.items.len());
    let mut total_amount = Decimal::ZERO;

    for line in &cart.items {
        let product = products
            .get(line.product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {}", line.product_id.as_i32())))?;

        let line_total = product.price * Decimal::from(line.quantity);
        total_amount += line_total;
        items.push(CartLineView {
            product_id: line.product_id.as_i32(),
            product_name: product.name,
            size: line.size.as_str().to_owned(),
            quantity: line.quantity,
            unit_price: product.price,
            line_total,
        });
    }

    Ok(CartView {
        items,
        total_items: cart.total_items(),
        total_amount,
    })
}

async fn cart_response(state: &AppState, cart: &Cart) -> Result<Response> {
    let view = build_cart_view(state, cart).await?;
    Ok(Json(CartResponse {
        success: true,
        cart: view,
    })
    .into_response())
}

fn rejection(message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({ "success": false, "error": message })),
    )
        .into_response()
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct CreateCartItem {
    pub product_id: i32,
    pub size: CupSize,
    pub quantity: u32,
}

/// Quantity-update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartItem {
    pub size: Option<CupSize>,
    pub quantity: u32,
}

/// Size selector for removals, e.g. `DELETE /api/v1/cart_items/3?size=Large`.
#[derive(Debug, Deserialize)]
pub struct SizeQuery {
    pub size: Option<CupSize>,
}

/// `POST /api/v1/cart_items` - add a line to the cart.
#[tracing::instrument(skip_all, fields(product_id = body.product_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    session: Session,
    Json(body): Json<CreateCartItem>,
) -> Result<Response> {
    if body.quantity == 0 {
        return Ok(rejection("quantity must be greater than 0"));
    }

    let product_id = ProductId::new(body.product_id);
    let product = ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    if !product.offers_size(body.size) {
        return Ok(rejection("size is not available for this product"));
    }

    let mut cart = Cart::load(&session).await;
    cart.add(product_id, body.size, body.quantity);
    cart.save(&session).await?;

    cart_response(&state, &cart).await
}

/// `PATCH /api/v1/cart_items/{product_id}` - set a line's quantity.
///
/// Quantity 0 removes the line.
#[tracing::instrument(skip_all, fields(product_id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    session: Session,
    Path(product_id): Path<i32>,
    Json(body): Json<UpdateCartItem>,
) -> Result<Response> {
    let mut cart = Cart::load(&session).await;
    if !cart.set_quantity(ProductId::new(product_id), body.size, body.quantity) {
        return Err(AppError::NotFound(format!("cart item {product_id}")));
    }
    cart.save(&session).await?;

    cart_response(&state, &cart).await
}

/// `DELETE /api/v1/cart_items/{product_id}` - remove a line (or all of a
/// product's lines when no size is given).
#[tracing::instrument(skip_all, fields(product_id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    session: Session,
    Path(product_id): Path<i32>,
    Query(query): Query<SizeQuery>,
) -> Result<Response> {
    let mut cart = Cart::load(&session).await;
    if !cart.remove(ProductId::new(product_id), query.size) {
        return Err(AppError::NotFound(format!("cart item {product_id}")));
    }
    cart.save(&session).await?;

    cart_response(&state, &cart).await
}
