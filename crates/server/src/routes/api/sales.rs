//! Sales aggregates API (admin only).

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

use crate::db::{OrderRepository, ProductSales, SalesSummary};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

#[derive(Serialize)]
struct SalesResponse {
    summary: SalesSummary,
    by_product: Vec<ProductSales>,
}

/// `GET /api/v1/sales` - JSON sales aggregates.
///
/// Admin only: exposing per-product revenue to any signed-in user would
/// leak business data, so the endpoint shares the dashboard's access rule.
#[tracing::instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool());
    let summary = orders.sales_summary().await?;
    let by_product = orders.sales_by_product().await?;

    Ok(Json(SalesResponse {
        summary,
        by_product,
    }))
}
