//! Admin sales dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;

use crate::db::{OrderRepository, ProductSales, SalesSummary};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{CurrentUser, Flash};
use crate::state::AppState;

/// Sales dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/sales.html")]
pub struct SalesTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash: Flash,
    pub summary: SalesSummary,
    pub by_product: Vec<ProductSales>,
}

/// `GET /admin/sales` - overall and month-to-date sales figures.
#[tracing::instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool());
    let summary = orders.sales_summary().await?;
    let by_product = orders.sales_by_product().await?;

    Ok(SalesTemplate {
        current_user: Some(admin),
        flash: Flash::take(&session).await,
        summary,
        by_product,
    })
}
