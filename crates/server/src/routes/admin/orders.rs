//! Admin order management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use coffee_run_core::{OrderId, OrderStatus};

use crate::db::{OrderRepository, OrderWithUser};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{CurrentUser, Flash, Order, OrderItem};
use crate::state::AppState;

/// All-orders listing template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders/index.html")]
pub struct AdminOrdersTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash: Flash,
    pub orders: Vec<OrderWithUser>,
}

/// Admin order detail template, with a status-change form.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders/show.html")]
pub struct AdminOrderTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash: Flash,
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub statuses: Vec<OrderStatus>,
}

/// Status-update form data.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderForm {
    pub status: String,
}

/// `GET /admin/orders` - every order with its owner.
#[tracing::instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;

    Ok(AdminOrdersTemplate {
        current_user: Some(admin),
        flash: Flash::take(&session).await,
        orders,
    })
}

/// `GET /admin/orders/{id}` - order detail.
#[tracing::instrument(skip_all, fields(order_id = id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    let items = repo.get_items(order.id).await?;

    Ok(AdminOrderTemplate {
        current_user: Some(admin),
        flash: Flash::take(&session).await,
        order,
        items,
        statuses: OrderStatus::ALL.to_vec(),
    }
    .into_response())
}

/// `POST /admin/orders/{id}` - change an order's status.
#[tracing::instrument(skip_all, fields(order_id = id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<UpdateOrderForm>,
) -> Result<Response> {
    let status: OrderStatus = form
        .status
        .parse()
        .map_err(|_| AppError::BadRequest(format!("unknown status: {}", form.status)))?;

    let order = OrderRepository::new(state.pool())
        .update_status(OrderId::new(id), status)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound(format!("order {id}")),
            other => other.into(),
        })?;

    tracing::info!(order_id = order.id.as_i32(), status = %status, "Order status updated");
    Flash::notice(
        &session,
        format!("Order {} marked {status}.", order.order_number()),
    )
    .await?;
    Ok(Redirect::to(&format!("/admin/orders/{id}")).into_response())
}
