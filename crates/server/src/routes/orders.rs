//! Order routes for the current user.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;

use coffee_run_core::{OrderId, OrderStatus};

use crate::db::{OrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{
    Cart, CurrentUser, Flash, NewOrderItem, Order, OrderItem, OrderSummary, PricedLine,
};
use crate::policy::{self, OrderAction};
use crate::state::AppState;

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash: Flash,
    pub orders: Vec<OrderSummary>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash: Flash,
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Checkout form accompanying `POST /orders`.
#[derive(Debug, Deserialize)]
pub struct CreateOrderForm {
    pub notes: Option<String>,
    pub titan_fund_donation: Option<Decimal>,
}

/// `GET /orders` - the current user's order history.
#[tracing::instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(OrdersTemplate {
        current_user: Some(user),
        flash: Flash::take(&session).await,
        orders,
    })
}

/// `GET /orders/{id}` - order detail, owner or admin only.
#[tracing::instrument(skip_all, fields(order_id = id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if policy::authorize(&user, &order, OrderAction::Show).is_err() {
        Flash::alert(&session, policy::Denied::MESSAGE).await?;
        return Ok(Redirect::to("/orders").into_response());
    }

    let items = repo.get_items(order.id).await?;

    Ok(OrderTemplate {
        current_user: Some(user),
        flash: Flash::take(&session).await,
        order,
        items,
    }
    .into_response())
}

/// `POST /orders` - place an order from the session cart.
///
/// Prices every cart line against the products table, persists the order
/// and its items in one transaction, then clears the cart.
#[tracing::instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<CreateOrderForm>,
) -> Result<Response> {
    let cart = Cart::load(&session).await;
    if cart.is_empty() {
        Flash::alert(&session, "Your cart is empty.").await?;
        return Ok(Redirect::to("/products").into_response());
    }

    let donation = form.titan_fund_donation.filter(|d| *d > Decimal::ZERO);
    let notes = form
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let products = ProductRepository::new(state.pool());
    let mut lines: Vec<PricedLine> = Vec::with_capacity(cart.items.len());
    for item in &cart.items {
        let product = products.get(item.product_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("product {}", item.product_id.as_i32()))
        })?;

        let quantity = i32::try_from(item.quantity)
            .map_err(|_| AppError::BadRequest("quantity out of range".to_owned()))?;
        let line = NewOrderItem {
            product_id: item.product_id,
            size: item.size,
            quantity,
            unit_price: None,
        };
        match line.price(&product) {
            Ok(priced) => lines.push(priced),
            Err(errors) => {
                let detail = errors
                    .first()
                    .map_or_else(|| "invalid item".to_owned(), |e| e.to_string());
                Flash::alert(&session, format!("{}: {detail}", product.name)).await?;
                return Ok(Redirect::to("/products").into_response());
            }
        }
    }

    let order = OrderRepository::new(state.pool())
        .create_with_items(user.id, &lines, notes, donation)
        .await?;
    Cart::clear(&session).await?;
    notify_order_placed(&order);

    Flash::notice(&session, format!("Order {} placed!", order.order_number())).await?;
    Ok(Redirect::to(&format!("/orders/{}", order.id.as_i32())).into_response())
}

/// Order confirmation hook. Delivery is not wired up yet, so the event is
/// only logged.
fn notify_order_placed(order: &Order) {
    tracing::info!(
        order = %order.order_number(),
        total = %order.total_amount,
        "Order placed"
    );
}

/// `POST /orders/{id}/cancel` - owner cancellation while still cancellable.
#[tracing::instrument(skip_all, fields(order_id = id))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if policy::authorize(&user, &order, OrderAction::Cancel).is_err() {
        Flash::alert(&session, policy::Denied::MESSAGE).await?;
        return Ok(Redirect::to("/orders").into_response());
    }

    let order = repo.update_status(order.id, OrderStatus::Cancelled).await?;

    tracing::info!(order_id = order.id.as_i32(), "Order cancelled");
    Flash::notice(&session, format!("Order {} cancelled.", order.order_number())).await?;
    Ok(Redirect::to(&format!("/orders/{id}")).into_response())
}
