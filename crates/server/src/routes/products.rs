//! Product listing for the storefront.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Cart, CurrentUser, Flash, Product};
use crate::routes::api::cart_items::{CartView, build_cart_view};
use crate::state::AppState;

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash: Flash,
    pub products: Vec<Product>,
    pub cart: CartView,
}

/// Display active products with the current cart snapshot.
#[tracing::instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool()).list_active().await?;
    let cart = Cart::load(&session).await;
    let cart = build_cart_view(&state, &cart).await?;

    Ok(ProductsTemplate {
        current_user: Some(user),
        flash: Flash::take(&session).await,
        products,
        cart,
    })
}
