//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Landing page
//! GET  /up                      - Liveness probe
//! GET  /up/ready                - Readiness probe (checks the database)
//!
//! # Storefront (requires auth)
//! GET  /products                - Active product listing + cart snapshot
//! GET  /orders                  - Current user's orders
//! GET  /orders/{id}             - Order detail
//! POST /orders                  - Place an order from the session cart
//! POST /orders/{id}/cancel      - Cancel own order while cancellable
//!
//! # Cart API (JSON, requires auth)
//! POST   /api/v1/cart_items                - Add a line
//! PATCH  /api/v1/cart_items/{product_id}   - Set a line's quantity
//! DELETE /api/v1/cart_items/{product_id}   - Remove a line
//!
//! # Sales API (JSON, admin only)
//! GET  /api/v1/sales            - Sales aggregates
//!
//! # Credit (no auth)
//! GET  /credit                  - Redirect to /credit/apply
//! GET  /credit/apply            - Application form
//! POST /credit                  - Submit application
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! GET  /auth/register           - Register page
//! POST /auth/register           - Register action
//! POST /auth/logout             - Logout action
//!
//! # Admin (admin only)
//! GET  /admin/sales             - Sales dashboard
//! GET  /admin/products          - Product listing
//! GET  /admin/products/new      - New product form
//! POST /admin/products          - Create product
//! GET  /admin/products/{id}/edit - Edit product form
//! POST /admin/products/{id}     - Update product
//! POST /admin/products/{id}/delete - Delete product
//! GET  /admin/orders            - All orders
//! GET  /admin/orders/{id}       - Order detail
//! POST /admin/orders/{id}       - Update order status
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod credit;
pub mod health;
pub mod home;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show))
        .route("/{id}/cancel", post(orders::cancel))
}

/// Create the credit application routes router.
pub fn credit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(credit::entry).post(credit::submit))
        .route("/apply", get(credit::apply_form))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/cart_items", post(api::cart_items::create))
        .route(
            "/cart_items/{product_id}",
            axum::routing::patch(api::cart_items::update).delete(api::cart_items::destroy),
        )
        .route("/sales", get(api::sales::show))
}

/// Create the admin router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(admin::sales::show))
        .route(
            "/products",
            get(admin::products::index).post(admin::products::create),
        )
        .route("/products/new", get(admin::products::new))
        .route("/products/{id}/edit", get(admin::products::edit))
        .route("/products/{id}", post(admin::products::update))
        .route("/products/{id}/delete", post(admin::products::destroy))
        .route("/orders", get(admin::orders::index))
        .route(
            "/orders/{id}",
            get(admin::orders::show).post(admin::orders::update),
        )
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/up", get(health::liveness))
        .route("/up/ready", get(health::readiness))
        .route("/products", get(products::index))
        .nest("/orders", order_routes())
        .nest("/credit", credit_routes())
        .nest("/api/v1", api_routes())
        .nest("/admin", admin_routes())
        .nest("/auth", auth_routes())
}
