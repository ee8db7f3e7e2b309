//! Admin product management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use coffee_run_core::{CupSize, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{CurrentUser, Flash, NewProduct, Product};
use crate::state::AppState;
use crate::validation::{FieldError, error_for};

/// Raw admin product form. Checkboxes arrive as `Some(_)` when ticked and
/// are absent otherwise.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    pub size_small: Option<String>,
    pub size_medium: Option<String>,
    pub size_large: Option<String>,
    pub active: Option<String>,
}

impl ProductForm {
    fn to_new_product(&self) -> NewProduct {
        let mut available_sizes = Vec::new();
        if self.size_small.is_some() {
            available_sizes.push(CupSize::Small);
        }
        if self.size_medium.is_some() {
            available_sizes.push(CupSize::Medium);
        }
        if self.size_large.is_some() {
            available_sizes.push(CupSize::Large);
        }

        NewProduct {
            name: self.name.clone(),
            price: self.price.trim().parse().ok(),
            available_sizes,
            active: self.active.is_some(),
        }
    }

    fn from_product(product: &Product) -> Self {
        let ticked = |size| product.offers_size(size).then(|| "on".to_owned());
        Self {
            name: product.name.clone(),
            price: format!("{:.2}", product.price),
            size_small: ticked(CupSize::Small),
            size_medium: ticked(CupSize::Medium),
            size_large: ticked(CupSize::Large),
            active: product.active.then(|| "on".to_owned()),
        }
    }
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/index.html")]
pub struct AdminProductsTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash: Flash,
    pub products: Vec<Product>,
}

/// New/edit form template, shared by both paths.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/form.html")]
pub struct ProductFormTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash: Flash,
    pub form: ProductForm,
    pub errors: Vec<FieldError>,
    /// Form POST target (`/admin/products` or `/admin/products/{id}`).
    pub action: String,
    pub heading: &'static str,
}

impl ProductFormTemplate {
    fn error_on(&self, field: &str) -> Option<&str> {
        error_for(&self.errors, field)
    }
}

/// `GET /admin/products` - all products, inactive included.
#[tracing::instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool()).list_all().await?;

    Ok(AdminProductsTemplate {
        current_user: Some(admin),
        flash: Flash::take(&session).await,
        products,
    })
}

/// `GET /admin/products/new` - blank product form.
pub async fn new(RequireAdmin(admin): RequireAdmin, session: Session) -> impl IntoResponse {
    ProductFormTemplate {
        current_user: Some(admin),
        flash: Flash::take(&session).await,
        form: ProductForm::default(),
        errors: Vec::new(),
        action: "/admin/products".to_owned(),
        heading: "New Product",
    }
}

/// `POST /admin/products` - create a product.
#[tracing::instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let new_product = form.to_new_product();
    let mut errors = new_product.validate();

    if errors.is_empty() {
        match ProductRepository::new(state.pool()).create(&new_product).await {
            Ok(product) => {
                tracing::info!(product_id = product.id.as_i32(), "Product created");
                Flash::notice(&session, format!("{} created.", product.name)).await?;
                return Ok(Redirect::to("/admin/products").into_response());
            }
            Err(RepositoryError::Conflict(message)) => {
                errors.push(FieldError::new("name", message));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(ProductFormTemplate {
        current_user: Some(admin),
        flash: Flash::take(&session).await,
        form,
        errors,
        action: "/admin/products".to_owned(),
        heading: "New Product",
    }
    .into_response())
}

/// `GET /admin/products/{id}/edit` - prefilled product form.
#[tracing::instrument(skip_all, fields(product_id = id))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductFormTemplate {
        current_user: Some(admin),
        flash: Flash::take(&session).await,
        form: ProductForm::from_product(&product),
        errors: Vec::new(),
        action: format!("/admin/products/{id}"),
        heading: "Edit Product",
    }
    .into_response())
}

/// `POST /admin/products/{id}` - update a product.
#[tracing::instrument(skip_all, fields(product_id = id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let changes = form.to_new_product();
    let mut errors = changes.validate();

    if errors.is_empty() {
        match ProductRepository::new(state.pool())
            .update(ProductId::new(id), &changes)
            .await
        {
            Ok(product) => {
                tracing::info!(product_id = product.id.as_i32(), "Product updated");
                Flash::notice(&session, format!("{} updated.", product.name)).await?;
                return Ok(Redirect::to("/admin/products").into_response());
            }
            Err(RepositoryError::NotFound) => {
                return Err(AppError::NotFound(format!("product {id}")));
            }
            Err(RepositoryError::Conflict(message)) => {
                errors.push(FieldError::new("name", message));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(ProductFormTemplate {
        current_user: Some(admin),
        flash: Flash::take(&session).await,
        form,
        errors,
        action: format!("/admin/products/{id}"),
        heading: "Edit Product",
    }
    .into_response())
}

/// `POST /admin/products/{id}/delete` - delete a product.
///
/// Products with order history cannot be deleted; the conflict surfaces as
/// a flash alert suggesting deactivation.
#[tracing::instrument(skip_all, fields(product_id = id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response> {
    match ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await
    {
        Ok(true) => {
            tracing::info!(product_id = id, "Product deleted");
            Flash::notice(&session, "Product deleted.").await?;
        }
        Ok(false) => return Err(AppError::NotFound(format!("product {id}"))),
        Err(RepositoryError::Conflict(message)) => {
            Flash::alert(&session, message).await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/products").into_response())
}
