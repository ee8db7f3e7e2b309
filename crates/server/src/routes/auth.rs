//! Authentication route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, Flash, User};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash: Flash,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash: Flash,
}

/// Where a user lands after signing in.
fn post_login_destination(user: &User) -> &'static str {
    if user.admin { "/admin/sales" } else { "/products" }
}

/// Display the login page.
pub async fn login_page(session: Session) -> impl IntoResponse {
    LoginTemplate {
        current_user: None,
        flash: Flash::take(&session).await,
    }
}

/// Handle login form submission.
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());
    match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            let current = CurrentUser::from(&user);
            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("Failed to set session: {}", e);
                let _ = Flash::alert(&session, "Something went wrong. Please try again.").await;
                return Redirect::to("/auth/login").into_response();
            }
            set_sentry_user(&user.id, Some(user.email.as_str()));

            tracing::info!(user_id = user.id.as_i32(), "User logged in");
            Redirect::to(post_login_destination(&user)).into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            let _ = Flash::alert(&session, "Invalid email or password.").await;
            Redirect::to("/auth/login").into_response()
        }
    }
}

/// Display the registration page.
pub async fn register_page(session: Session) -> impl IntoResponse {
    RegisterTemplate {
        current_user: None,
        flash: Flash::take(&session).await,
    }
}

/// Handle registration form submission.
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        let _ = Flash::alert(&session, "Passwords do not match.").await;
        return Redirect::to("/auth/register").into_response();
    }

    let auth = AuthService::new(state.pool());
    match auth.register(&form.email, &form.password).await {
        Ok(user) => {
            let current = CurrentUser::from(&user);
            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("Failed to set session: {}", e);
                let _ = Flash::alert(&session, "Something went wrong. Please sign in.").await;
                return Redirect::to("/auth/login").into_response();
            }
            set_sentry_user(&user.id, Some(user.email.as_str()));

            tracing::info!(user_id = user.id.as_i32(), "User registered");
            Redirect::to(post_login_destination(&user)).into_response()
        }
        Err(e) => {
            let message = match &e {
                AuthError::UserAlreadyExists => "An account with this email already exists.",
                AuthError::WeakPassword(_) => "Password must be at least 8 characters.",
                AuthError::InvalidEmail(_) => "Please enter a valid email address.",
                _ => "Registration failed. Please try again.",
            };
            tracing::warn!("Registration failed: {}", e);
            let _ = Flash::alert(&session, message).await;
            Redirect::to("/auth/register").into_response()
        }
    }
}

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    // Also destroy the entire session (cart included)
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }
    clear_sentry_user();

    Redirect::to("/").into_response()
}
