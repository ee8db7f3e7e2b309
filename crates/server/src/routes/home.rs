//! Landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, Flash};

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash: Flash,
}

/// Display the landing page.
pub async fn home(OptionalAuth(current_user): OptionalAuth, session: Session) -> impl IntoResponse {
    HomeTemplate {
        current_user,
        flash: Flash::take(&session).await,
    }
}
