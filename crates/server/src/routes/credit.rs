//! Apply-for-credit flow.
//!
//! Open to anonymous visitors. A submission runs, in order: rate limit
//! check, field validation, qualification, persistence, limiter record,
//! then the two notification emails. Nothing persists and no email goes
//! out unless every earlier step passed.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, Flash, NewCreditApplication};
use crate::services::limiter::SubmissionLimiter;
use crate::services::qualify;
use crate::state::AppState;
use crate::validation::{FieldError, error_for};

/// Application form template.
#[derive(Template, WebTemplate)]
#[template(path = "credit/apply.html")]
pub struct CreditFormTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash: Flash,
    pub form: NewCreditApplication,
    pub errors: Vec<FieldError>,
}

impl CreditFormTemplate {
    /// First error message for a field, for inline annotations.
    fn error_on(&self, field: &str) -> Option<&str> {
        error_for(&self.errors, field)
    }
}

/// `GET /credit` - canonical entry point.
pub async fn entry() -> Redirect {
    Redirect::to("/credit/apply")
}

/// `GET /credit/apply` - render the application form.
pub async fn apply_form(
    OptionalAuth(current_user): OptionalAuth,
    session: Session,
) -> impl IntoResponse {
    CreditFormTemplate {
        current_user,
        flash: Flash::take(&session).await,
        form: NewCreditApplication::default(),
        errors: Vec::new(),
    }
}

/// `POST /credit` - submit an application.
#[tracing::instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    session: Session,
    Form(form): Form<NewCreditApplication>,
) -> Result<Response> {
    let key = SubmissionLimiter::identity_key(&form.email, &form.first_name, &form.last_name);
    if state.limiter().is_limited(&key) {
        tracing::info!("Credit application rate limited");
        Flash::alert(
            &session,
            "You have submitted too many applications. Please try again later.",
        )
        .await?;
        return Ok(Redirect::to("/credit/apply").into_response());
    }

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return Ok(CreditFormTemplate {
                current_user,
                flash: Flash::take(&session).await,
                form,
                errors,
            }
            .into_response());
        }
    };

    let qualification = qualify::qualify(valid.gross_income);

    let application = crate::db::CreditApplicationRepository::new(state.pool())
        .create(&valid, &qualification)
        .await?;

    // Count the submission only once it has been accepted and stored.
    state.limiter().record_submission(&key);

    tracing::info!(
        application_id = application.id.as_i32(),
        qualified = application.qualified,
        "Credit application received"
    );

    if let Some(mailer) = state.mailer() {
        if let Err(e) = mailer.send_new_application(&application).await {
            tracing::error!(error = %e, "Failed to send admin notification");
        }
        if let Err(e) = mailer.send_application_result(&application).await {
            tracing::error!(error = %e, "Failed to send applicant notification");
        }
    } else {
        tracing::warn!("SMTP not configured; skipping credit application emails");
    }

    if qualification.qualified {
        Flash::notice(&session, qualification.message).await?;
    } else {
        Flash::alert(&session, qualification.message).await?;
    }
    Ok(Redirect::to("/credit/apply").into_response())
}
