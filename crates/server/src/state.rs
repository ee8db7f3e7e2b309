//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::email::EmailService;
use crate::services::limiter::SubmissionLimiter;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    mailer: Option<EmailService>,
    limiter: SubmissionLimiter,
}

impl AppState {
    /// Create a new application state.
    ///
    /// `mailer` is `None` when SMTP is not configured; credit-application
    /// notifications are then skipped with a warning.
    #[must_use]
    pub fn new(config: AppConfig, pool: PgPool, mailer: Option<EmailService>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                mailer,
                limiter: SubmissionLimiter::new(),
            }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the email service, if SMTP is configured.
    #[must_use]
    pub fn mailer(&self) -> Option<&EmailService> {
        self.inner.mailer.as_ref()
    }

    /// Get the credit-application submission limiter.
    #[must_use]
    pub fn limiter(&self) -> &SubmissionLimiter {
        &self.inner.limiter
    }
}
