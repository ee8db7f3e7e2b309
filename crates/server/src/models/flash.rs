//! One-request flash messages carried in the session.
//!
//! Set on the request that redirects, consumed (removed) by the request
//! that renders.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Transient user-facing messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Flash {
    pub notice: Option<String>,
    pub alert: Option<String>,
}

impl Flash {
    /// Queue a success/notice message for the next rendered page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn notice(
        session: &Session,
        message: impl Into<String>,
    ) -> Result<(), tower_sessions::session::Error> {
        let mut flash: Self = session
            .get(session_keys::FLASH)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        flash.notice = Some(message.into());
        session.insert(session_keys::FLASH, flash).await
    }

    /// Queue an alert/error message for the next rendered page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn alert(
        session: &Session,
        message: impl Into<String>,
    ) -> Result<(), tower_sessions::session::Error> {
        let mut flash: Self = session
            .get(session_keys::FLASH)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        flash.alert = Some(message.into());
        session.insert(session_keys::FLASH, flash).await
    }

    /// Take the pending flash, clearing it from the session.
    pub async fn take(session: &Session) -> Self {
        session
            .remove::<Self>(session_keys::FLASH)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }
}
