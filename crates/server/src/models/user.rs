//! User account model.

use chrono::{DateTime, Utc};

use coffee_run_core::{Email, UserId};

/// A registered user.
///
/// The password hash never leaves the repository layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    /// Admins can manage products and see every order.
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
