//! Application services.

pub mod auth;
pub mod email;
pub mod limiter;
pub mod qualify;

pub use auth::{AuthError, AuthService};
pub use email::{EmailError, EmailService};
pub use limiter::SubmissionLimiter;
pub use qualify::{Qualification, qualify};
