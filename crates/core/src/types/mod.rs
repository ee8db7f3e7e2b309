//! Shared domain types.

pub mod email;
pub mod id;
pub mod size;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{CreditApplicationId, OrderId, OrderItemId, ProductId, UserId};
pub use size::{CupSize, CupSizeError};
pub use status::{OrderStatus, OrderStatusError};
