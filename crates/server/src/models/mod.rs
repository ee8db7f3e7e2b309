//! Domain models and session-scoped types.

pub mod cart;
pub mod credit_application;
pub mod flash;
pub mod order;
pub mod order_item;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem};
pub use credit_application::{CreditApplication, NewCreditApplication, ValidCreditApplication};
pub use flash::Flash;
pub use order::{Order, OrderSummary, compute_total};
pub use order_item::{NewOrderItem, OrderItem, PricedLine};
pub use product::{NewProduct, Product};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
