//! Authorization policy for orders.
//!
//! A pure function consulted explicitly at each entry point: admins may do
//! anything; everyone else is limited to their own orders, and may cancel
//! only while the order is still cancellable.

use crate::models::{CurrentUser, Order};

/// Actions a user can attempt on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// View the order.
    Show,
    /// Cancel the order (owner-initiated update).
    Cancel,
    /// Change status or other fields (admin).
    Update,
    /// Delete the order.
    Destroy,
}

/// Authorization denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{}", Denied::MESSAGE)]
pub struct Denied;

impl Denied {
    /// The fixed user-facing denial message.
    pub const MESSAGE: &'static str = "You are not authorized to perform this action.";
}

/// Decide whether `user` may perform `action` on `order`.
///
/// # Errors
///
/// Returns [`Denied`] when the action is not allowed.
pub fn authorize(user: &CurrentUser, order: &Order, action: OrderAction) -> Result<(), Denied> {
    if user.admin {
        return Ok(());
    }

    let owns = order.user_id == user.id;
    let allowed = match action {
        OrderAction::Show => owns,
        OrderAction::Cancel => owns && order.can_be_cancelled(),
        OrderAction::Update | OrderAction::Destroy => false,
    };

    if allowed { Ok(()) } else { Err(Denied) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use coffee_run_core::{Email, OrderId, OrderStatus, UserId};
    use rust_decimal::Decimal;

    fn user(id: i32, admin: bool) -> CurrentUser {
        CurrentUser {
            id: UserId::new(id),
            email: Email::parse("user@titanscoffee.com").expect("valid email"),
            admin,
        }
    }

    fn order(user_id: i32, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(1),
            user_id: UserId::new(user_id),
            status,
            total_amount: Decimal::new(900, 2),
            notes: None,
            titan_fund_donation: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_allowed_everything() {
        let admin = user(1, true);
        let other = order(2, OrderStatus::Completed);
        for action in [
            OrderAction::Show,
            OrderAction::Cancel,
            OrderAction::Update,
            OrderAction::Destroy,
        ] {
            assert!(authorize(&admin, &other, action).is_ok());
        }
    }

    #[test]
    fn test_owner_can_show() {
        let owner = user(1, false);
        assert!(authorize(&owner, &order(1, OrderStatus::Completed), OrderAction::Show).is_ok());
    }

    #[test]
    fn test_non_owner_denied_show_and_cancel() {
        let stranger = user(3, false);
        let target = order(1, OrderStatus::Pending);
        assert_eq!(
            authorize(&stranger, &target, OrderAction::Show),
            Err(Denied)
        );
        assert_eq!(
            authorize(&stranger, &target, OrderAction::Cancel),
            Err(Denied)
        );
    }

    #[test]
    fn test_owner_cancel_only_while_cancellable() {
        let owner = user(1, false);
        assert!(authorize(&owner, &order(1, OrderStatus::Pending), OrderAction::Cancel).is_ok());
        assert!(authorize(&owner, &order(1, OrderStatus::Confirmed), OrderAction::Cancel).is_ok());
        assert!(
            authorize(&owner, &order(1, OrderStatus::Preparing), OrderAction::Cancel).is_err()
        );
        assert!(
            authorize(&owner, &order(1, OrderStatus::Completed), OrderAction::Cancel).is_err()
        );
    }

    #[test]
    fn test_owner_never_updates_or_destroys() {
        let owner = user(1, false);
        let own = order(1, OrderStatus::Pending);
        assert!(authorize(&owner, &own, OrderAction::Update).is_err());
        assert!(authorize(&owner, &own, OrderAction::Destroy).is_err());
    }
}
