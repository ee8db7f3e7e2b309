//! Orders and the total-amount invariant.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use coffee_run_core::{OrderId, OrderStatus, UserId};

use crate::models::order_item::PricedLine;

/// A placed order.
///
/// Invariant: `total_amount == sum(item subtotals) + donation`. The total is
/// recomputed by [`compute_total`] in every write path; it is never accepted
/// from input.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub titan_fund_donation: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Human-facing order number, e.g. `TCR-000042`.
    #[must_use]
    pub fn order_number(&self) -> String {
        format!("TCR-{:06}", self.id.as_i32())
    }

    /// Donation portion of the total (zero when absent).
    #[must_use]
    pub fn donation_amount(&self) -> Decimal {
        self.titan_fund_donation.unwrap_or(Decimal::ZERO)
    }

    /// Whether the owner may still cancel this order.
    #[must_use]
    pub const fn can_be_cancelled(&self) -> bool {
        self.status.can_be_cancelled()
    }
}

/// An order joined with its item count, for listing pages.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub order: Order,
    /// Total units across all lines (`SUM(quantity)`).
    pub items_count: i64,
}

/// Compute an order's total from its priced lines and optional donation.
#[must_use]
pub fn compute_total(lines: &[PricedLine], donation: Option<Decimal>) -> Decimal {
    let subtotal: Decimal = lines.iter().map(|line| line.subtotal).sum();
    subtotal + donation.unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffee_run_core::{CupSize, ProductId};

    fn line(quantity: i32, unit_price: Decimal) -> PricedLine {
        PricedLine {
            product_id: ProductId::new(1),
            size: CupSize::Medium,
            quantity,
            unit_price,
            subtotal: Decimal::from(quantity) * unit_price,
        }
    }

    #[test]
    fn test_total_is_sum_of_subtotals_plus_donation() {
        let lines = vec![
            line(2, Decimal::new(900, 2)),
            line(1, Decimal::new(500, 2)),
        ];
        let total = compute_total(&lines, Some(Decimal::new(300, 2)));
        assert_eq!(total, Decimal::new(2600, 2));
    }

    #[test]
    fn test_missing_donation_counts_as_zero() {
        let lines = vec![line(1, Decimal::new(500, 2))];
        assert_eq!(compute_total(&lines, None), Decimal::new(500, 2));
    }

    #[test]
    fn test_empty_order_total_is_donation() {
        assert_eq!(compute_total(&[], None), Decimal::ZERO);
        assert_eq!(
            compute_total(&[], Some(Decimal::new(100, 2))),
            Decimal::new(100, 2)
        );
    }

    #[test]
    fn test_order_number_padding() {
        let order = Order {
            id: OrderId::new(42),
            user_id: UserId::new(1),
            status: OrderStatus::Pending,
            total_amount: Decimal::new(900, 2),
            notes: None,
            titan_fund_donation: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(order.order_number(), "TCR-000042");
    }
}
