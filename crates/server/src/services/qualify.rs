//! Credit qualification decision.
//!
//! A pure function of declared gross income; nothing else (credit score,
//! debt, etc.) is modeled.

use rust_decimal::{Decimal, RoundingStrategy};

/// Minimum annual gross income to qualify.
const QUALIFYING_INCOME: Decimal = Decimal::from_parts(20_000, 0, 0, false, 0);

/// Credit limit cap in dollars.
const CREDIT_LIMIT_CAP: Decimal = Decimal::from_parts(5_000, 0, 0, false, 0);

/// Fraction of income granted as the credit limit (10%).
const LIMIT_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

const QUALIFIED_MESSAGE: &str = "Congratulations! You are qualified for a credit line. \
     A credit card will be sent to you in the mail.";

const NOT_QUALIFIED_MESSAGE: &str =
    "We're sorry, you do not qualify for a credit line at this time.";

/// Outcome of a qualification decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualification {
    pub qualified: bool,
    pub credit_limit: Decimal,
    pub message: &'static str,
}

/// Decide qualification from gross income.
///
/// Qualified iff income >= 20 000. The limit is 10% of income rounded
/// half-up to whole dollars, capped at 5 000; unqualified applicants get 0.
#[must_use]
pub fn qualify(gross_income: Decimal) -> Qualification {
    if gross_income >= QUALIFYING_INCOME {
        Qualification {
            qualified: true,
            credit_limit: credit_limit(gross_income),
            message: QUALIFIED_MESSAGE,
        }
    } else {
        Qualification {
            qualified: false,
            credit_limit: Decimal::ZERO,
            message: NOT_QUALIFIED_MESSAGE,
        }
    }
}

/// 10% of annual income, rounded to whole dollars, max $5000.
fn credit_limit(gross_income: Decimal) -> Decimal {
    let limit = (gross_income * LIMIT_RATE)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    limit.min(CREDIT_LIMIT_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dollars(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn test_boundary_income_qualifies() {
        let result = qualify(dollars(20_000));
        assert!(result.qualified);
        assert_eq!(result.credit_limit, dollars(2_000));
        assert_eq!(result.message, QUALIFIED_MESSAGE);
    }

    #[test]
    fn test_below_threshold_not_qualified() {
        for income in [0, 1, 19_999] {
            let result = qualify(dollars(income));
            assert!(!result.qualified, "income {income}");
            assert_eq!(result.credit_limit, Decimal::ZERO);
            assert_eq!(result.message, NOT_QUALIFIED_MESSAGE);
        }
    }

    #[test]
    fn test_limit_is_ten_percent_of_income() {
        assert_eq!(qualify(dollars(25_000)).credit_limit, dollars(2_500));
        assert_eq!(qualify(dollars(30_000)).credit_limit, dollars(3_000));
    }

    #[test]
    fn test_cap_applies_from_fifty_thousand() {
        assert_eq!(qualify(dollars(50_000)).credit_limit, dollars(5_000));
        assert_eq!(qualify(dollars(100_000)).credit_limit, dollars(5_000));
        assert_eq!(qualify(dollars(1_000_000)).credit_limit, dollars(5_000));
    }

    #[test]
    fn test_limit_rounds_half_up_to_whole_dollars() {
        // 10% of 20_005 = 2000.50 -> 2001
        assert_eq!(qualify(dollars(20_005)).credit_limit, dollars(2_001));
        // 10% of 20_004 = 2000.40 -> 2000
        assert_eq!(qualify(dollars(20_004)).credit_limit, dollars(2_000));
    }
}
