//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use rust_decimal::Decimal;

/// Formats a decimal dollar amount as `$X.XX`.
///
/// Usage in templates: `{{ product.price|money }}`
#[askama::filter_fn]
pub fn money(amount: &Decimal, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(amount))
}

pub(crate) fn format_money(amount: &Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formats_two_decimal_places() {
        assert_eq!(format_money(&Decimal::new(900, 2)), "$9.00");
        assert_eq!(format_money(&Decimal::new(45, 1)), "$4.50");
        assert_eq!(format_money(&Decimal::new(2600, 2)), "$26.00");
        assert_eq!(format_money(&Decimal::new(5000, 0)), "$5000.00");
    }
}
