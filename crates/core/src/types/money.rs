//! Money helpers for INR amounts.
//!
//! All monetary values flow through the system as `rust_decimal::Decimal` in
//! rupees. These helpers cover the three places the representation changes:
//! rounding after tax/discount math, display formatting, and conversion to
//! paise for the payment gateway (which takes amounts in the smallest unit).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary amount to two decimal places (half away from zero).
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a rupee amount for display (e.g., `₹1416.00`).
#[must_use]
pub fn format_inr(amount: Decimal) -> String {
    format!("₹{:.2}", round_money(amount))
}

/// Convert a rupee amount to whole paise for the payment gateway.
///
/// The gateway API takes integer amounts in the smallest currency unit.
#[must_use]
pub fn to_paise(amount: Decimal) -> i64 {
    let paise = round_money(amount) * Decimal::from(100);
    paise.trunc().to_i64().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(
            round_money(Decimal::new(12345, 3)), // 12.345
            Decimal::new(1235, 2)                // 12.35
        );
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(Decimal::from(1416)), "₹1416.00");
        assert_eq!(format_inr(Decimal::new(9950, 2)), "₹99.50");
    }

    #[test]
    fn test_to_paise() {
        assert_eq!(to_paise(Decimal::from(1416)), 141_600);
        assert_eq!(to_paise(Decimal::new(9999, 2)), 9_999);
    }
}
