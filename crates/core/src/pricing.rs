//! Order pricing: shipping, tax, and total computation.
//!
//! Monetary fields are derived exactly once at order creation and never
//! silently recomputed after persistence. The invariant throughout is
//! `total = subtotal + shipping - discount + tax`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::money::round_money;

/// Orders at or above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(999, 0, 0, false, 0);

/// Flat shipping fee below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(99, 0, 0, false, 0);

/// GST rate applied to the discounted subtotal.
pub const TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// The monetary breakdown of an order, computed once at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// Compute totals from a subtotal and an already-bounded discount.
    ///
    /// Shipping is free at or above [`FREE_SHIPPING_THRESHOLD`], otherwise the
    /// flat fee applies. Tax is [`TAX_RATE`] of `(subtotal - discount)`,
    /// rounded to two decimal places.
    #[must_use]
    pub fn compute(subtotal: Decimal, discount: Decimal) -> Self {
        let shipping_cost = if subtotal >= FREE_SHIPPING_THRESHOLD {
            Decimal::ZERO
        } else {
            FLAT_SHIPPING_FEE
        };
        let tax = round_money(TAX_RATE * (subtotal - discount));
        let total = subtotal + shipping_cost - discount + tax;

        Self {
            subtotal,
            shipping_cost,
            discount,
            tax,
            total,
        }
    }

    /// Check the pricing invariant. Holds by construction; used by callers
    /// that re-load persisted orders.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.total == self.subtotal + self.shipping_cost - self.discount + self.tax
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_shipping_above_threshold() {
        let totals = Totals::compute(Decimal::from(1200), Decimal::ZERO);
        assert_eq!(totals.shipping_cost, Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::from(216));
        assert_eq!(totals.total, Decimal::from(1416));
    }

    #[test]
    fn test_flat_fee_below_threshold() {
        let totals = Totals::compute(Decimal::from(500), Decimal::ZERO);
        assert_eq!(totals.shipping_cost, Decimal::from(99));
        assert_eq!(totals.tax, Decimal::from(90));
        assert_eq!(totals.total, Decimal::from(689));
    }

    #[test]
    fn test_threshold_boundary_ships_free() {
        let totals = Totals::compute(Decimal::from(999), Decimal::ZERO);
        assert_eq!(totals.shipping_cost, Decimal::ZERO);
    }

    #[test]
    fn test_discount_reduces_tax_base() {
        // Tax applies to (subtotal - discount), not the raw subtotal.
        let totals = Totals::compute(Decimal::from(1000), Decimal::from(200));
        assert_eq!(totals.tax, Decimal::from(144));
        assert_eq!(totals.total, Decimal::from(944));
        assert!(totals.is_consistent());
    }

    #[test]
    fn test_invariant_holds_for_fractional_amounts() {
        let totals = Totals::compute(Decimal::new(123456, 2), Decimal::new(5050, 2));
        assert!(totals.is_consistent());
        // round2(0.18 * (1234.56 - 50.50)) = round2(213.1308) = 213.13
        assert_eq!(totals.tax, Decimal::new(21313, 2));
    }
}
