//! Coupon validation and discount calculation.
//!
//! The evaluator is stateless: callers load the coupon record and pass the
//! cart total plus the current time. Validation short-circuits in a fixed
//! order so callers get the most specific rejection reason.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::id::CouponId;
use crate::types::money::round_money;

/// How a coupon's value is applied to the cart total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `value` percent off the cart total, optionally capped.
    Percentage,
    /// A flat `value` off the cart total.
    Fixed,
}

/// A promotional coupon record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    pub active: bool,
    pub discount_type: DiscountType,
    /// Percent for [`DiscountType::Percentage`], rupees for [`DiscountType::Fixed`].
    pub value: Decimal,
    /// Upper bound on percentage discounts. Ignored for fixed discounts.
    pub max_discount_amount: Option<Decimal>,
    /// Minimum cart total required to apply this coupon.
    pub min_order_amount: Option<Decimal>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    /// Global redemption cap across all users.
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    /// Carried in the data model but not enforced against a user's order
    /// history in this code path.
    pub per_user_limit: Option<i32>,
}

/// Why a coupon was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    #[error("This coupon is no longer active")]
    Inactive,
    #[error("This coupon has expired")]
    Expired,
    #[error("This coupon is not yet valid")]
    NotStarted,
    #[error("This coupon has reached its usage limit")]
    UsageLimitReached,
    #[error("Minimum order amount of ₹{0} required for this coupon")]
    MinOrderNotMet(Decimal),
}

impl Coupon {
    /// Validate this coupon against a cart total and compute the discount.
    ///
    /// Validation order: active → not expired → already started → usage limit
    /// → minimum order amount. The returned discount is always within
    /// `0..=cart_total`, and percentage discounts respect
    /// `max_discount_amount` when set.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`CouponError`] in the chain above.
    pub fn evaluate(&self, cart_total: Decimal, now: DateTime<Utc>) -> Result<Decimal, CouponError> {
        if !self.active {
            return Err(CouponError::Inactive);
        }
        if self.valid_until.is_some_and(|until| until < now) {
            return Err(CouponError::Expired);
        }
        if self.valid_from.is_some_and(|from| from > now) {
            return Err(CouponError::NotStarted);
        }
        if self
            .usage_limit
            .is_some_and(|limit| self.used_count >= limit)
        {
            return Err(CouponError::UsageLimitReached);
        }
        if let Some(min) = self.min_order_amount {
            if cart_total < min {
                return Err(CouponError::MinOrderNotMet(min));
            }
        }

        let discount = match self.discount_type {
            DiscountType::Percentage => {
                let raw = round_money(cart_total * self.value / Decimal::from(100));
                match self.max_discount_amount {
                    Some(cap) => raw.min(cap),
                    None => raw,
                }
            }
            DiscountType::Fixed => self.value,
        };

        // A discount can never make the order total negative.
        Ok(discount.min(cart_total).max(Decimal::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn base_coupon() -> Coupon {
        Coupon {
            id: CouponId::generate(),
            code: "WELCOME10".to_string(),
            active: true,
            discount_type: DiscountType::Percentage,
            value: Decimal::from(10),
            max_discount_amount: None,
            min_order_amount: None,
            valid_from: None,
            valid_until: None,
            usage_limit: None,
            used_count: 0,
            per_user_limit: None,
        }
    }

    #[test]
    fn test_percentage_discount() {
        let coupon = base_coupon();
        let discount = coupon
            .evaluate(Decimal::from(1000), Utc::now())
            .expect("valid");
        assert_eq!(discount, Decimal::from(100));
    }

    #[test]
    fn test_percentage_discount_respects_cap() {
        let coupon = Coupon {
            max_discount_amount: Some(Decimal::from(50)),
            ..base_coupon()
        };
        let discount = coupon
            .evaluate(Decimal::from(1000), Utc::now())
            .expect("valid");
        assert_eq!(discount, Decimal::from(50));
    }

    #[test]
    fn test_fixed_discount_clamped_to_cart_total() {
        let coupon = Coupon {
            discount_type: DiscountType::Fixed,
            value: Decimal::from(500),
            ..base_coupon()
        };
        let discount = coupon
            .evaluate(Decimal::from(300), Utc::now())
            .expect("valid");
        assert_eq!(discount, Decimal::from(300));
    }

    #[test]
    fn test_inactive_rejected() {
        let coupon = Coupon {
            active: false,
            ..base_coupon()
        };
        assert_eq!(
            coupon.evaluate(Decimal::from(1000), Utc::now()),
            Err(CouponError::Inactive)
        );
    }

    #[test]
    fn test_expired_rejected() {
        let now = Utc::now();
        let coupon = Coupon {
            valid_until: Some(now - Duration::days(1)),
            ..base_coupon()
        };
        assert_eq!(
            coupon.evaluate(Decimal::from(1000), now),
            Err(CouponError::Expired)
        );
    }

    #[test]
    fn test_not_started_rejected() {
        let now = Utc::now();
        let coupon = Coupon {
            valid_from: Some(now + Duration::days(1)),
            ..base_coupon()
        };
        assert_eq!(
            coupon.evaluate(Decimal::from(1000), now),
            Err(CouponError::NotStarted)
        );
    }

    #[test]
    fn test_usage_limit_rejected() {
        let coupon = Coupon {
            usage_limit: Some(100),
            used_count: 100,
            ..base_coupon()
        };
        assert_eq!(
            coupon.evaluate(Decimal::from(1000), Utc::now()),
            Err(CouponError::UsageLimitReached)
        );
    }

    #[test]
    fn test_min_order_amount_rejected() {
        let coupon = Coupon {
            min_order_amount: Some(Decimal::from(500)),
            ..base_coupon()
        };
        assert_eq!(
            coupon.evaluate(Decimal::from(499), Utc::now()),
            Err(CouponError::MinOrderNotMet(Decimal::from(500)))
        );
        assert!(coupon.evaluate(Decimal::from(500), Utc::now()).is_ok());
    }

    #[test]
    fn test_discount_bounds_hold() {
        // 0 <= discount <= cart_total for a spread of carts and values.
        for (value, cart) in [(10i64, 50i64), (100, 1000), (250, 100)] {
            let coupon = Coupon {
                discount_type: DiscountType::Fixed,
                value: Decimal::from(value),
                ..base_coupon()
            };
            let cart_total = Decimal::from(cart);
            let discount = coupon.evaluate(cart_total, Utc::now()).expect("valid");
            assert!(discount >= Decimal::ZERO);
            assert!(discount <= cart_total);
        }
    }
}
