//! End-to-end pricing: coupon evaluation feeding the order totals.
//!
//! These cover the interaction the unit tests don't: a discount computed by
//! the coupon evaluator flowing into `Totals::compute` and landing on a
//! placed order.

use chrono::Utc;
use rust_decimal::Decimal;

use giftly_core::{
    Coupon, CouponError, CouponId, DiscountType, PaymentMethod, ProductId, Totals, UserId,
};
use giftly_server::models::{Order, OrderItem, ShippingAddress};

fn address() -> ShippingAddress {
    ShippingAddress {
        name: "Ravi Iyer".to_string(),
        phone: "9812345678".to_string(),
        address: "7 Brigade Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        pincode: "560001".to_string(),
        landmark: Some("Opposite the bakery".to_string()),
    }
}

fn percentage_coupon(value: i64, cap: Option<i64>) -> Coupon {
    Coupon {
        id: CouponId::generate(),
        code: "WELCOME10".to_string(),
        active: true,
        discount_type: DiscountType::Percentage,
        value: Decimal::from(value),
        max_discount_amount: cap.map(Decimal::from),
        min_order_amount: None,
        valid_from: None,
        valid_until: None,
        usage_limit: None,
        used_count: 0,
        per_user_limit: None,
    }
}

#[test]
fn test_discounted_order_totals() {
    // Two mugs at 600: subtotal 1200, free shipping
    let items = vec![OrderItem {
        product_id: ProductId::generate(),
        name: "Engraved Photo Frame".to_string(),
        slug: "engraved-photo-frame".to_string(),
        image: None,
        price: Decimal::from(600),
        quantity: 2,
        variant: None,
        customization: None,
    }];
    let subtotal: Decimal = items.iter().map(OrderItem::line_total).sum();
    assert_eq!(subtotal, Decimal::from(1200));

    let discount = percentage_coupon(10, None)
        .evaluate(subtotal, Utc::now())
        .expect("valid coupon");
    assert_eq!(discount, Decimal::from(120));

    let totals = Totals::compute(subtotal, discount);
    // tax = 18% of (1200 - 120) = 194.40; total = 1200 + 0 - 120 + 194.40
    assert_eq!(totals.shipping_cost, Decimal::ZERO);
    assert_eq!(totals.tax, Decimal::new(19_440, 2));
    assert_eq!(totals.total, Decimal::new(127_440, 2));

    let order = Order::place(
        "ORD1755950400000099".to_string(),
        UserId::generate(),
        items,
        totals,
        Some("WELCOME10".to_string()),
        PaymentMethod::Razorpay,
        address(),
        None,
    );
    assert_eq!(order.discount, Decimal::from(120));
    assert_eq!(order.total, Decimal::new(127_440, 2));
    assert_eq!(
        order.total,
        order.subtotal + order.shipping_cost - order.discount + order.tax
    );
}

#[test]
fn test_capped_discount_keeps_shipping_threshold_on_subtotal() {
    // Subtotal 1050 stays above the free-shipping threshold even though the
    // discount would bring it below: the threshold looks at subtotal only.
    let subtotal = Decimal::from(1050);
    let discount = percentage_coupon(20, Some(100))
        .evaluate(subtotal, Utc::now())
        .expect("valid coupon");
    assert_eq!(discount, Decimal::from(100));

    let totals = Totals::compute(subtotal, discount);
    assert_eq!(totals.shipping_cost, Decimal::ZERO);
    assert_eq!(totals.tax, Decimal::from(171));
    assert_eq!(totals.total, Decimal::from(1121));
}

#[test]
fn test_small_cart_pays_flat_shipping() {
    let subtotal = Decimal::from(500);
    let totals = Totals::compute(subtotal, Decimal::ZERO);
    assert_eq!(totals.shipping_cost, Decimal::from(99));
    assert_eq!(totals.tax, Decimal::from(90));
    assert_eq!(totals.total, Decimal::from(689));
}

#[test]
fn test_min_order_coupon_message_names_threshold() {
    let coupon = Coupon {
        min_order_amount: Some(Decimal::from(799)),
        ..percentage_coupon(10, None)
    };
    let err = coupon
        .evaluate(Decimal::from(500), Utc::now())
        .expect_err("below minimum");
    assert_eq!(err, CouponError::MinOrderNotMet(Decimal::from(799)));
    assert_eq!(
        err.to_string(),
        "Minimum order amount of ₹799 required for this coupon"
    );
}
