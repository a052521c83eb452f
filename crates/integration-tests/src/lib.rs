//! Integration tests for Giftly.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p giftly-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `order_lifecycle` - Full status/payment flows through the state machine
//! - `webhook_reconciliation` - Signature verification and event application
//! - `pricing_and_coupons` - Totals math and coupon evaluation
//! - `stock_reservation` - Decrement guard and intake rollback (ignored by
//!   default; needs `GIFTLY_TEST_DATABASE_URL`)
//!
//! Apart from `stock_reservation`, the tests exercise the domain flows end
//! to end in memory without a running server or database.

use rust_decimal::Decimal;

use giftly_core::{PaymentMethod, ProductId, Totals, UserId};
use giftly_server::models::{Order, OrderItem, ShippingAddress};

/// Build a representative order for lifecycle tests.
#[must_use]
pub fn sample_order(method: PaymentMethod) -> Order {
    let items = vec![
        OrderItem {
            product_id: ProductId::generate(),
            name: "Custom Photo Mug".to_string(),
            slug: "custom-photo-mug".to_string(),
            image: None,
            price: Decimal::from(349),
            quantity: 2,
            variant: None,
            customization: None,
        },
        OrderItem {
            product_id: ProductId::generate(),
            name: "Engraved Photo Frame".to_string(),
            slug: "engraved-photo-frame".to_string(),
            image: None,
            price: Decimal::from(502),
            quantity: 1,
            variant: None,
            customization: None,
        },
    ];
    let subtotal: Decimal = items.iter().map(OrderItem::line_total).sum();

    Order::place(
        "ORD1755950400000042".to_string(),
        UserId::generate(),
        items,
        Totals::compute(subtotal, Decimal::ZERO),
        None,
        method,
        ShippingAddress {
            name: "Asha Verma".to_string(),
            phone: "9876543210".to_string(),
            address: "14 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            pincode: "411001".to_string(),
            landmark: None,
        },
        None,
    )
}
