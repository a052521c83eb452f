//! Full order lifecycle flows through the state machine.
//!
//! Each test drives a realistic sequence of transitions on an in-memory
//! order and asserts on the invariants the API relies on: the timeline is
//! append-only, statuses move as documented, and payment accounting stays
//! consistent with fulfillment.

use giftly_core::{OrderStatus, PaymentMethod, PaymentStatus};
use giftly_integration_tests::sample_order;
use giftly_server::models::{TrackingInfo, TransitionError};

#[test]
fn test_cod_order_happy_path() {
    let mut order = sample_order(PaymentMethod::CashOnDelivery);
    assert_eq!(order.status, OrderStatus::Pending);

    order.confirm_deferred();
    assert_eq!(order.status, OrderStatus::Confirmed);
    // Payment is still pending: cash is collected at the door
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    order.admin_set_status(OrderStatus::Processing, None);
    order.set_tracking(TrackingInfo {
        carrier: "Delhivery".to_string(),
        tracking_number: "DL987654".to_string(),
        tracking_url: Some("https://track.example/DL987654".to_string()),
    });
    assert_eq!(order.status, OrderStatus::Shipped);

    order.admin_set_status(OrderStatus::Delivered, None);
    assert_eq!(order.status, OrderStatus::Delivered);

    // Placement + 4 transitions
    assert_eq!(order.timeline.len(), 5);
    let statuses: Vec<_> = order.timeline.iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        vec![
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ]
    );
}

#[test]
fn test_gateway_order_pays_then_ships() {
    let mut order = sample_order(PaymentMethod::Razorpay);
    order.payment.gateway_order_id = Some("order_Nf3qW8".to_string());

    // Capture event arrives
    assert!(order.mark_paid("pay_QxT9v2", Some("upi")));
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert!(order.payment.paid_at.is_some());

    // The overlapping order.paid delivery is a no-op
    assert!(!order.mark_paid("pay_QxT9v2", Some("upi")));

    order.set_tracking(TrackingInfo {
        carrier: "Bluedart".to_string(),
        tracking_number: "BD555".to_string(),
        tracking_url: None,
    });
    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
}

#[test]
fn test_failed_payment_then_retry_succeeds() {
    let mut order = sample_order(PaymentMethod::Razorpay);

    order.mark_payment_failed("card declined by issuer");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Failed);

    // Customer retries and the second attempt captures
    assert!(order.mark_paid("pay_retry1", Some("card")));
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
}

#[test]
fn test_customer_cancellation_window() {
    // Cancellable while pending
    let mut pending = sample_order(PaymentMethod::Razorpay);
    assert!(pending.cancel(None).is_ok());
    assert_eq!(pending.status, OrderStatus::Cancelled);

    // Cancellable while confirmed
    let mut confirmed = sample_order(PaymentMethod::CashOnDelivery);
    confirmed.confirm_deferred();
    assert!(confirmed.cancel(Some("ordered the wrong size")).is_ok());

    // Not cancellable once processing begins
    let mut processing = sample_order(PaymentMethod::CashOnDelivery);
    processing.confirm_deferred();
    processing.admin_set_status(OrderStatus::Processing, None);
    assert_eq!(
        processing.cancel(None),
        Err(TransitionError::NotCancellable(OrderStatus::Processing))
    );
    assert_eq!(processing.status, OrderStatus::Processing);
}

#[test]
fn test_cancelling_paid_order_initiates_refund() {
    let mut order = sample_order(PaymentMethod::Razorpay);
    order.mark_paid("pay_A1", Some("netbanking"));

    order.cancel(None).expect("confirmed orders are cancellable");
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(order.payment_status, PaymentStatus::Refunded);

    let last = order.timeline.last().expect("timeline never empty");
    assert_eq!(last.message, "Refund initiated for cancelled order");
}

#[test]
fn test_refund_is_terminal_for_payment() {
    let mut order = sample_order(PaymentMethod::Razorpay);
    order.mark_paid("pay_A1", None);
    assert!(order.mark_refunded(None));
    assert_eq!(order.payment_status, PaymentStatus::Refunded);

    // Nothing moves the payment status off refunded, not even a replayed
    // capture event
    assert!(!order.mark_refunded(None));
    assert!(!order.mark_paid("pay_A2", None));
    assert_eq!(order.payment_status, PaymentStatus::Refunded);
    assert_eq!(order.payment.gateway_payment_id.as_deref(), Some("pay_A1"));
}

#[test]
fn test_admin_can_force_any_status() {
    let mut order = sample_order(PaymentMethod::CashOnDelivery);
    order.admin_set_status(OrderStatus::Shipped, Some("Expedited by support"));
    assert_eq!(order.status, OrderStatus::Shipped);

    // Even backwards, for operator corrections
    order.admin_set_status(OrderStatus::Processing, Some("Courier returned the parcel"));
    assert_eq!(order.status, OrderStatus::Processing);
    assert_eq!(order.timeline.len(), 3);
}

#[test]
fn test_timeline_is_append_only_across_full_flow() {
    let mut order = sample_order(PaymentMethod::Razorpay);
    let mut snapshots = vec![order.timeline.clone()];

    order.mark_paid("pay_Z", Some("upi"));
    snapshots.push(order.timeline.clone());
    order.admin_set_status(OrderStatus::Processing, None);
    snapshots.push(order.timeline.clone());
    order.set_tracking(TrackingInfo {
        carrier: "Delhivery".to_string(),
        tracking_number: "DL1".to_string(),
        tracking_url: None,
    });
    snapshots.push(order.timeline.clone());

    for pair in snapshots.windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        assert_eq!(after.len(), before.len() + 1);
        // Earlier entries are untouched
        assert_eq!(&after[..before.len()], &before[..]);
    }
}
