//! Webhook signature verification and event application.
//!
//! Simulates the gateway side: signs raw delivery bodies with the shared
//! secret, parses them into events, and applies them to in-memory orders to
//! verify the reconciliation outcomes (including duplicate deliveries).

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use secrecy::SecretString;
use sha2::Sha256;

use giftly_core::{OrderStatus, PaymentMethod, PaymentStatus};
use giftly_integration_tests::sample_order;
use giftly_server::config::RazorpayConfig;
use giftly_server::routes::webhooks::{WebhookEvent, parse_event};
use giftly_server::services::gateway::RazorpayClient;

const WEBHOOK_SECRET: &str = "integration-test-webhook-secret";

fn test_client() -> RazorpayClient {
    RazorpayClient::new(&RazorpayConfig {
        key_id: "rzp_test_k3y".to_string(),
        key_secret: SecretString::from("k3y-s3cr3t"),
        webhook_secret: SecretString::from(WEBHOOK_SECRET),
        api_base: "http://127.0.0.1:0".to_string(),
    })
}

fn sign(body: &[u8]) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).expect("any key length works");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

fn captured_body(gateway_order_id: &str, payment_id: &str) -> Vec<u8> {
    serde_json::json!({
        "event": "payment.captured",
        "payload": {
            "payment": {
                "entity": {
                    "id": payment_id,
                    "order_id": gateway_order_id,
                    "method": "upi",
                    "amount": 120_000
                }
            }
        }
    })
    .to_string()
    .into_bytes()
}

#[test]
fn test_signed_delivery_roundtrip() {
    let client = test_client();
    let body = captured_body("order_Nf3qW8", "pay_QxT9v2");
    let signature = sign(&body);

    assert!(client.verify_webhook_signature(&body, &signature));

    let event = parse_event(&body).expect("well-formed delivery parses");
    assert_eq!(
        event,
        WebhookEvent::PaymentCaptured {
            gateway_order_id: "order_Nf3qW8".to_string(),
            gateway_payment_id: "pay_QxT9v2".to_string(),
            method: Some("upi".to_string()),
        }
    );
}

#[test]
fn test_tampered_delivery_fails_verification() {
    let client = test_client();
    let body = captured_body("order_Nf3qW8", "pay_QxT9v2");
    let signature = sign(&body);

    // Attacker swaps the payment id after signing
    let tampered = captured_body("order_Nf3qW8", "pay_attacker");
    assert!(!client.verify_webhook_signature(&tampered, &signature));
}

#[test]
fn test_capture_event_confirms_order() {
    let body = captured_body("order_Nf3qW8", "pay_QxT9v2");
    let event = parse_event(&body).unwrap();

    let mut order = sample_order(PaymentMethod::Razorpay);
    order.payment.gateway_order_id = Some("order_Nf3qW8".to_string());

    let WebhookEvent::PaymentCaptured {
        gateway_payment_id,
        method,
        ..
    } = event
    else {
        panic!("expected capture event");
    };
    assert!(order.mark_paid(&gateway_payment_id, method.as_deref()));

    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(
        order.payment.gateway_payment_id.as_deref(),
        Some("pay_QxT9v2")
    );
    assert_eq!(order.payment.gateway_method.as_deref(), Some("upi"));
}

#[test]
fn test_duplicate_capture_delivery_is_noop() {
    let mut order = sample_order(PaymentMethod::Razorpay);
    assert!(order.mark_paid("pay_QxT9v2", Some("upi")));
    let timeline_len = order.timeline.len();

    // Gateway redelivers; same payment id, nothing changes
    assert!(!order.mark_paid("pay_QxT9v2", Some("upi")));
    assert_eq!(order.timeline.len(), timeline_len);
}

#[test]
fn test_failed_event_records_reason() {
    let body = serde_json::json!({
        "event": "payment.failed",
        "payload": {
            "payment": {
                "entity": {
                    "id": "pay_F1",
                    "order_id": "order_Nf3qW8",
                    "error_description": "Payment declined by bank"
                }
            }
        }
    })
    .to_string();

    let event = parse_event(body.as_bytes()).unwrap();
    let WebhookEvent::PaymentFailed { error, .. } = event else {
        panic!("expected failure event");
    };

    let mut order = sample_order(PaymentMethod::Razorpay);
    order.mark_payment_failed(&error);
    assert_eq!(order.payment_status, PaymentStatus::Failed);
    // Fulfillment untouched, retry remains possible
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(
        order
            .timeline
            .last()
            .unwrap()
            .message
            .contains("Payment declined by bank")
    );
}

#[test]
fn test_refund_event_converts_paise() {
    let body = serde_json::json!({
        "event": "refund.processed",
        "payload": {
            "refund": {
                "entity": {
                    "id": "rfnd_R1",
                    "payment_id": "pay_QxT9v2",
                    "amount": 120_000
                }
            }
        }
    })
    .to_string();

    let event = parse_event(body.as_bytes()).unwrap();
    let WebhookEvent::RefundProcessed {
        gateway_payment_id,
        amount,
    } = event
    else {
        panic!("expected refund event");
    };
    assert_eq!(gateway_payment_id, "pay_QxT9v2");
    assert_eq!(amount, Some(Decimal::new(120_000, 2)));

    let mut order = sample_order(PaymentMethod::Razorpay);
    order.mark_paid("pay_QxT9v2", None);
    assert!(order.mark_refunded(amount));
    assert_eq!(order.payment_status, PaymentStatus::Refunded);
    // The rupee amount appears in the timeline, not the paise figure
    assert!(
        order
            .timeline
            .last()
            .unwrap()
            .message
            .contains("₹1200.00")
    );
}

#[test]
fn test_refund_created_delivery_marks_refund() {
    let body = serde_json::json!({
        "event": "refund.created",
        "payload": {
            "refund": {
                "entity": {
                    "id": "rfnd_R2",
                    "payment_id": "pay_QxT9v2",
                    "amount": 120_000
                }
            }
        }
    })
    .to_string();

    let event = parse_event(body.as_bytes()).unwrap();
    let WebhookEvent::RefundProcessed { amount, .. } = event else {
        panic!("expected refund event");
    };

    let mut order = sample_order(PaymentMethod::Razorpay);
    order.mark_paid("pay_QxT9v2", None);
    assert!(order.mark_refunded(amount));
    assert_eq!(order.payment_status, PaymentStatus::Refunded);

    // A capture redelivered after the refund cannot un-refund the order
    assert!(!order.mark_paid("pay_QxT9v2", Some("upi")));
    assert_eq!(order.payment_status, PaymentStatus::Refunded);
}

#[test]
fn test_unhandled_events_are_acknowledged() {
    for event_type in ["invoice.expired", "settlement.processed", "payment.authorized"] {
        let body = serde_json::json!({"event": event_type, "payload": {}}).to_string();
        let event = parse_event(body.as_bytes()).unwrap();
        assert_eq!(event, WebhookEvent::Ignored(event_type.to_string()));
    }
}
