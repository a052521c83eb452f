//! Payment gateway webhook ingestion.
//!
//! Razorpay signs each delivery with HMAC-SHA256 over the raw body; the
//! signature arrives in `X-Razorpay-Signature`. Verification happens on the
//! raw bytes before any JSON parsing. Once a delivery is authenticated and
//! parseable it is always acknowledged with 200, even when the referenced
//! order cannot be found, so the gateway does not retry events we can never
//! apply. Duplicate deliveries are absorbed by the order state machine.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use rust_decimal::Decimal;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::Order;
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// The gateway events this service acts on. Everything else is acknowledged
/// and ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    /// A payment was captured for a gateway order.
    PaymentCaptured {
        gateway_order_id: String,
        gateway_payment_id: String,
        method: Option<String>,
    },
    /// A payment attempt failed; the customer may retry.
    PaymentFailed {
        gateway_order_id: String,
        error: String,
    },
    /// The gateway order is fully paid. Overlaps with `PaymentCaptured`;
    /// both are delivered and whichever lands second becomes a no-op.
    OrderPaid {
        gateway_order_id: String,
        gateway_payment_id: String,
        method: Option<String>,
    },
    /// A refund completed on the gateway side.
    RefundProcessed {
        gateway_payment_id: String,
        amount: Option<Decimal>,
    },
    /// Recognized delivery shape, event type we do not handle.
    Ignored(String),
}

/// Parse a verified gateway delivery into a [`WebhookEvent`].
///
/// # Errors
///
/// Returns a human-readable description when the body is not valid JSON or
/// a handled event is missing the entity fields it needs.
pub fn parse_event(body: &[u8]) -> std::result::Result<WebhookEvent, String> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| format!("invalid JSON body: {e}"))?;

    let event = value
        .get("event")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| "missing event field".to_string())?;

    let payment_entity = || {
        value
            .pointer("/payload/payment/entity")
            .ok_or_else(|| format!("{event}: missing payment entity"))
    };
    let entity_str = |entity: &serde_json::Value, field: &str| {
        entity
            .get(field)
            .and_then(serde_json::Value::as_str)
            .map(String::from)
            .ok_or_else(|| format!("{event}: missing payment {field}"))
    };

    match event {
        "payment.captured" => {
            let entity = payment_entity()?;
            Ok(WebhookEvent::PaymentCaptured {
                gateway_order_id: entity_str(entity, "order_id")?,
                gateway_payment_id: entity_str(entity, "id")?,
                method: entity
                    .get("method")
                    .and_then(serde_json::Value::as_str)
                    .map(String::from),
            })
        }
        "payment.failed" => {
            let entity = payment_entity()?;
            let error = entity
                .get("error_description")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("payment failed")
                .to_string();
            Ok(WebhookEvent::PaymentFailed {
                gateway_order_id: entity_str(entity, "order_id")?,
                error,
            })
        }
        "order.paid" => {
            let entity = payment_entity()?;
            Ok(WebhookEvent::OrderPaid {
                gateway_order_id: entity_str(entity, "order_id")?,
                gateway_payment_id: entity_str(entity, "id")?,
                method: entity
                    .get("method")
                    .and_then(serde_json::Value::as_str)
                    .map(String::from),
            })
        }
        // Razorpay emits refund.created when the refund is initiated and
        // refund.processed when it settles; both mark the payment refunded
        // here, and the second delivery is a no-op.
        "refund.created" | "refund.processed" => {
            let entity = value
                .pointer("/payload/refund/entity")
                .ok_or_else(|| format!("{event}: missing refund entity"))?;
            // Gateway amounts are integer paise.
            let amount = entity
                .get("amount")
                .and_then(serde_json::Value::as_i64)
                .map(|paise| Decimal::new(paise, 2));
            Ok(WebhookEvent::RefundProcessed {
                gateway_payment_id: entity_str(entity, "payment_id")?,
                amount,
            })
        }
        other => Ok(WebhookEvent::Ignored(other.to_string())),
    }
}

/// POST /api/webhooks/razorpay - signed gateway event ingestion.
#[tracing::instrument(skip_all)]
pub async fn razorpay(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing webhook signature".to_string()))?;

    if !state.gateway().verify_webhook_signature(&body, signature) {
        tracing::warn!("Webhook delivery with invalid signature rejected");
        return Err(AppError::Unauthorized(
            "Invalid webhook signature".to_string(),
        ));
    }

    let event = parse_event(&body).map_err(AppError::BadRequest)?;
    apply_event(&state, event).await?;

    Ok(StatusCode::OK)
}

async fn apply_event(state: &AppState, event: WebhookEvent) -> Result<()> {
    let orders = OrderRepository::new(state.pool());

    match event {
        WebhookEvent::PaymentCaptured {
            gateway_order_id,
            gateway_payment_id,
            method,
        }
        | WebhookEvent::OrderPaid {
            gateway_order_id,
            gateway_payment_id,
            method,
        } => {
            let Some(mut order) = orders.find_by_gateway_order_id(&gateway_order_id).await? else {
                tracing::warn!(%gateway_order_id, "Payment event for unknown order");
                return Ok(());
            };
            if order.mark_paid(&gateway_payment_id, method.as_deref()) {
                orders.update(&order).await?;
                tracing::info!(order_number = %order.order_number, "Payment captured");
                notify_paid(state, &order).await;
            } else {
                tracing::debug!(order_number = %order.order_number, "Duplicate payment event ignored");
            }
        }
        WebhookEvent::PaymentFailed {
            gateway_order_id,
            error,
        } => {
            let Some(mut order) = orders.find_by_gateway_order_id(&gateway_order_id).await? else {
                tracing::warn!(%gateway_order_id, "Failure event for unknown order");
                return Ok(());
            };
            order.mark_payment_failed(&error);
            orders.update(&order).await?;
            tracing::info!(order_number = %order.order_number, %error, "Payment failed");
        }
        WebhookEvent::RefundProcessed {
            gateway_payment_id,
            amount,
        } => {
            let Some(mut order) = orders
                .find_by_gateway_payment_id(&gateway_payment_id)
                .await?
            else {
                tracing::warn!(%gateway_payment_id, "Refund event for unknown payment");
                return Ok(());
            };
            if order.mark_refunded(amount) {
                orders.update(&order).await?;
                tracing::info!(order_number = %order.order_number, "Refund recorded");
            }
        }
        WebhookEvent::Ignored(event_type) => {
            tracing::debug!(%event_type, "Ignoring unhandled webhook event");
        }
    }

    Ok(())
}

/// Confirmation email for a gateway payment goes out when the capture event
/// lands, not at intake. Best-effort.
async fn notify_paid(state: &AppState, order: &Order) {
    // The webhook carries no customer email; without one on file the
    // confirmation email is skipped.
    if let Some(notifier) = state.notifier() {
        let alert = crate::services::notify::OrderAlert::from_order(order);
        if let Err(e) = notifier.send_order_alert(&alert).await {
            tracing::warn!(
                order_number = %order.order_number,
                error = %e,
                "Failed to send operator notification"
            );
        }
    }
}
