//! The order model and its status state machine.
//!
//! An order is created once by intake and mutated many times: by the payment
//! webhook, by customer cancellation, and by admin status edits. Every
//! mutation goes through the methods here so that each transition appends
//! exactly one timeline entry. Line items are snapshots taken at intake and
//! stay immutable even if the underlying product later changes or is deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use giftly_core::{
    OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, TimelineEntry, Totals, UserId,
    format_inr,
};

/// Denormalized delivery address captured at order time.
///
/// Not a live reference to the customer's address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

impl ShippingAddress {
    /// Multi-line address block for emails and operator notifications.
    #[must_use]
    pub fn block(&self) -> String {
        let mut lines = vec![
            self.name.clone(),
            self.address.clone(),
            format!("{}, {} {}", self.city, self.state, self.pincode),
        ];
        if let Some(landmark) = &self.landmark {
            lines.push(format!("Landmark: {landmark}"));
        }
        lines.push(format!("Phone: {}", self.phone));
        lines.join("\n")
    }
}

/// Free-text and image references for personalized items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
}

/// Immutable snapshot of a purchased line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unit price at order time, from the authoritative product record.
    pub price: Decimal,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization: Option<Customization>,
}

impl OrderItem {
    /// Line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Payment bookkeeping recorded on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    /// Gateway order id, set at intake for gateway payments. Webhook events
    /// are correlated through this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_order_id: Option<String>,
    /// Gateway payment id, recorded when the capture event arrives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_payment_id: Option<String>,
    /// Instrument reported by the gateway (card, upi, netbanking, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

/// Carrier details, populated only once shipment begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingInfo {
    pub carrier: String,
    pub tracking_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_url: Option<String>,
}

/// A transition the state machine refuses to make.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Order cannot be cancelled in status \"{0}\"")]
    NotCancellable(OrderStatus),
}

/// The central order entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Human-readable order number, distinct from the database id.
    pub order_number: String,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment: PaymentInfo,
    pub shipping_address: ShippingAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking: Option<TrackingInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Append-only audit trail; never reordered or truncated.
    pub timeline: Vec<TimelineEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a freshly placed order in `pending` with its initial timeline
    /// entry.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn place(
        order_number: String,
        user_id: UserId,
        items: Vec<OrderItem>,
        totals: Totals,
        coupon_code: Option<String>,
        payment_method: PaymentMethod,
        shipping_address: ShippingAddress,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::generate(),
            order_number,
            user_id,
            items,
            subtotal: totals.subtotal,
            shipping_cost: totals.shipping_cost,
            discount: totals.discount,
            tax: totals.tax,
            total: totals.total,
            coupon_code,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment: PaymentInfo {
                method: payment_method,
                gateway_order_id: None,
                gateway_payment_id: None,
                gateway_method: None,
                paid_at: None,
            },
            shipping_address,
            tracking: None,
            notes,
            timeline: vec![TimelineEntry::new(OrderStatus::Pending, "Order placed")],
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to a new status, appending exactly one timeline entry.
    pub fn transition(&mut self, status: OrderStatus, message: impl Into<String>) {
        self.status = status;
        self.timeline.push(TimelineEntry::new(status, message));
        self.updated_at = Utc::now();
    }

    /// Immediate confirmation for deferred payment methods at intake.
    pub fn confirm_deferred(&mut self) {
        let message = match self.payment.method {
            PaymentMethod::CashOnDelivery => "Order confirmed (cash on delivery)",
            _ => "Order confirmed (pay later)",
        };
        self.transition(OrderStatus::Confirmed, message);
    }

    /// Customer-initiated cancellation.
    ///
    /// Allowed only while the status is cancellable. If the order was already
    /// paid, the payment status moves to `refunded` and a second timeline
    /// entry records the refund initiation. This is status-only accounting;
    /// no gateway refund call is made here.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotCancellable`] when the order has
    /// progressed past `confirmed`.
    pub fn cancel(&mut self, reason: Option<&str>) -> Result<(), TransitionError> {
        if !self.status.is_cancellable() {
            return Err(TransitionError::NotCancellable(self.status));
        }

        let message = reason.map_or_else(
            || "Order cancelled by customer".to_string(),
            |r| format!("Order cancelled by customer: {r}"),
        );
        self.transition(OrderStatus::Cancelled, message);

        if self.payment_status == PaymentStatus::Paid {
            self.payment_status = PaymentStatus::Refunded;
            self.timeline.push(TimelineEntry::new(
                OrderStatus::Cancelled,
                "Refund initiated for cancelled order",
            ));
        }

        Ok(())
    }

    /// Admin status edit. No eligibility restriction: the back-office can
    /// force any progression, including cancellation of shipped orders.
    pub fn admin_set_status(&mut self, status: OrderStatus, message: Option<&str>) {
        let default_message = format!("Status updated to {status}");
        self.transition(status, message.unwrap_or(&default_message));

        if status == OrderStatus::Refunded && !self.payment_status.is_terminal() {
            self.payment_status = PaymentStatus::Refunded;
        }
    }

    /// Record a successful payment capture from the gateway.
    ///
    /// Returns `false` without touching anything when the order is already
    /// paid, which makes duplicate `order.paid` events no-ops, or when the
    /// payment status is terminal: a capture replayed after a refund must not
    /// flip the order back to paid.
    pub fn mark_paid(&mut self, gateway_payment_id: &str, gateway_method: Option<&str>) -> bool {
        if self.payment_status == PaymentStatus::Paid || self.payment_status.is_terminal() {
            return false;
        }
        self.payment_status = PaymentStatus::Paid;
        self.payment.gateway_payment_id = Some(gateway_payment_id.to_string());
        self.payment.gateway_method = gateway_method.map(String::from);
        self.payment.paid_at = Some(Utc::now());
        self.transition(OrderStatus::Confirmed, "Payment received, order confirmed");
        true
    }

    /// Record a failed payment attempt. Fulfillment status is unchanged; the
    /// customer can retry.
    pub fn mark_payment_failed(&mut self, gateway_error: &str) {
        self.payment_status = PaymentStatus::Failed;
        self.timeline.push(TimelineEntry::new(
            self.status,
            format!("Payment failed: {gateway_error}"),
        ));
        self.updated_at = Utc::now();
    }

    /// Record a gateway-initiated refund.
    ///
    /// Returns `false` when the payment is already refunded (terminal).
    pub fn mark_refunded(&mut self, amount: Option<Decimal>) -> bool {
        if self.payment_status.is_terminal() {
            return false;
        }
        self.payment_status = PaymentStatus::Refunded;
        let message = amount.map_or_else(
            || "Refund processed".to_string(),
            |a| format!("Refund of {} processed", format_inr(a)),
        );
        self.transition(OrderStatus::Refunded, message);
        true
    }

    /// Attach tracking details and move the order to `shipped`.
    pub fn set_tracking(&mut self, tracking: TrackingInfo) {
        let message = format!(
            "Shipped via {} ({})",
            tracking.carrier, tracking.tracking_number
        );
        self.tracking = Some(tracking);
        self.transition(OrderStatus::Shipped, message);
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
