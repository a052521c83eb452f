//! Operator notifications for new orders.
//!
//! Posts a compact JSON summary to a configured webhook URL (the ops channel
//! bot). Best-effort: failures are logged by the caller and never affect the
//! order.

use serde::Serialize;
use thiserror::Error;

use giftly_core::format_inr;

use crate::models::Order;

/// Errors from operator notification delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Transport-level failure.
    #[error("notification request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook endpoint answered with a non-success status.
    #[error("notification endpoint returned {0}")]
    Endpoint(u16),
}

/// Payload posted to the ops webhook for each new order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAlert {
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub total: String,
    pub item_count: i32,
    pub address_block: String,
}

impl OrderAlert {
    /// Build an alert from a freshly placed order.
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_number: order.order_number.clone(),
            customer_name: order.shipping_address.name.clone(),
            customer_phone: order.shipping_address.phone.clone(),
            total: format_inr(order.total),
            item_count: order.item_count(),
            address_block: order.shipping_address.block(),
        }
    }
}

/// Client for the operator notification webhook.
#[derive(Clone)]
pub struct OpsNotifier {
    http: reqwest::Client,
    webhook_url: String,
}

impl OpsNotifier {
    /// Create a notifier targeting `webhook_url`.
    #[must_use]
    pub fn new(webhook_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url,
        }
    }

    /// Deliver a new-order alert.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` on transport failure or a non-success response.
    pub async fn send_order_alert(&self, alert: &OrderAlert) -> Result<(), NotifyError> {
        let response = self.http.post(&self.webhook_url).json(alert).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Endpoint(status.as_u16()));
        }
        Ok(())
    }
}
