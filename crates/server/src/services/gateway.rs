//! Razorpay gateway client.
//!
//! Two responsibilities: creating a gateway order at intake (so the checkout
//! widget can collect payment against it) and verifying webhook signatures.
//! Amounts cross the wire in paise.

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use thiserror::Error;

use giftly_core::to_paise;

use crate::config::RazorpayConfig;

type HmacSha256 = Hmac<Sha256>;

/// Errors from gateway calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure.
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway rejected the request.
    #[error("gateway returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// A gateway order created for an online payment.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    /// Gateway order id, e.g. `order_Nf3qW8`.
    pub id: String,
    /// Amount in paise, echoed back by the gateway.
    pub amount: i64,
    pub currency: String,
}

/// Client for the Razorpay Orders API and webhook verification.
#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: SecretString,
    webhook_secret: SecretString,
    api_base: String,
}

impl RazorpayClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            webhook_secret: config.webhook_secret.clone(),
            api_base: config.api_base.clone(),
        }
    }

    /// Public key id, exposed to the checkout widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create a gateway order for `amount` rupees with the Giftly order
    /// number as the receipt.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Http` on transport failure or
    /// `GatewayError::Api` if the gateway rejects the request.
    pub async fn create_order(
        &self,
        amount: Decimal,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let response = self
            .http
            .post(format!("{}/v1/orders", self.api_base))
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&json!({
                "amount": to_paise(amount),
                "currency": "INR",
                "receipt": receipt,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<GatewayOrder>().await?)
    }

    /// Verify a webhook signature against the raw request body.
    ///
    /// The gateway signs the body with HMAC-SHA256 over the shared webhook
    /// secret and sends the hex digest in `X-Razorpay-Signature`. Comparison
    /// happens in constant time via `Mac::verify_slice`.
    #[must_use]
    pub fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let Ok(mut mac) =
            HmacSha256::new_from_slice(self.webhook_secret.expose_secret().as_bytes())
        else {
            return false;
        };
        mac.update(body);
        mac.verify_slice(&expected).is_ok()
    }
}
