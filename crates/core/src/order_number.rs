//! Human-readable order number generation.
//!
//! Order numbers are distinct from the database identifier: they are what the
//! customer sees on confirmations and what the gateway receives as the
//! receipt. Timestamp-derived plus a random suffix; not strictly
//! collision-proof, but collision probability is negligible at realistic
//! order volume.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Generate a fresh order number, e.g. `ORD1755945600000847`.
#[must_use]
pub fn generate_order_number() -> String {
    let suffix: u16 = rand::rng().random_range(0..1000);
    order_number_at(Utc::now(), suffix)
}

/// Build an order number from an explicit timestamp and suffix.
#[must_use]
pub fn order_number_at(at: DateTime<Utc>, suffix: u16) -> String {
    format!("ORD{}{suffix:03}", at.timestamp_millis())
}
