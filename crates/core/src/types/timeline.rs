//! Timeline entries: the append-only audit trail embedded in an order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::OrderStatus;

/// A single entry in an order's timeline.
///
/// Every status transition appends exactly one entry. Entries are never
/// edited, reordered, or truncated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// The status the order moved to.
    pub status: OrderStatus,
    /// Human-readable description of the transition.
    pub message: String,
    /// When the transition happened.
    pub timestamp: DateTime<Utc>,
}

impl TimelineEntry {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn new(status: OrderStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_carries_status_and_message() {
        let entry = TimelineEntry::new(OrderStatus::Confirmed, "Order confirmed");
        assert_eq!(entry.status, OrderStatus::Confirmed);
        assert_eq!(entry.message, "Order confirmed");
        assert!(entry.timestamp <= Utc::now());
    }
}
