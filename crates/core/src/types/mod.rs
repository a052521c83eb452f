//! Core types for Giftly.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod status;
pub mod timeline;

pub use id::*;
pub use money::{format_inr, round_money, to_paise};
pub use status::{OrderStatus, PaymentMethod, PaymentStatus};
pub use timeline::TimelineEntry;
