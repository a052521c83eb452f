//! Giftly Core - Shared domain library.
//!
//! This crate provides the domain types and calculations used across all
//! Giftly components:
//! - `server` - HTTP API for the storefront, admin back-office, and webhooks
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure calculations - no I/O, no
//! database access, no HTTP clients. Order pricing, coupon evaluation, and the
//! status state machine all live here so they can be tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money helpers, statuses, timeline entries
//! - [`pricing`] - Shipping/tax/total computation for order intake
//! - [`coupon`] - Stateless coupon validation and discount calculation
//! - [`order_number`] - Human-readable order number generation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod coupon;
pub mod order_number;
pub mod pricing;
pub mod types;

pub use coupon::{Coupon, CouponError, DiscountType};
pub use order_number::generate_order_number;
pub use pricing::Totals;
pub use types::*;
