//! Product model as read by order intake.
//!
//! The catalog CRUD lives in the admin surfaces; intake only resolves
//! products, checks stock, and decrements it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use giftly_core::ProductId;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub stock: i32,
    /// When disabled the product never blocks on stock.
    pub track_inventory: bool,
    pub active: bool,
}

impl Product {
    /// Whether `quantity` units can be fulfilled right now.
    #[must_use]
    pub const fn has_stock(&self, quantity: i32) -> bool {
        !self.track_inventory || self.stock >= quantity
    }
}
