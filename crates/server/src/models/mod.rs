//! Domain models for the Giftly API.

pub mod order;
pub mod product;

pub use order::{
    Customization, Order, OrderItem, PaymentInfo, ShippingAddress, TrackingInfo, TransitionError,
};
pub use product::Product;
