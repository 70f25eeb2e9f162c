//! Business logic services for storefront.
//!
//! # Services
//!
//! - `identity` - Contact-identity helpers, including the placeholder-email
//!   shim for phone-only registrations
//! - `orders` - Order authorization, guest-order matching, order history
//!   aggregation, and guest-to-account linking

pub mod identity;
pub mod orders;

pub use orders::{OrderAccess, OrderAccessError, OrderService, authorize};
