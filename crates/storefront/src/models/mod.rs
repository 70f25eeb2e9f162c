//! Domain models for storefront.
//!
//! These types represent validated domain objects separate from database
//! row types.

pub mod order;
pub mod principal;
pub mod session;

pub use order::{Order, OrderItem, ShippingAddress};
pub use principal::Principal;
pub use session::{CurrentUser, session_keys};
