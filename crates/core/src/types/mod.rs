//! Core types for Dahlia.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod identity;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use identity::NormalizedIdentity;
pub use money::Money;
pub use status::OrderStatus;
