//! Dahlia Core - Shared types library.
//!
//! This crate provides common types used across all Dahlia components:
//! - `storefront` - Public-facing e-commerce site and order-history API
//! - `integration-tests` - HTTP-level tests against a running storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, statuses,
//!   and normalized contact identities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
