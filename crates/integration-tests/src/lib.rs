//! Integration tests for Dahlia.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database
//! task db:start
//!
//! # Run the storefront, then:
//! cargo test -p dahlia-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_orders` - Order history, authorization, and linking over HTTP
//!
//! Tests are `#[ignore]`d by default because they need a running storefront
//! and a seeded database; helpers for base URLs and clients live in the test
//! files themselves.
