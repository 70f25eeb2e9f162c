//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check (liveness)
//! GET  /health/ready           - Readiness check (pings the database)
//!
//! # Orders
//! GET  /orders                 - Order history for the session principal
//! GET  /orders?id={id}         - One order (authorized)
//! GET  /orders?email={email}   - Guest order history by checkout email
//! POST /orders/link            - Link matched guest orders to the account
//! ```
//!
//! Login, registration, and logout live in the external identity service;
//! it shares the session store this service reads.

pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::get_orders))
        .route("/orders/link", post(orders::link_orders))
}

/// Create the main router with all routes.
pub fn routes() -> Router<AppState> {
    Router::new().merge(order_routes())
}
