//! Order route handlers.
//!
//! JSON API endpoints for order history, single-order access, and
//! guest-to-account linking. All the interesting decisions live in
//! [`crate::services::orders`]; handlers only translate between HTTP and the
//! service contract.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use dahlia_core::OrderId;

use crate::error::{AppError, Result, set_sentry_user};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{Order, Principal};
use crate::services::OrderService;
use crate::state::AppState;

/// Query parameters for `GET /orders`.
///
/// `id` takes precedence over `email`; with neither, the authenticated
/// principal's aggregated history is returned.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    /// Fetch a single order by id (requires authentication).
    pub id: Option<OrderId>,
    /// Guest order history lookup by checkout email (no authentication).
    pub email: Option<String>,
}

/// Request body for `POST /orders/link`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOrdersRequest {
    /// Candidate order ids, normally from a prior `GET /orders` call. Each
    /// one is re-verified server-side; the list is not trusted.
    pub order_ids: Vec<OrderId>,
}

/// Response body for `POST /orders/link`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOrdersResponse {
    /// Number of orders actually claimed by this call.
    pub linked_count: u64,
}

/// Dispatch for `GET /orders`.
///
/// - `?id=` - single order: 200 on Allow, 403 on Deny, 404 if missing
/// - `?email=` - guest history: always 200, empty list on internal failure
/// - neither - aggregated history for the session principal: 200 with a
///   possibly-empty list; only a failing owned-orders fetch becomes a 500
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for the authenticated variants when no
/// principal is in the session.
pub async fn get_orders(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Response> {
    let service = OrderService::new(state.pool());

    if let Some(order_id) = query.id {
        let principal = require_principal(user)?;
        let order = service.get_order_for(&principal, order_id).await?;
        return Ok(Json(order).into_response());
    }

    if let Some(email) = query.email {
        let orders = service.guest_history_by_email(&email).await;
        return Ok(Json(orders).into_response());
    }

    let principal = require_principal(user)?;
    let orders: Vec<Order> = service.list_orders_for(&principal).await?;
    Ok(Json(orders).into_response())
}

/// `POST /orders/link` - claim matched guest orders for the session
/// principal.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when no principal is in the session and
/// `AppError::Database` if a fetch or claim fails mid-batch (orders claimed
/// before the failure stay claimed).
pub async fn link_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<LinkOrdersRequest>,
) -> Result<Json<LinkOrdersResponse>> {
    set_sentry_user(&user.id, Some(user.email.as_str()));
    let principal: Principal = user.into();

    let service = OrderService::new(state.pool());
    let linked_count = service
        .link_guest_orders(&principal, &request.order_ids)
        .await
        .map_err(AppError::from)?;

    Ok(Json(LinkOrdersResponse { linked_count }))
}

fn require_principal(user: Option<crate::models::CurrentUser>) -> Result<Principal> {
    let user = user.ok_or_else(|| AppError::Unauthorized("no session principal".to_owned()))?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(user.into())
}
