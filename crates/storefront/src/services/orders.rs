//! Order authorization, guest-order matching, aggregation, and linking.
//!
//! This is the security-sensitive part of the storefront: it decides who may
//! see an order and reconciles orders placed as guest (identified only by the
//! phone or email typed at checkout) with accounts created later. A wrong
//! decision either leaks someone else's order or permanently hides a
//! customer's own history, so the decision procedures here follow a strict
//! order and every value comparison goes through [`NormalizedIdentity`],
//! which refuses to match empty against empty.
//!
//! The matcher is an ordered chain of strategies, each tried only when the
//! previous one found nothing:
//!
//! 1. indexed lookup on the verbatim guest phone
//! 2. normalized phone comparison over all guest orders (checkout stores
//!    phones with whatever spaces and dashes the customer typed)
//! 3. normalized email lookup, for principals with no phone identity
//!
//! Linking is the only mutation: an explicit, re-verified, per-order
//! compare-and-set. Reads never link implicitly, so a guest order whose phone
//! matches a profile stays viewable without ever being claimed until the
//! customer triggers the link.

use std::collections::HashSet;

use sqlx::PgPool;

use dahlia_core::{NormalizedIdentity, OrderId};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::{Order, Principal};
use crate::services::identity::effective_phone;

/// Authorization decision for one order and one principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAccess {
    /// The principal may read this order.
    Allow,
    /// The principal may not read this order.
    Deny,
}

/// Errors from authorized order access.
#[derive(Debug, thiserror::Error)]
pub enum OrderAccessError {
    /// The order does not exist. Distinct from `Forbidden`: callers surface
    /// 404, not 403, and never learn whether an id they cannot read exists.
    #[error("order not found")]
    NotFound,

    /// The order exists but the principal may not access it.
    #[error("access to this order is denied")]
    Forbidden,

    /// The underlying fetch failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Decide whether `principal` may read `order`.
///
/// Pure with respect to its inputs; concurrent calls need no synchronization.
/// The decision procedure short-circuits in order:
///
/// 1. `owner_id` equals the principal's id
/// 2. the order's guest phone matches the principal's effective phone after
///    normalization (guest orders stay viewable this way even if never
///    explicitly linked)
/// 3. otherwise deny
///
/// The effective phone already covers the placeholder-email backfill for
/// phone-only registrations.
#[must_use]
pub fn authorize(order: &Order, principal: &Principal) -> OrderAccess {
    if order.owner_id == Some(principal.id) {
        return OrderAccess::Allow;
    }

    let order_phone = NormalizedIdentity::phone(order.guest_phone.as_deref());
    let principal_phone = NormalizedIdentity::phone(effective_phone(principal).as_deref());
    if order_phone.matches(&principal_phone) {
        return OrderAccess::Allow;
    }

    OrderAccess::Deny
}

/// Whether the linker may assign this order to the principal.
///
/// Re-verified per order immediately before the write; the caller's id list
/// is never trusted. Already-owned orders are ineligible - for the principal's
/// own orders that makes re-linking a no-op rather than an error, which is
/// what keeps the operation idempotent.
fn link_eligible(order: &Order, principal: &Principal) -> bool {
    if order.owner_id.is_some() {
        return false;
    }

    let order_phone = NormalizedIdentity::phone(order.guest_phone.as_deref());
    let principal_phone = NormalizedIdentity::phone(effective_phone(principal).as_deref());
    if order_phone.matches(&principal_phone) {
        return true;
    }

    let order_email = NormalizedIdentity::email(order.guest_email.as_deref());
    let principal_email = NormalizedIdentity::email(Some(principal.email.as_str()));
    order_email.matches(&principal_email)
}

/// Keep only orders whose guest phone normalizes to `phone`.
fn filter_by_normalized_phone(orders: Vec<Order>, phone: &NormalizedIdentity) -> Vec<Order> {
    orders
        .into_iter()
        .filter(|o| NormalizedIdentity::phone(o.guest_phone.as_deref()).matches(phone))
        .collect()
}

/// Merge owned and matched order sets: dedup by id, newest first.
///
/// Owned orders win the dedup (a stale guest phone on an already-owned order
/// must not produce a duplicate). The sort is stable and descending on
/// `created_at`, so equal timestamps keep insertion order: owned before
/// matched.
fn merge_order_sets(owned: Vec<Order>, matched: Vec<Order>) -> Vec<Order> {
    let mut seen: HashSet<OrderId> = HashSet::with_capacity(owned.len() + matched.len());
    let mut merged = Vec::with_capacity(owned.len() + matched.len());

    for order in owned.into_iter().chain(matched) {
        if seen.insert(order.id) {
            merged.push(order);
        }
    }

    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    merged
}

/// Order access and reconciliation service.
pub struct OrderService<'a> {
    repo: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service over a connection pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            repo: OrderRepository::new(pool),
        }
    }

    /// Fetch one order, applying the authorization decision.
    ///
    /// # Errors
    ///
    /// Returns `OrderAccessError::NotFound` if no such order exists,
    /// `OrderAccessError::Forbidden` on a Deny decision, and
    /// `OrderAccessError::Repository` if the fetch fails.
    pub async fn get_order_for(
        &self,
        principal: &Principal,
        id: OrderId,
    ) -> Result<Order, OrderAccessError> {
        let order = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(OrderAccessError::NotFound)?;

        match authorize(&order, principal) {
            OrderAccess::Allow => Ok(order),
            OrderAccess::Deny => Err(OrderAccessError::Forbidden),
        }
    }

    /// Find guest orders belonging to this principal.
    ///
    /// Runs the strategy chain described in the module docs. Only ownerless
    /// orders are ever returned; overlap with directly-owned orders is the
    /// aggregator's problem.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a fetch fails.
    pub async fn find_guest_orders_for(
        &self,
        principal: &Principal,
    ) -> Result<Vec<Order>, RepositoryError> {
        let phone = effective_phone(principal);
        let normalized_phone = NormalizedIdentity::phone(phone.as_deref());

        if normalized_phone.is_present() {
            let raw_phone = phone.as_deref().unwrap_or("");
            let exact = self.repo.list_guest_by_exact_phone(raw_phone).await?;
            if !exact.is_empty() {
                return Ok(exact);
            }

            let ownerless = self.repo.list_ownerless().await?;
            return Ok(filter_by_normalized_phone(ownerless, &normalized_phone));
        }

        let email = NormalizedIdentity::email(Some(principal.email.as_str()));
        if email.is_present() {
            return self.repo.list_ownerless_by_email(email.as_str()).await;
        }

        Ok(Vec::new())
    }

    /// Aggregate the principal's full order history.
    ///
    /// Owned orders plus matched guest orders, deduplicated by id, newest
    /// first. Only the owned-orders fetch is fatal: an account with zero
    /// guest orders is the common case, and a failing fallback must not turn
    /// "here are your orders" into an error. Fallback failures are logged
    /// and treated as "found nothing".
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` only if the owned-orders fetch fails.
    pub async fn list_orders_for(
        &self,
        principal: &Principal,
    ) -> Result<Vec<Order>, RepositoryError> {
        let owned = self.repo.list_owned(principal.id).await?;

        let matched = match self.find_guest_orders_for(principal).await {
            Ok(matched) => matched,
            Err(err) => {
                tracing::warn!(
                    user_id = %principal.id,
                    error = %err,
                    "guest order matching failed; returning owned orders only"
                );
                Vec::new()
            }
        };

        let mut merged = merge_order_sets(owned, matched);

        // Last resort: a phone-less principal whose matcher pass failed above
        // still deserves an email attempt before we report an empty history.
        if merged.is_empty() && effective_phone(principal).is_none() {
            let email = NormalizedIdentity::email(Some(principal.email.as_str()));
            if email.is_present() {
                match self.repo.list_ownerless_by_email(email.as_str()).await {
                    Ok(extra) => merged = merge_order_sets(merged, extra),
                    Err(err) => {
                        tracing::warn!(
                            user_id = %principal.id,
                            error = %err,
                            "email fallback lookup failed"
                        );
                    }
                }
            }
        }

        Ok(merged)
    }

    /// Guest order history by email, without an account.
    ///
    /// Used by the "find my order" flow before registration. Never fails:
    /// any internal error degrades to an empty list and a log line.
    pub async fn guest_history_by_email(&self, raw_email: &str) -> Vec<Order> {
        let email = NormalizedIdentity::email(Some(raw_email));
        if !email.is_present() {
            return Vec::new();
        }

        match self.repo.list_ownerless_by_email(email.as_str()).await {
            Ok(orders) => orders,
            Err(err) => {
                tracing::warn!(error = %err, "guest email history lookup failed");
                Vec::new()
            }
        }
    }

    /// Link a batch of guest orders to this principal's account.
    ///
    /// Each order is re-verified against the principal's identity and then
    /// claimed with an independent compare-and-set; there is no surrounding
    /// transaction, so a crash mid-batch leaves every already-claimed order
    /// valid. Ineligible orders (not found, already owned, identity mismatch)
    /// are skipped, not errors. Returns the number of orders actually
    /// claimed; re-running with the same input returns 0.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a fetch or update fails; orders claimed
    /// before the failure stay claimed.
    pub async fn link_guest_orders(
        &self,
        principal: &Principal,
        order_ids: &[OrderId],
    ) -> Result<u64, RepositoryError> {
        let mut linked = 0u64;

        for &order_id in order_ids {
            let Some(order) = self.repo.get_by_id(order_id).await? else {
                tracing::debug!(%order_id, "link skipped: order not found");
                continue;
            };

            if !link_eligible(&order, principal) {
                tracing::debug!(
                    %order_id,
                    user_id = %principal.id,
                    "link skipped: order not eligible for this account"
                );
                continue;
            }

            // The WHERE owner_id IS NULL guard makes a concurrent duplicate
            // claim read as false here rather than double-counting.
            if self.repo.claim_for_user(order_id, principal.id).await? {
                tracing::info!(%order_id, user_id = %principal.id, "guest order linked");
                linked += 1;
            }
        }

        Ok(linked)
    }
}
