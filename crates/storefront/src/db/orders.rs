//! Order repository for database operations.
//!
//! Read paths come in two flavors: indexed lookups (by id, owner, or the
//! verbatim guest phone) and the ownerless scan used by the normalized
//! matching fallback, where canonicalization has to happen in application
//! code because the stored strings keep whatever formatting the customer
//! typed at checkout.
//!
//! The single write path, [`OrderRepository::claim_for_user`], is a
//! compare-and-set on `owner_id IS NULL` so each link is an independent,
//! idempotent unit of work - no multi-row transaction required.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dahlia_core::{Money, OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, ShippingAddress};

const ORDER_COLUMNS: &str = "id, owner_id, guest_email, guest_phone, status, \
     subtotal, shipping, discount, total, shipping_address, items, created_at";

/// Raw order row as stored; converted to the domain type by `into_order`.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    owner_id: Option<i32>,
    guest_email: Option<String>,
    guest_phone: Option<String>,
    status: String,
    subtotal: Money,
    shipping: Money,
    discount: Money,
    total: Money,
    shipping_address: String,
    items: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let status: OrderStatus = self.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        let shipping_address: ShippingAddress = serde_json::from_str(&self.shipping_address)
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid shipping address data: {e}"))
            })?;

        let items: Vec<OrderItem> = serde_json::from_str(&self.items)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid line item data: {e}")))?;

        Ok(Order {
            id: OrderId::new(self.id),
            owner_id: self.owner_id.map(UserId::new),
            guest_email: self.guest_email,
            guest_phone: self.guest_phone,
            status,
            subtotal: self.subtotal,
            shipping: self.shipping,
            discount: self.discount,
            total: self.total,
            shipping_address,
            items,
            created_at: self.created_at,
        })
    }
}

fn rows_into_orders(rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
    rows.into_iter().map(OrderRow::into_order).collect()
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM storefront.orders WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// List orders owned by an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_owned(&self, owner_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM storefront.orders \
             WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows_into_orders(rows)
    }

    /// List guest orders whose stored phone equals `phone` verbatim.
    ///
    /// This is the cheap, indexable first step of the matching chain; it
    /// misses orders whose phone was typed with different formatting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_guest_by_exact_phone(
        &self,
        phone: &str,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM storefront.orders \
             WHERE owner_id IS NULL AND guest_phone = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(phone)
        .fetch_all(self.pool)
        .await?;

        rows_into_orders(rows)
    }

    /// List every guest order, for in-memory normalized matching.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_ownerless(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM storefront.orders \
             WHERE owner_id IS NULL ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows_into_orders(rows)
    }

    /// List guest orders whose email canonicalizes to `normalized_email`.
    ///
    /// The canonicalization applied in SQL (lower + trim) mirrors
    /// `NormalizedIdentity::email`; the argument must already be normalized
    /// and non-empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_ownerless_by_email(
        &self,
        normalized_email: &str,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM storefront.orders \
             WHERE owner_id IS NULL AND LOWER(TRIM(guest_email)) = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(normalized_email)
        .fetch_all(self.pool)
        .await?;

        rows_into_orders(rows)
    }

    /// Assign an ownerless order to an account.
    ///
    /// Compare-and-set on `owner_id IS NULL`: returns `true` if this call
    /// claimed the order, `false` if it was already owned (by this account or
    /// any other). Guest contact fields are deliberately left untouched as an
    /// audit trail. A concurrent duplicate claim loses the race and reads as
    /// `false`, never as an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn claim_for_user(
        &self,
        order_id: OrderId,
        owner_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE storefront.orders SET owner_id = $1 \
             WHERE id = $2 AND owner_id IS NULL",
        )
        .bind(owner_id.as_i32())
        .bind(order_id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
