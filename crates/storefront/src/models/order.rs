//! Order domain types.
//!
//! An order is created once at checkout and then mutated only by admin-driven
//! status transitions and by guest-to-account linking. `owner_id` is nullable:
//! a null owner marks a guest order, identified only by the contact details
//! typed at checkout. Linking sets `owner_id` but leaves `guest_phone` and
//! `guest_email` in place as an audit trail, so both can be non-null at once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dahlia_core::{Money, OrderId, OrderStatus, ProductId, UserId};

/// A customer order (domain type).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning account, if any. `None` marks a guest order.
    pub owner_id: Option<UserId>,
    /// Email typed at guest checkout. Kept after linking for audit.
    pub guest_email: Option<String>,
    /// Phone typed at guest checkout, stored exactly as entered
    /// (may contain spaces, hyphens, parentheses). Kept after linking.
    pub guest_phone: Option<String>,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Sum of line totals, in minor units.
    pub subtotal: Money,
    /// Shipping fee, in minor units.
    pub shipping: Money,
    /// Promo discount, in minor units.
    pub discount: Money,
    /// Amount due, in minor units.
    pub total: Money,
    /// Delivery address captured at checkout.
    pub shipping_address: ShippingAddress,
    /// Line items, in the order they were added to the cart.
    pub items: Vec<OrderItem>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Whether this order has no owning account.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.owner_id.is_none()
    }
}

/// A line item snapshot.
///
/// Name and unit price are copied from the product at checkout time so later
/// catalog edits do not rewrite order history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// The product this line refers to.
    pub product_id: ProductId,
    /// Product name at checkout time.
    pub name: String,
    /// Unit price at checkout time, in minor units.
    pub unit_price: Money,
    /// Quantity ordered (>= 1).
    pub quantity: u32,
}

/// Delivery address captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Recipient full name.
    pub full_name: String,
    /// Street address.
    pub street: String,
    /// City or commune.
    pub city: String,
    /// Wilaya (province) the order ships to; drives the shipping fee.
    pub wilaya: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order {
            id: OrderId::new(1),
            owner_id: None,
            guest_email: Some("amel@example.com".to_owned()),
            guest_phone: Some("0555 12 34 56".to_owned()),
            status: OrderStatus::Pending,
            subtotal: Money::from_minor(320_000),
            shipping: Money::from_minor(60_000),
            discount: Money::ZERO,
            total: Money::from_minor(380_000),
            shipping_address: ShippingAddress {
                full_name: "Amel B.".to_owned(),
                street: "12 rue Didouche Mourad".to_owned(),
                city: "Alger Centre".to_owned(),
                wilaya: "Alger".to_owned(),
            },
            items: vec![OrderItem {
                product_id: ProductId::new(4),
                name: "Argan oil 100ml".to_owned(),
                unit_price: Money::from_minor(160_000),
                quantity: 2,
            }],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_guest_flag_follows_owner_id() {
        let mut order = sample_order();
        assert!(order.is_guest());

        order.owner_id = Some(UserId::new(9));
        assert!(!order.is_guest());
    }

    #[test]
    fn test_serde_camel_case_wire_shape() {
        let order = sample_order();
        let json = serde_json::to_value(&order).unwrap();
        assert!(json.get("ownerId").is_some());
        assert!(json.get("guestPhone").is_some());
        assert!(json.get("shippingAddress").is_some());
        assert_eq!(json["items"][0]["unitPrice"], 160_000);
    }
}
