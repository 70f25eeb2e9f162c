//! Monetary amounts in the store currency's minor unit.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A non-negative monetary amount in minor units (centimes).
///
/// All order money fields (subtotal, shipping, discount, total) are integer
/// minor-unit amounts; there is no floating point anywhere in the money path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Create an amount from minor units, clamping negatives to zero.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        if minor < 0 { Self(0) } else { Self(minor) }
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn as_minor(&self) -> i64 {
        self.0
    }

    /// Checked addition; `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Saturating subtraction, floored at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        let v = self.0 - other.0;
        if v < 0 { Self(0) } else { Self(v) }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Money {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Money {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let v = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_minor(v))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor_clamps_negative() {
        assert_eq!(Money::from_minor(-5), Money::ZERO);
        assert_eq!(Money::from_minor(250_000).as_minor(), 250_000);
    }

    #[test]
    fn test_checked_add() {
        let a = Money::from_minor(100);
        let b = Money::from_minor(250);
        assert_eq!(a.checked_add(b).unwrap().as_minor(), 350);
        assert!(Money::from_minor(i64::MAX).checked_add(a).is_none());
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        let a = Money::from_minor(100);
        let b = Money::from_minor(250);
        assert_eq!(b.saturating_sub(a).as_minor(), 150);
        assert_eq!(a.saturating_sub(b), Money::ZERO);
    }

    #[test]
    fn test_serde_transparent() {
        let m = Money::from_minor(4200);
        assert_eq!(serde_json::to_string(&m).unwrap(), "4200");
        let parsed: Money = serde_json::from_str("4200").unwrap();
        assert_eq!(parsed, m);
    }
}
