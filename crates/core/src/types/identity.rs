//! Normalized contact identities for order reconciliation.
//!
//! Guest checkout records a phone or email exactly as typed, so the same
//! customer shows up as `"0555 12 34 56"` on one order and `"0555123456"` on
//! the profile. [`NormalizedIdentity`] is the canonical comparison form: it is
//! derived on demand, compared, and thrown away - never stored.

use core::fmt;

/// A canonicalized phone number or email address.
///
/// Two raw strings denote the same identity iff their normalized forms are
/// equal **and non-empty**. The non-empty requirement is load-bearing: two
/// records that both lack a phone must never be considered the same customer,
/// so [`NormalizedIdentity::matches`] always returns `false` for empty values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedIdentity(String);

impl NormalizedIdentity {
    /// Canonicalize a phone number.
    ///
    /// Removes all whitespace, hyphens, and parentheses. Digit order is
    /// preserved and no country-code prefix is added or removed.
    /// `None` and empty input normalize to the empty identity.
    #[must_use]
    pub fn phone(raw: Option<&str>) -> Self {
        let normalized = raw
            .unwrap_or("")
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '(' && *c != ')')
            .collect();
        Self(normalized)
    }

    /// Canonicalize an email address (trim + lowercase).
    ///
    /// `None` and empty input normalize to the empty identity.
    #[must_use]
    pub fn email(raw: Option<&str>) -> Self {
        Self(raw.unwrap_or("").trim().to_lowercase())
    }

    /// Whether this identity carries an actual value.
    #[must_use]
    pub fn is_present(&self) -> bool {
        !self.0.is_empty()
    }

    /// Whether two identities refer to the same contact point.
    ///
    /// Empty never matches empty; a record with no phone is not "the same
    /// customer" as another record with no phone.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.is_present() && self.0 == other.0
    }

    /// The canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
