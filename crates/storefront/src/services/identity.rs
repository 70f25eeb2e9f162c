//! Contact-identity helpers.
//!
//! Accounts registered before the profile gained an explicit phone column
//! were minted a synthetic email of the form `phone-<digits>@<domain>` to
//! satisfy the identity provider's email requirement. That trick is a
//! migration-compatibility shim and it lives here, behind
//! [`effective_phone`]; matching and authorization code only ever sees the
//! derived phone, never the placeholder format.

use dahlia_core::{Email, NormalizedIdentity};

use crate::models::Principal;

/// Local-part prefix of synthetic placeholder emails.
const PLACEHOLDER_PREFIX: &str = "phone-";

/// Extract the phone number from a synthetic placeholder email.
///
/// Returns `None` for ordinary emails, including local parts that merely
/// start with the prefix but are not all digits after it.
#[must_use]
pub fn phone_from_placeholder_email(email: &Email) -> Option<String> {
    let digits = email.local_part().strip_prefix(PLACEHOLDER_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.to_owned())
}

/// The phone number to match orders against for a principal.
///
/// The profile phone wins when it is usable (non-empty after normalization);
/// otherwise the phone is back-filled from the placeholder email. `None`
/// means the principal has no phone identity at all and only email-based
/// matching applies.
#[must_use]
pub fn effective_phone(principal: &Principal) -> Option<String> {
    if NormalizedIdentity::phone(principal.phone.as_deref()).is_present() {
        return principal.phone.clone();
    }
    phone_from_placeholder_email(&principal.email)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dahlia_core::UserId;

    fn principal(email: &str, phone: Option<&str>) -> Principal {
        Principal::new(
            UserId::new(1),
            Email::parse(email).unwrap(),
            phone.map(str::to_owned),
        )
    }

    #[test]
    fn test_placeholder_email_yields_phone() {
        let email = Email::parse("phone-0555123456@dahlia-store.dz").unwrap();
        assert_eq!(
            phone_from_placeholder_email(&email).as_deref(),
            Some("0555123456")
        );
    }

    #[test]
    fn test_ordinary_email_yields_none() {
        let email = Email::parse("amel@example.com").unwrap();
        assert_eq!(phone_from_placeholder_email(&email), None);
    }

    #[test]
    fn test_prefix_without_digits_is_not_a_placeholder() {
        let email = Email::parse("phone-home@example.com").unwrap();
        assert_eq!(phone_from_placeholder_email(&email), None);

        let email = Email::parse("phone-@example.com").unwrap();
        assert_eq!(phone_from_placeholder_email(&email), None);
    }

    #[test]
    fn test_effective_phone_prefers_profile_phone() {
        let p = principal("phone-0555000000@dahlia-store.dz", Some("0666 11 11 11"));
        assert_eq!(effective_phone(&p).as_deref(), Some("0666 11 11 11"));
    }

    #[test]
    fn test_effective_phone_backfills_from_placeholder() {
        let p = principal("phone-0555123456@dahlia-store.dz", None);
        assert_eq!(effective_phone(&p).as_deref(), Some("0555123456"));

        // Blank profile phone is not usable either
        let p = principal("phone-0555123456@dahlia-store.dz", Some("  "));
        assert_eq!(effective_phone(&p).as_deref(), Some("0555123456"));
    }

    #[test]
    fn test_no_phone_identity_at_all() {
        let p = principal("amel@example.com", None);
        assert_eq!(effective_phone(&p), None);
    }
}
