//! The authenticated principal.

use dahlia_core::{Email, UserId};

/// The identity making a request, as established by the identity provider.
///
/// The identity provider assigns the stable `id` at registration; this
/// subsystem never creates or mutates principals. `email` may be a synthetic
/// `phone-<digits>@<domain>` placeholder minted for phone-only registrations;
/// `phone` is `None` for accounts created before the explicit phone field
/// existed, in which case the identity service derives one from the
/// placeholder email.
#[derive(Debug, Clone)]
pub struct Principal {
    /// Stable account ID from the identity provider.
    pub id: UserId,
    /// Registered email, possibly a phone placeholder.
    pub email: Email,
    /// Registered phone, if one was collected.
    pub phone: Option<String>,
}

impl Principal {
    /// Build a principal from session-stored identity data.
    #[must_use]
    pub const fn new(id: UserId, email: Email, phone: Option<String>) -> Self {
        Self { id, email, phone }
    }
}
