//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use dahlia_core::{Email, UserId};

use super::Principal;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user. The
/// identity provider writes this at login; order routes only read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's account ID.
    pub id: UserId,
    /// User's email address (possibly a phone placeholder).
    pub email: Email,
    /// User's phone number, if on file.
    pub phone: Option<String>,
}

impl From<CurrentUser> for Principal {
    fn from(user: CurrentUser) -> Self {
        Self::new(user.id, user.email, user.phone)
    }
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
