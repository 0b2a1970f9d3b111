//! Authenticated actor context
//!
//! An explicit value handed to whichever component acts on a user's
//! behalf, instead of ambient global auth state. Created once the
//! identity provider has verified the user and passed along from there.

use crate::ids::UserId;

/// The acting collaborator: identity key plus display name snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    /// Stable identity key
    pub user: UserId,
    /// Display name at session start
    pub display_name: String,
}

impl ActorContext {
    /// Build a context for a verified user
    #[inline]
    #[must_use]
    pub fn new(user: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user,
            display_name: display_name.into(),
        }
    }
}
