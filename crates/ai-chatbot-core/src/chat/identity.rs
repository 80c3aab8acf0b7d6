//! Identity provider boundary

use crate::types::UserId;

/// Source of the signed-in user
pub trait IdentityProvider {
    /// Whether the provider finished loading its session state
    fn is_loaded(&self) -> bool;

    /// The signed-in user, if any
    fn current_user(&self) -> Option<UserId>;
}

/// Identity fixed at construction (CLI `--user`, tests)
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<UserId>,
}

impl StaticIdentity {
    /// Signed in as `user_id`; a blank id means signed out
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self { user: UserId::new(user_id) }
    }

    /// Nobody signed in
    pub fn signed_out() -> Self {
        Self { user: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn is_loaded(&self) -> bool {
        true
    }

    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}
