use serde::{Deserialize, Serialize};

use crate::UserId;

/// Identity of the user performing an administrative action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorIdentity {
    user_id: UserId,
    is_staff: bool,
}

impl ActorIdentity {
    /// Creates an actor identity resolved by the calling platform.
    #[must_use]
    pub fn new(user_id: UserId, is_staff: bool) -> Self {
        Self { user_id, is_staff }
    }

    /// Returns the acting user's identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns whether the actor is global platform staff.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.is_staff
    }
}
