//! Session context supplied by the auth collaborator.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::permission::can_mutate;
use crate::types::Role;

/// The signed-in user, as reported by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UserIdentity {
    /// User id
    pub id: String,
    /// Email address, when known
    #[serde(default)]
    pub email: Option<String>,
}

impl UserIdentity {
    /// Identity with an id and an optional email.
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}

/// Per-session facts, computed once when the session loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Session {
    /// Signed-in user id
    pub user_id: String,
    /// Signed-in user email
    #[serde(default)]
    pub email: Option<String>,
    /// Role in the active workspace
    pub role: Role,
}

impl Session {
    /// Build a session for `user` with a resolved role.
    pub fn new(user: UserIdentity, role: Role) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            role,
        }
    }

    /// Whether the user may mutate documents and blocks.
    pub fn can_edit(&self) -> bool {
        can_mutate(self.role)
    }
}
