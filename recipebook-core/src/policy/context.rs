//! Caller identity for a single request

use serde::{Deserialize, Serialize};

/// Resolved caller, built from a token whose user still exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub rights: i64,
}

impl Identity {
    pub fn new(user_id: i64, username: impl Into<String>, rights: i64) -> Self {
        Self {
            user_id,
            username: username.into(),
            rights,
        }
    }
}

/// Anonymous or authenticated caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessContext {
    pub identity: Option<Identity>,
}

impl AccessContext {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn user(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.identity.as_ref().map(|i| i.user_id)
    }

    /// Ownership check
    pub fn owns(&self, owner_id: i64) -> bool {
        self.user_id() == Some(owner_id)
    }
}

impl From<Option<Identity>> for AccessContext {
    fn from(identity: Option<Identity>) -> Self {
        Self { identity }
    }
}
