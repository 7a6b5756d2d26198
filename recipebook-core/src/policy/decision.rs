//! Actions, decisions and the traits resources expose to the policy

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the caller is trying to do with a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Update,
    Delete,
    Comment,
    Favorite,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Read => write!(f, "read"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
            Action::Comment => write!(f, "comment"),
            Action::Favorite => write!(f, "favorite"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// No identity was resolved for the request
    Unauthenticated,
    /// Resource exists but the caller may not see it; reported as not found
    Hidden,
    NotOwner,
    /// Commenting on one's own recipe
    OwnResource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Resource with an owning user
pub trait Owned {
    fn owner_id(&self) -> i64;

    /// Name used in error messages
    fn resource_kind(&self) -> &'static str {
        "resource"
    }
}

/// Resource gated by a visibility flag for non-owner reads
pub trait Visible {
    fn is_visible(&self) -> bool;
}
