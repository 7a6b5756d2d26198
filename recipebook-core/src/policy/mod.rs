//! Access policy
//!
//! Every read and write path asks [`authorize`] (or [`ensure`]) before
//! touching a recipe or comment. The policy itself is pure; identity
//! resolution against the user table happens in the web layer and arrives
//! here as an [`AccessContext`].

mod context;
mod decision;

pub use context::{AccessContext, Identity};
pub use decision::{AccessDecision, Action, DenyReason, Owned, Visible};

use crate::error::{ErrorContext, RecipeBookError, RecipeBookResult};
use crate::forbidden_error;
use tracing::debug;

pub const MIN_RATING: i64 = 0;
pub const MAX_RATING: i64 = 5;

/// Decide whether `ctx` may perform `action` on `resource`.
pub fn authorize<R>(ctx: &AccessContext, action: Action, resource: &R) -> AccessDecision
where
    R: Owned + Visible + ?Sized,
{
    let owner = resource.owner_id();

    match action {
        Action::Read => {
            if resource.is_visible() || ctx.owns(owner) {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny(DenyReason::Hidden)
            }
        }
        Action::Update | Action::Delete => {
            if !ctx.is_authenticated() {
                AccessDecision::Deny(DenyReason::Unauthenticated)
            } else if !ctx.owns(owner) {
                AccessDecision::Deny(DenyReason::NotOwner)
            } else {
                AccessDecision::Allow
            }
        }
        Action::Comment => {
            if !ctx.is_authenticated() {
                AccessDecision::Deny(DenyReason::Unauthenticated)
            } else if !resource.is_visible() {
                // Owners see their hidden recipes but still may not comment
                AccessDecision::Deny(DenyReason::Hidden)
            } else if ctx.owns(owner) {
                AccessDecision::Deny(DenyReason::OwnResource)
            } else {
                AccessDecision::Allow
            }
        }
        Action::Favorite => {
            if !ctx.is_authenticated() {
                AccessDecision::Deny(DenyReason::Unauthenticated)
            } else {
                authorize(ctx, Action::Read, resource)
            }
        }
    }
}

/// [`authorize`], turning a denial into the error callers report.
pub fn ensure<R>(ctx: &AccessContext, action: Action, resource: &R) -> RecipeBookResult<()>
where
    R: Owned + Visible + ?Sized,
{
    let reason = match authorize(ctx, action, resource) {
        AccessDecision::Allow => return Ok(()),
        AccessDecision::Deny(reason) => reason,
    };

    debug!(
        user_id = ?ctx.user_id(),
        %action,
        resource = resource.resource_kind(),
        ?reason,
        "Access denied"
    );

    let kind = resource.resource_kind();
    let context = ErrorContext::new("policy").with_operation(&action.to_string());

    Err(match reason {
        DenyReason::Unauthenticated => RecipeBookError::Authentication {
            message: "Authentication required".to_string(),
            context,
        },
        DenyReason::Hidden => RecipeBookError::NotFound {
            resource: capitalize(kind),
            context,
        },
        DenyReason::NotOwner => {
            forbidden_error!(format!("You are not the owner of this {}", kind), "policy")
        }
        DenyReason::OwnResource => {
            forbidden_error!(format!("You cannot {} your own {}", action, kind), "policy")
        }
    })
}

/// A comment rating must fall within `[MIN_RATING, MAX_RATING]`.
pub fn validate_rating(rate: i64) -> RecipeBookResult<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rate) {
        Ok(())
    } else {
        Err(RecipeBookError::Validation {
            message: format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            ),
            field: Some("rate".to_string()),
            context: ErrorContext::new("policy").with_operation("validate_rating"),
        })
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doc {
        owner: i64,
        visible: bool,
    }

    impl Owned for Doc {
        fn owner_id(&self) -> i64 {
            self.owner
        }
    }

    impl Visible for Doc {
        fn is_visible(&self) -> bool {
            self.visible
        }
    }

    fn caller(id: i64) -> AccessContext {
        AccessContext::user(Identity::new(id, format!("user{}", id), 0))
    }

    const HIDDEN: Doc = Doc {
        owner: 1,
        visible: false,
    };
    const PUBLIC: Doc = Doc {
        owner: 1,
        visible: true,
    };

    #[test]
    fn test_read_visibility_gate() {
        let anon = AccessContext::anonymous();
        assert!(authorize(&anon, Action::Read, &PUBLIC).is_allowed());
        assert_eq!(
            authorize(&anon, Action::Read, &HIDDEN),
            AccessDecision::Deny(DenyReason::Hidden)
        );
        assert_eq!(
            authorize(&caller(2), Action::Read, &HIDDEN),
            AccessDecision::Deny(DenyReason::Hidden)
        );
        assert!(authorize(&caller(1), Action::Read, &HIDDEN).is_allowed());
    }

    #[test]
    fn test_mutations_need_owner() {
        for action in [Action::Update, Action::Delete] {
            assert_eq!(
                authorize(&AccessContext::anonymous(), action, &PUBLIC),
                AccessDecision::Deny(DenyReason::Unauthenticated)
            );
            assert_eq!(
                authorize(&caller(2), action, &PUBLIC),
                AccessDecision::Deny(DenyReason::NotOwner)
            );
            assert!(authorize(&caller(1), action, &HIDDEN).is_allowed());
        }
    }

    #[test]
    fn test_comment_rules() {
        assert_eq!(
            authorize(&AccessContext::anonymous(), Action::Comment, &PUBLIC),
            AccessDecision::Deny(DenyReason::Unauthenticated)
        );
        assert_eq!(
            authorize(&caller(1), Action::Comment, &PUBLIC),
            AccessDecision::Deny(DenyReason::OwnResource)
        );
        assert_eq!(
            authorize(&caller(2), Action::Comment, &HIDDEN),
            AccessDecision::Deny(DenyReason::Hidden)
        );
        // Hidden wins over ownership for the owner too
        assert_eq!(
            authorize(&caller(1), Action::Comment, &HIDDEN),
            AccessDecision::Deny(DenyReason::Hidden)
        );
        assert!(authorize(&caller(2), Action::Comment, &PUBLIC).is_allowed());
    }

    #[test]
    fn test_favorite_follows_read() {
        assert_eq!(
            authorize(&AccessContext::anonymous(), Action::Favorite, &PUBLIC),
            AccessDecision::Deny(DenyReason::Unauthenticated)
        );
        assert_eq!(
            authorize(&caller(2), Action::Favorite, &HIDDEN),
            AccessDecision::Deny(DenyReason::Hidden)
        );
        assert!(authorize(&caller(1), Action::Favorite, &HIDDEN).is_allowed());
        assert!(authorize(&caller(1), Action::Favorite, &PUBLIC).is_allowed());
    }

    #[test]
    fn test_ensure_maps_reasons_to_errors() {
        let err = ensure(&caller(2), Action::Read, &HIDDEN).unwrap_err();
        assert!(matches!(err, RecipeBookError::NotFound { .. }));

        let err = ensure(&caller(2), Action::Delete, &PUBLIC).unwrap_err();
        assert!(matches!(err, RecipeBookError::Forbidden { .. }));

        let err = ensure(&caller(1), Action::Comment, &PUBLIC).unwrap_err();
        assert!(matches!(err, RecipeBookError::Forbidden { .. }));

        let err = ensure(&AccessContext::anonymous(), Action::Update, &PUBLIC).unwrap_err();
        assert!(matches!(err, RecipeBookError::Authentication { .. }));

        assert!(ensure(&caller(1), Action::Update, &PUBLIC).is_ok());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(0).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(-1).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("recipe"), "Recipe");
        assert_eq!(capitalize(""), "");
    }
}
