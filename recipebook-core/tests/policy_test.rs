//! Access policy against the real domain types

use chrono::Utc;
use recipebook_core::{
    authorize, ensure, AccessContext, AccessDecision, Action, Comment, DenyReason, Identity,
    Recipe, RecipeBookError,
};

fn recipe(owner: i64, visible: bool) -> Recipe {
    Recipe {
        id: 10,
        user_id: owner,
        name: "Pelmeni".to_string(),
        servings: 4,
        time: 90,
        country: "Russia".to_string(),
        kind: "main".to_string(),
        cover: String::new(),
        visible,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn comment(author: i64) -> Comment {
    Comment {
        id: 5,
        recipe_id: 10,
        user_id: author,
        username: format!("user{}", author),
        text: "Great".to_string(),
        rate: 5,
        created_at: Utc::now(),
    }
}

fn as_user(id: i64) -> AccessContext {
    AccessContext::user(Identity::new(id, format!("user{}", id), 0))
}

#[test]
fn hidden_recipe_reads_as_missing_for_everyone_but_owner() {
    let hidden = recipe(1, false);

    let err = ensure(&AccessContext::anonymous(), Action::Read, &hidden).unwrap_err();
    match err {
        RecipeBookError::NotFound { resource, .. } => assert_eq!(resource, "Recipe"),
        other => panic!("Expected NotFound, got {:?}", other),
    }

    assert!(ensure(&as_user(2), Action::Read, &hidden).is_err());
    assert!(ensure(&as_user(1), Action::Read, &hidden).is_ok());
}

#[test]
fn publishing_opens_reads_but_not_writes() {
    let public = recipe(1, true);

    assert!(ensure(&AccessContext::anonymous(), Action::Read, &public).is_ok());
    assert_eq!(
        authorize(&as_user(2), Action::Update, &public),
        AccessDecision::Deny(DenyReason::NotOwner)
    );
    assert_eq!(
        authorize(&as_user(2), Action::Delete, &public),
        AccessDecision::Deny(DenyReason::NotOwner)
    );
}

#[test]
fn owner_cannot_comment_on_own_recipe() {
    let public = recipe(1, true);

    let err = ensure(&as_user(1), Action::Comment, &public).unwrap_err();
    assert!(matches!(err, RecipeBookError::Forbidden { .. }));
    assert!(ensure(&as_user(2), Action::Comment, &public).is_ok());
}

#[test]
fn comments_are_deleted_only_by_their_author() {
    let c = comment(2);

    assert!(ensure(&as_user(2), Action::Delete, &c).is_ok());
    assert_eq!(
        authorize(&as_user(1), Action::Delete, &c),
        AccessDecision::Deny(DenyReason::NotOwner)
    );
    assert_eq!(
        authorize(&AccessContext::anonymous(), Action::Delete, &c),
        AccessDecision::Deny(DenyReason::Unauthenticated)
    );
}

#[test]
fn context_from_optional_identity() {
    let ctx: AccessContext = None.into();
    assert!(!ctx.is_authenticated());

    let ctx: AccessContext = Some(Identity::new(7, "seven", 1)).into();
    assert_eq!(ctx.user_id(), Some(7));
    assert!(ctx.owns(7));
    assert!(!ctx.owns(8));
}
