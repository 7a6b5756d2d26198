//! Registration, login and profile management

mod helpers;

use helpers::spawn_app;
use serde_json::{json, Value};

#[tokio::test]
async fn test_signup_then_signin_returns_token() {
    let app = spawn_app().await;

    let response = app.post_signup("julia", "julia@example.com", "secret1").await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.post_signin("julia", "secret1").await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_signup_validation_failures() {
    let app = spawn_app().await;

    let cases = [
        json!({ "login": "", "email": "a@example.com", "password": "secret1", "confirm_password": "secret1" }),
        json!({ "login": "a", "email": "", "password": "secret1", "confirm_password": "secret1" }),
        json!({ "login": "a", "email": "a@example.com", "password": "short", "confirm_password": "short" }),
        json!({ "login": "a", "email": "a@example.com", "password": "secret1", "confirm_password": "secret2" }),
    ];

    for case in cases {
        let response = app.post("/signup", None, &case).await;
        assert_eq!(response.status().as_u16(), 400, "{}", case);
    }
}

#[tokio::test]
async fn test_duplicate_login_or_email_conflicts() {
    let app = spawn_app().await;
    app.register("julia").await;

    let response = app.post_signup("julia", "other@example.com", "secret1").await;
    assert_eq!(response.status().as_u16(), 409);

    let response = app.post_signup("other", "julia@example.com", "secret1").await;
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn test_signin_failures() {
    let app = spawn_app().await;
    let julia = app.register("julia").await;

    let response = app.post_signin("julia", "wrong-password").await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app.post_signin("nobody", &julia.password).await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app.post_signin("", "").await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn test_profile_shows_own_email_but_public_view_does_not() {
    let app = spawn_app().await;
    let julia = app.register("julia").await;

    let profile: Value = app.get("/profile", julia.token()).await.json().await.unwrap();
    assert_eq!(profile["username"], "julia");
    assert_eq!(profile["email"], julia.email);

    let public: Value = app
        .get(&format!("/users/{}", julia.id), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(public["username"], "julia");
    assert!(public.get("email").is_none());

    let response = app.get("/users/9999", None).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = spawn_app().await;

    let response = app.get("/profile", None).await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app.get("/profile", Some("garbage")).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn test_update_profile_login_and_password() {
    let app = spawn_app().await;
    let julia = app.register("julia").await;

    let response = app.put("/profile", julia.token(), &json!({})).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Nothing to change");

    // A new password needs the old one
    let response = app
        .put(
            "/profile",
            julia.token(),
            &json!({ "password": "brand-new", "confirm_password": "brand-new" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app
        .put(
            "/profile",
            julia.token(),
            &json!({
                "login": "julia2",
                "old_password": julia.password,
                "password": "brand-new",
                "confirm_password": "brand-new",
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    assert_eq!(app.post_signin("julia", "brand-new").await.status().as_u16(), 401);
    assert_eq!(app.post_signin("julia2", &julia.password).await.status().as_u16(), 401);
    assert_eq!(app.post_signin("julia2", "brand-new").await.status().as_u16(), 200);
}

#[tokio::test]
async fn test_rejected_profile_update_changes_nothing() {
    let app = spawn_app().await;
    let julia = app.register("julia").await;
    app.register("taken").await;

    // Login is free but the email belongs to someone else
    let response = app
        .put(
            "/profile",
            julia.token(),
            &json!({ "login": "fresh", "email": "taken@example.com" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 409);

    let profile: Value = app.get("/profile", julia.token()).await.json().await.unwrap();
    assert_eq!(profile["username"], "julia");
}

#[tokio::test]
async fn test_deleted_account_frees_name_and_kills_token() {
    let app = spawn_app().await;
    let julia = app.register("julia").await;

    let response = app.delete("/profile", julia.token()).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.get("/profile", julia.token()).await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app.post_signin("julia", &julia.password).await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app.post_signup("julia", "julia@example.com", "secret1").await;
    assert_eq!(response.status().as_u16(), 200);
}
