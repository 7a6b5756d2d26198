//! Integration test helpers
//!
//! Each test gets its own server on a free port, backed by an in-memory
//! database and a scratch upload directory.

#![allow(dead_code)]

use recipebook_core::RecipeBookConfig;
use recipebook_web::AppState;
use serde_json::{json, Value};
use std::sync::LazyLock;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Upload limit used by test servers
pub const MAX_UPLOAD_MB: usize = 1;

/// Smallest byte string the upload sniffer accepts as PNG
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub state: AppState,
    _uploads: TempDir,
}

/// Registered account with a live token
pub struct TestUser {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

impl TestUser {
    pub fn token(&self) -> Option<&str> {
        Some(&self.token)
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.address, path)
    }

    fn with_token(
        &self,
        builder: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        self.with_token(self.api_client.get(self.url(path)), token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post<Body>(&self, path: &str, token: Option<&str>, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.with_token(self.api_client.post(self.url(path)), token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put<Body>(&self, path: &str, token: Option<&str>, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.with_token(self.api_client.put(self.url(path)), token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        self.with_token(self.api_client.delete(self.url(path)), token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Multipart upload with the bytes in the `file` field
    pub async fn upload(&self, path: &str, token: Option<&str>, bytes: Vec<u8>) -> reqwest::Response {
        let part = reqwest::multipart::Part::bytes(bytes).file_name("upload.bin");
        let form = reqwest::multipart::Form::new().part("file", part);

        self.with_token(self.api_client.post(self.url(path)), token)
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_signup(&self, login: &str, email: &str, password: &str) -> reqwest::Response {
        self.post(
            "/signup",
            None,
            &json!({
                "login": login,
                "email": email,
                "password": password,
                "confirm_password": password,
            }),
        )
        .await
    }

    pub async fn post_signin(&self, login: &str, password: &str) -> reqwest::Response {
        self.post("/signin", None, &json!({ "login": login, "password": password }))
            .await
    }

    /// Sign up and sign in a fresh account
    pub async fn register(&self, login: &str) -> TestUser {
        let email = format!("{}@example.com", login);
        let password = format!("{}-password", login);

        let response = self.post_signup(login, &email, &password).await;
        assert_eq!(response.status().as_u16(), 200, "signup of {}", login);

        let body: Value = self.post_signin(login, &password).await.json().await.unwrap();
        let token = body["token"].as_str().expect("token in signin response").to_string();

        let profile: Value = self.get("/profile", Some(&token)).await.json().await.unwrap();

        TestUser {
            id: profile["id"].as_i64().unwrap(),
            login: login.to_string(),
            email,
            password,
            token,
        }
    }

    /// Create a named recipe, optionally published
    pub async fn create_recipe(&self, owner: &TestUser, name: &str, visible: bool) -> i64 {
        let body: Value = self
            .post("/my-recipes", owner.token(), &json!({}))
            .await
            .json()
            .await
            .unwrap();
        let id = body["id"].as_i64().unwrap();

        let response = self
            .put(
                &format!("/my-recipes/{}", id),
                owner.token(),
                &json!({ "name": name, "servings": 2, "time": 30 }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 200);

        if visible {
            let response = self
                .put(
                    &format!("/my-recipes/{}/visibility", id),
                    owner.token(),
                    &json!({ "visible": true }),
                )
                .await;
            assert_eq!(response.status().as_u16(), 200);
        }
        id
    }
}

pub async fn spawn_app() -> TestApp {
    LazyLock::force(&TRACING);

    let uploads = tempfile::tempdir().unwrap();

    let mut config = RecipeBookConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.dev_mode = true;
    config.database.url = "sqlite::memory:".to_string();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.uploads.dir = uploads.path().to_path_buf();
    config.uploads.max_file_size_mb = MAX_UPLOAD_MB;

    let state = AppState::new(config).await.unwrap();
    let app = recipebook_web::create_app(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        port,
        api_client: client,
        state,
        _uploads: uploads,
    }
}
