//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use chirpy::{
    AppState, routes,
    store::Store,
    vault::{MIN_COST, Vault},
};

pub const WEBHOOK_KEY: &str = "test-polka-key";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// State shared with the router
    pub state: AppState,
    /// Static files served under /app
    _static_dir: TempDir,
}

/// Response returned from a test request
pub struct TestResponse {
    pub status: StatusCode,
    /// JSON body, or the raw text as a JSON string when it is not JSON
    pub body: Value,
}

impl TestApp {
    /// Create a new test application around an in-memory store
    pub fn new() -> Self {
        let store = Store::in_memory(Vault::new(MIN_COST));
        let state = AppState::new(store, "integration-secret", Some(WEBHOOK_KEY.to_string()));

        let static_dir = tempfile::tempdir().expect("Failed to create static dir");
        std::fs::write(static_dir.path().join("index.html"), "<h1>Chirpy</h1>")
            .expect("Failed to write index.html");

        let router = routes::router(state.clone(), static_dir.path(), 64);

        Self {
            router,
            state,
            _static_dir: static_dir,
        }
    }

    /// Make an HTTP request with an optional JSON body and bearer token
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(req).await
    }

    /// Make a form-encoded POST
    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a fully built request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse { status, body }
    }

    /// Sign up an account and return its id
    pub async fn signup(&self, email: &str, password: &str) -> u64 {
        let response = self
            .request(
                "POST",
                "/api/users",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "signup failed: {}", response.body);

        response.body["id"].as_u64().expect("id in signup response")
    }

    /// Log in and return (access token, refresh token)
    pub async fn login(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/api/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);

        (
            response.body["token"].as_str().expect("token").to_string(),
            response.body["refresh_token"]
                .as_str()
                .expect("refresh_token")
                .to_string(),
        )
    }
}
