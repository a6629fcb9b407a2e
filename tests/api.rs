//! Integration tests for the HTTP surface.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use helpers::{TestApp, WEBHOOK_KEY};
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/healthz", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
}

#[tokio::test]
async fn test_signup_and_duplicate_email() {
    let app = TestApp::new();

    assert_eq!(app.signup("a@x.com", "pw").await, 1);
    assert_eq!(app.signup("b@x.com", "pw").await, 2);

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(json!({ "email": "a@x.com", "password": "other" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_validates_input() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/users",
            Some(json!({ "email": "not-an-email", "password": "pw" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_response_hides_hash() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw").await;

    let response = app
        .request(
            "POST",
            "/api/login",
            Some(json!({ "email": "a@x.com", "password": "pw" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], 1);
    assert_eq!(response.body["email"], "a@x.com");
    assert_eq!(response.body["is_chirpy_red"], false);
    assert!(response.body.get("token").is_some());
    assert!(response.body.get("refresh_token").is_some());
    assert!(response.body.get("hash").is_none());
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw").await;

    let wrong_password = app
        .request(
            "POST",
            "/api/login",
            Some(json!({ "email": "a@x.com", "password": "nope" })),
            None,
        )
        .await;
    let unknown_email = app
        .request(
            "POST",
            "/api/login",
            Some(json!({ "email": "ghost@x.com", "password": "pw" })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status, unknown_email.status);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_post_ownership_scenario() {
    let app = TestApp::new();
    assert_eq!(app.signup("a@x.com", "pw").await, 1);
    assert_eq!(app.signup("b@x.com", "pw").await, 2);
    let (alice, _) = app.login("a@x.com", "pw").await;
    let (bob, _) = app.login("b@x.com", "pw").await;

    let created = app
        .request("POST", "/api/chirps", Some(json!({ "body": "hello" })), Some(&alice))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["id"], 1);
    assert_eq!(created.body["author_id"], 1);

    let edit = app
        .request("PUT", "/api/chirps/1", Some(json!({ "body": "mine" })), Some(&bob))
        .await;
    assert_eq!(edit.status, StatusCode::FORBIDDEN);

    let denied = app.request("DELETE", "/api/chirps/1", None, Some(&bob)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let edit = app
        .request("PUT", "/api/chirps/1", Some(json!({ "body": "edited" })), Some(&alice))
        .await;
    assert_eq!(edit.status, StatusCode::OK);
    assert_eq!(edit.body["body"], "edited");

    let deleted = app.request("DELETE", "/api/chirps/1", None, Some(&alice)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let listed = app.request("GET", "/api/chirps", None, None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body, json!([]));

    let missing = app.request("GET", "/api/chirps/1", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_requires_access_token() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw").await;
    let (_, refresh) = app.login("a@x.com", "pw").await;

    let no_token = app
        .request("POST", "/api/chirps", Some(json!({ "body": "hi" })), None)
        .await;
    assert_eq!(no_token.status, StatusCode::UNAUTHORIZED);

    let refresh_token = app
        .request("POST", "/api/chirps", Some(json!({ "body": "hi" })), Some(&refresh))
        .await;
    assert_eq!(refresh_token.status, StatusCode::UNAUTHORIZED);

    let garbage = app
        .request("POST", "/api/chirps", Some(json!({ "body": "hi" })), Some("garbage"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bare_token_header_is_accepted() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw").await;
    let (access, _) = app.login("a@x.com", "pw").await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/chirps")
        .header(header::AUTHORIZATION, access)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "body": "bare" }).to_string()))
        .unwrap();

    assert_eq!(app.send(req).await.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_long_post_is_rejected() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw").await;
    let (access, _) = app.login("a@x.com", "pw").await;

    let at_limit = app
        .request("POST", "/api/chirps", Some(json!({ "body": "a".repeat(140) })), Some(&access))
        .await;
    assert_eq!(at_limit.status, StatusCode::CREATED);

    let too_long = app
        .request("POST", "/api/chirps", Some(json!({ "body": "a".repeat(141) })), Some(&access))
        .await;
    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);

    let listed = app.request("GET", "/api/chirps", None, None).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_profanity_is_masked() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw").await;
    let (access, _) = app.login("a@x.com", "pw").await;

    let created = app
        .request(
            "POST",
            "/api/chirps",
            Some(json!({ "chirpBody": "what a Kerfuffle today" })),
            Some(&access),
        )
        .await;

    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["body"], "what a **** today");
}

#[tokio::test]
async fn test_listing_order_and_author_filter() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw").await;
    app.signup("b@x.com", "pw").await;
    let (alice, _) = app.login("a@x.com", "pw").await;
    let (bob, _) = app.login("b@x.com", "pw").await;

    for (token, body) in [(&alice, "one"), (&bob, "two"), (&alice, "three")] {
        let response = app
            .request("POST", "/api/chirps", Some(json!({ "body": body })), Some(token))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let ids = |body: &serde_json::Value| -> Vec<u64> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_u64().unwrap())
            .collect()
    };

    let all = app.request("GET", "/api/chirps", None, None).await;
    assert_eq!(ids(&all.body), vec![1, 2, 3]);

    let desc = app.request("GET", "/api/chirps?sort=desc", None, None).await;
    assert_eq!(ids(&desc.body), vec![3, 2, 1]);

    let by_alice = app.request("GET", "/api/chirps?author_id=1", None, None).await;
    assert_eq!(ids(&by_alice.body), vec![1, 3]);
}

#[tokio::test]
async fn test_refresh_and_revoke() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw").await;
    let (access, refresh) = app.login("a@x.com", "pw").await;

    let refreshed = app.request("POST", "/api/refresh", None, Some(&refresh)).await;
    assert_eq!(refreshed.status, StatusCode::OK);
    let new_access = refreshed.body["token"].as_str().unwrap().to_string();
    assert_eq!(app.state.sessions.authenticate(&new_access).unwrap(), 1);

    let with_access = app.request("POST", "/api/refresh", None, Some(&access)).await;
    assert_eq!(with_access.status, StatusCode::UNAUTHORIZED);

    let revoked = app.request("POST", "/api/revoke", None, Some(&refresh)).await;
    assert_eq!(revoked.status, StatusCode::OK);
    assert!(!app.state.store.is_live_refresh_token(&refresh).unwrap());

    let after = app.request("POST", "/api/refresh", None, Some(&refresh)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    let again = app.request("POST", "/api/revoke", None, Some(&refresh)).await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_account() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw").await;
    let (access, refresh) = app.login("a@x.com", "pw").await;

    let with_refresh = app
        .request(
            "PUT",
            "/api/users",
            Some(json!({ "email": "new@x.com", "password": "pw2" })),
            Some(&refresh),
        )
        .await;
    assert_eq!(with_refresh.status, StatusCode::UNAUTHORIZED);

    let updated = app
        .request(
            "PUT",
            "/api/users",
            Some(json!({ "email": "new@x.com", "password": "pw2" })),
            Some(&access),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["id"], 1);
    assert_eq!(updated.body["email"], "new@x.com");

    app.login("new@x.com", "pw2").await;
}

#[tokio::test]
async fn test_oauth_password_grant() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw").await;

    let response = app
        .post_form("/oauth/token", "grant_type=password&username=a%40x.com&password=pw")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["token_type"], "Bearer");
    assert_eq!(response.body["expires_in"], 3600);
    let refresh = response.body["refresh_token"].as_str().unwrap();
    assert!(app.state.store.is_live_refresh_token(refresh).unwrap());

    let bad = app
        .post_form("/oauth/token", "username=a%40x.com&password=wrong")
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upgrade_webhook() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw").await;
    let event = json!({ "event": "user.upgraded", "data": { "user_id": 1 } });

    let unauthorized = app
        .request("POST", "/api/polka/webhooks", Some(event.clone()), Some("wrong-key"))
        .await;
    assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);
    assert!(!app.state.store.get_account(1).unwrap().is_upgraded);

    let ignored = app
        .request(
            "POST",
            "/api/polka/webhooks",
            Some(json!({ "event": "user.payment_failed", "data": { "user_id": 1 } })),
            Some(WEBHOOK_KEY),
        )
        .await;
    assert_eq!(ignored.status, StatusCode::NO_CONTENT);
    assert!(!app.state.store.get_account(1).unwrap().is_upgraded);

    let upgraded = app
        .request("POST", "/api/polka/webhooks", Some(event), Some(WEBHOOK_KEY))
        .await;
    assert_eq!(upgraded.status, StatusCode::NO_CONTENT);
    assert!(app.state.store.get_account(1).unwrap().is_upgraded);

    let unknown = app
        .request(
            "POST",
            "/api/polka/webhooks",
            Some(json!({ "event": "user.upgraded", "data": { "user_id": 99 } })),
            Some(WEBHOOK_KEY),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_webhook_key_scheme_and_missing_account() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw").await;

    let missing_user = app
        .request(
            "POST",
            "/api/polka/webhooks",
            Some(json!({ "event": "user.upgraded", "data": {} })),
            Some(WEBHOOK_KEY),
        )
        .await;
    assert_eq!(missing_user.status, StatusCode::BAD_REQUEST);

    let event = json!({ "event": "user.upgraded", "data": { "user_id": 1 } });
    let req = Request::builder()
        .method("POST")
        .uri("/api/polka/webhooks")
        .header(header::AUTHORIZATION, format!("ApiKey {}", WEBHOOK_KEY))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(event.to_string()))
        .unwrap();
    let upgraded = app.send(req).await;

    assert_eq!(upgraded.status, StatusCode::NO_CONTENT);
    assert!(app.state.store.get_account(1).unwrap().is_upgraded);
}

#[tokio::test]
async fn test_static_hits_are_counted() {
    let app = TestApp::new();

    for _ in 0..2 {
        let page = app.request("GET", "/app/index.html", None, None).await;
        assert_eq!(page.status, StatusCode::OK);
    }

    let metrics = app.request("GET", "/api/metrics", None, None).await;
    assert_eq!(metrics.body, "Hits: 2");

    let admin = app.request("GET", "/admin/metrics", None, None).await;
    assert!(admin.body.as_str().unwrap().contains("visited 2 times"));

    app.request("POST", "/api/reset", None, None).await;
    let metrics = app.request("GET", "/api/metrics", None, None).await;
    assert_eq!(metrics.body, "Hits: 0");
}
