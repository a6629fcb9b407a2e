mod admin;
mod health;
mod post;
mod token;
mod user;
mod webhook;

use crate::{AppState, auth::bearer_token, errors::ApiError, metrics::count_hits};
use axum::{
    Router,
    http::HeaderMap,
    middleware,
    routing::{get, post},
};
use std::path::Path;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Builds the full HTTP surface around `state`.
pub fn router(state: AppState, static_dir: &Path, max_concurrency: usize) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app: Router<AppState> = Router::new()
        .nest_service("/app", ServeDir::new(static_dir))
        .layer(middleware::from_fn_with_state(state.hits.clone(), count_hits));

    Router::new()
        .merge(app)
        .route("/api/healthz", get(health::health_check))
        .route("/api/metrics", get(admin::hits))
        .route("/api/reset", post(admin::reset))
        .route("/admin/metrics", get(admin::metrics_page))
        .route("/api/users", post(user::signup).put(user::update_account))
        .route("/api/login", post(user::login))
        .route("/api/refresh", post(token::refresh))
        .route("/api/revoke", post(token::revoke))
        .route("/oauth/token", post(token::password_grant))
        .route("/api/chirps", post(post::create_post).get(post::list_posts))
        .route(
            "/api/chirps/{id}",
            get(post::get_post)
                .put(post::update_post)
                .delete(post::delete_post),
        )
        .route("/api/polka/webhooks", post(webhook::polka))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(max_concurrency))
}

/// The bearer credential or a 401.
fn credential(headers: &HeaderMap) -> Result<&str, ApiError> {
    bearer_token(headers).ok_or(ApiError::Unauthorized)
}

/// Runs bcrypt-heavy work off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::InternalError(format!("Blocking task failed: {}", e)))?
}
