use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Html};

/// GET /admin/metrics
pub async fn metrics_page(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n\n<body>\n\t<h1>Welcome, Chirpy Admin</h1>\n\t<p>Chirpy has been visited {} times!</p>\n</body>\n\n</html>",
        state.hits.hits()
    ))
}

/// GET /api/metrics
pub async fn hits(State(state): State<AppState>) -> String {
    format!("Hits: {}", state.hits.hits())
}

/// POST /api/reset
pub async fn reset(State(state): State<AppState>) -> StatusCode {
    state.hits.reset();
    StatusCode::OK
}
