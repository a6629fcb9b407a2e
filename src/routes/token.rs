use super::{blocking, credential};
use crate::{
    AppState,
    dto::{RefreshResponse, TokenForm, TokenResponse},
    errors::ApiError,
};
use axum::{
    Form, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::info;
use validator::Validate;

/// POST /api/refresh
/// Headers: Authorization: Bearer <refresh token>
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, ApiError> {
    let token = state.sessions.refresh_access_token(credential(&headers)?)?;

    Ok(Json(RefreshResponse { token }))
}

/// POST /api/revoke
/// Headers: Authorization: Bearer <refresh token>
pub async fn revoke(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.sessions.revoke(credential(&headers)?)?;
    info!("Refresh token revoked");

    Ok(StatusCode::OK)
}

/// POST /oauth/token
/// Body (form): username=<email>&password=<password>
pub async fn password_grant(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    form.validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    if let Some(grant) = form.grant_type.as_deref().filter(|g| *g != "password") {
        return Err(ApiError::ValidationError(format!(
            "unsupported grant_type {}",
            grant
        )));
    }

    let sessions = state.sessions.clone();
    let pair = blocking(move || Ok(sessions.login(&form.username, &form.password)?)).await?;

    Ok(Json(pair.into()))
}
