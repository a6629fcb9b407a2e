use super::{blocking, credential};
use crate::{
    AppState,
    dto::{AccountResponse, LoginRequest, LoginResponse, SignupRequest, UpdateAccountRequest},
    errors::ApiError,
};
use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use validator::Validate;

/// POST /api/users
/// Body: { "email": "...", "password": "..." }
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let store = state.store.clone();
    let account =
        blocking(move || Ok(store.create_account(&payload.email, &payload.password)?)).await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// PUT /api/users
/// Headers: Authorization: Bearer <access token>
/// Body: { "email": "...", "password": "..." }
pub async fn update_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    // The id comes from a verified access token, never from the body.
    let account_id = state.sessions.authenticate(credential(&headers)?)?;

    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let store = state.store.clone();
    let account = blocking(move || {
        Ok(store.update_account(account_id, &payload.email, &payload.password)?)
    })
    .await?;

    Ok(Json(account.into()))
}

/// POST /api/login
/// Body: { "email": "...", "password": "..." }
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // A malformed email cannot belong to anyone; answer like any failed login.
    if payload.validate().is_err() {
        return Err(ApiError::InvalidCredentials);
    }

    let sessions = state.sessions.clone();
    let pair = blocking(move || Ok(sessions.login(&payload.email, &payload.password)?)).await?;

    Ok(Json(pair.into()))
}
