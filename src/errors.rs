use crate::auth::AuthError;
use crate::store::StoreError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApiError {
    InvalidCredentials,
    UserAlreadyExists,
    Unauthorized,
    Forbidden,
    NotFound,
    ValidationError(String),
    InternalError(String),
}

/// Convert our custom errors to HTTP responses
///
/// Axum calls this to turn a failed handler into the JSON body
/// `{"error": "..."}` with a status chosen by error kind.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            ApiError::UserAlreadyExists => (StatusCode::CONFLICT, "User already exists"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            ApiError::ValidationError(msg) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                      "error": msg
                    })),
                )
                    .into_response();
            }
            ApiError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (
            status,
            Json(serde_json::json!({
              "error": message
            })),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::EmailInUse => ApiError::UserAlreadyExists,
            StoreError::TooLong { .. } => ApiError::ValidationError(e.to_string()),
            StoreError::PostNotFound(_) | StoreError::AccountNotFound(_) => ApiError::NotFound,
            StoreError::NotAuthor { .. } => ApiError::Forbidden,
            StoreError::Unavailable
            | StoreError::Hash(_)
            | StoreError::Io(_)
            | StoreError::Snapshot(_) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Malformed
            | AuthError::SignatureInvalid
            | AuthError::Expired
            | AuthError::WrongTokenType { .. }
            | AuthError::Revoked
            | AuthError::InvalidSubject(_) => {
                warn!("Rejected token: {}", e);
                ApiError::Unauthorized
            }
            AuthError::NotAuthor { .. } => ApiError::Forbidden,
            AuthError::Signing(_) => ApiError::InternalError(e.to_string()),
            AuthError::Store(e) => e.into(),
        }
    }
}
