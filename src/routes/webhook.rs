use crate::{AppState, auth::bearer_token, dto::WebhookRequest, errors::ApiError};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{info, warn};

const UPGRADE_EVENT: &str = "user.upgraded";

/// POST /api/polka/webhooks
/// Headers: Authorization: ApiKey <key>
/// Body: { "event": "user.upgraded", "data": { "user_id": 1 } }
pub async fn polka(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<WebhookRequest>,
) -> Result<StatusCode, ApiError> {
    let authorized = match (&state.polka_key, bearer_token(&headers)) {
        (Some(expected), Some(given)) => expected == given,
        _ => false,
    };
    if !authorized {
        warn!("Webhook rejected: bad or missing api key");
        return Err(ApiError::Unauthorized);
    }

    if payload.event != UPGRADE_EVENT {
        return Ok(StatusCode::NO_CONTENT);
    }

    let account_id = payload
        .data
        .user_id
        .ok_or_else(|| ApiError::ValidationError("data.user_id is required".into()))?;
    state.store.upgrade_account(account_id)?;

    info!("Upgrade webhook applied to account {}", account_id);
    Ok(StatusCode::NO_CONTENT)
}
