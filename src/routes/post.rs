use super::{blocking, credential};
use crate::{
    AppState,
    dto::{ListPostsQuery, PostBodyRequest, SortOrder},
    errors::ApiError,
    models::{Post, PostId},
    profanity::strip_profane,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};

/// POST /api/chirps
/// Headers: Authorization: Bearer <access token>
/// Body: { "body": "..." }
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PostBodyRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let post = state
        .gate
        .create_post(credential(&headers)?, &strip_profane(&payload.body))?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/chirps?author_id=1&sort=desc
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<ListPostsQuery>,
) -> Result<Json<Vec<Post>>, ApiError> {
    // Listing reloads the snapshot file.
    let store = state.store.clone();
    let author_id = params.author_id;
    let mut posts = blocking(move || {
        Ok(match author_id {
            Some(author_id) => store.list_posts_by_author(author_id)?,
            None => store.list_posts()?,
        })
    })
    .await?;

    if params.sort == SortOrder::Desc {
        posts.reverse();
    }

    Ok(Json(posts))
}

/// GET /api/chirps/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.store.get_post(id)?))
}

/// PUT /api/chirps/{id}
/// Headers: Authorization: Bearer <access token>
pub async fn update_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<PostId>,
    Json(payload): Json<PostBodyRequest>,
) -> Result<Json<Post>, ApiError> {
    let post = state
        .gate
        .edit_post(credential(&headers)?, id, &strip_profane(&payload.body))?;

    Ok(Json(post))
}

/// DELETE /api/chirps/{id}
/// Headers: Authorization: Bearer <access token>
pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<PostId>,
) -> Result<StatusCode, ApiError> {
    state.gate.delete_post(credential(&headers)?, id)?;

    Ok(StatusCode::NO_CONTENT)
}
