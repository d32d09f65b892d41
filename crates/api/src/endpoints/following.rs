//! Following endpoints.

use artilink_common::AppResult;
use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::post,
};

use super::users::FollowingResponse;
use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Follow a user.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<FollowingResponse>> {
    let following = state.following_service.follow(&user.id, &user_id).await?;
    Ok(ApiResponse::created(following.into()))
}

/// Unfollow a user.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.following_service.unfollow(&user.id, &user_id).await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{user_id}", post(follow).delete(unfollow))
}
