//! Post endpoints.

use artilink_common::{AppResult, contract::QuestionView};
use artilink_core::{CreatePostInput, PostDetail};
use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    extractors::{ApiJson, AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Post with its question.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub question: Option<QuestionView>,
}

impl From<PostDetail> for PostResponse {
    fn from(detail: PostDetail) -> Self {
        Self {
            id: detail.post.id,
            user_id: detail.post.user_id,
            text: detail.post.text,
            created_at: detail.post.created_at.with_timezone(&Utc),
            question: detail.question,
        }
    }
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let detail = state.post_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(detail.into()))
}

async fn show(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PostResponse>> {
    let detail = state
        .post_service
        .get(&id, user.as_ref().map(|u| u.id.as_str()))
        .await?;
    Ok(ApiResponse::ok(detail.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{id}", get(show))
}
