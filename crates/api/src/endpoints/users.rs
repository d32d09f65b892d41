//! User endpoints.

use artilink_common::AppResult;
use artilink_core::clamp_limit;
use artilink_db::entities::{following, post, user};
use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::PageQuery;
use crate::{
    extractors::{ApiQuery, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Public user view.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub followers_count: i32,
    pub following_count: i32,
    pub posts_count: i32,
    pub is_onboarded: bool,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            followers_count: user.followers_count,
            following_count: user.following_count,
            posts_count: user.posts_count,
            is_onboarded: user.is_onboarded,
            created_at: user.created_at.with_timezone(&Utc),
        }
    }
}

/// The caller's own view, with onboarding progress.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub onboarding_step: i16,
}

/// Post summary used in user timelines.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<post::Model> for PostSummary {
    fn from(post: post::Model) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            text: post.text,
            created_at: post.created_at.with_timezone(&Utc),
        }
    }
}

/// A following edge.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowingResponse {
    pub id: String,
    pub follower_id: String,
    pub followee_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<following::Model> for FollowingResponse {
    fn from(following: following::Model) -> Self {
        Self {
            id: following.id,
            follower_id: following.follower_id,
            followee_id: following.followee_id,
            created_at: following.created_at.with_timezone(&Utc),
        }
    }
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get(&id).await?;
    Ok(ApiResponse::ok(user.into()))
}

async fn me(AuthUser(user): AuthUser) -> ApiResponse<MeResponse> {
    let onboarding_step = user.onboarding_step;
    ApiResponse::ok(MeResponse {
        user: user.into(),
        onboarding_step,
    })
}

async fn list_posts(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<PostSummary>>> {
    let user = state.user_service.get(&id).await?;
    let posts = state
        .post_service
        .list_by_user(&user.id, clamp_limit(page.limit), page.until_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

async fn list_following(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<FollowingResponse>>> {
    let edges = state
        .following_service
        .following(&id, page.limit, page.until_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(edges.into_iter().map(Into::into).collect()))
}

async fn list_followers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<FollowingResponse>>> {
    let edges = state
        .following_service
        .followers(&id, page.limit, page.until_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(edges.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/i", get(me))
        .route("/users/{id}", get(show))
        .route("/users/{id}/posts", get(list_posts))
        .route("/users/{id}/following", get(list_following))
        .route("/users/{id}/followers", get(list_followers))
}
