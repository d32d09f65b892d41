//! Authentication endpoints.

use artilink_common::AppResult;
use artilink_core::CreateUserInput;
use artilink_db::entities::user;
use axum::{Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{ApiJson, AuthUser},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Session response for signup and signin.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

impl From<user::Model> for SessionResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            token: user.token.unwrap_or_default(),
        }
    }
}

/// Signin request.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Create a new user account.
async fn signup(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateUserInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state.user_service.create(input).await?;
    Ok(ApiResponse::created(user.into()))
}

/// Sign in to an existing account.
async fn signin(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SigninRequest>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state
        .user_service
        .authenticate(&req.username, &req.password)
        .await?;
    Ok(ApiResponse::ok(user.into()))
}

/// End the current session by rotating the token.
async fn signout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.user_service.regenerate_token(&user.id).await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/signout", post(signout))
}
