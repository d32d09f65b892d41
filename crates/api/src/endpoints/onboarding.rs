//! Onboarding wizard endpoint.

use artilink_common::AppResult;
use artilink_core::{OnboardingProgress, OnboardingStep};
use axum::{Router, extract::State, routing::post};

use crate::{
    extractors::{ApiJson, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Submit one wizard step: `{ "step": "profile" | "disciplines" | "portfolio", ... }`.
async fn submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(step): ApiJson<OnboardingStep>,
) -> AppResult<ApiResponse<OnboardingProgress>> {
    let progress = state.onboarding_service.submit(&user.id, step).await?;
    Ok(ApiResponse::ok(progress))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/i/onboarding", post(submit))
}
