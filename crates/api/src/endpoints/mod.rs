//! API endpoints.

mod artworks;
mod auth;
mod following;
mod onboarding;
mod posts;
mod questions;
mod users;

use axum::Router;
use serde::Deserialize;

use crate::middleware::AppState;

/// Keyset pagination parameters shared by list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub limit: Option<u64>,
    pub until_id: Option<String>,
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(onboarding::router())
        .merge(users::router())
        .nest("/posts", posts::router())
        .nest("/questions", questions::router())
        .nest("/artworks", artworks::router())
        .nest("/following", following::router())
}
