//! Artwork endpoints.

use artilink_common::AppResult;
use artilink_core::{CreateArtworkInput, ListArtworksInput};
use artilink_db::entities::artwork;
use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    extractors::{ApiJson, ApiQuery, AuthUser},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Artwork view.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub medium: String,
    pub image_url: String,
    pub tags: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<artwork::Model> for ArtworkResponse {
    fn from(artwork: artwork::Model) -> Self {
        Self {
            id: artwork.id,
            user_id: artwork.user_id,
            title: artwork.title,
            description: artwork.description,
            medium: artwork.medium,
            image_url: artwork.image_url,
            tags: artwork.tags,
            created_at: artwork.created_at.with_timezone(&Utc),
        }
    }
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateArtworkInput>,
) -> AppResult<ApiResponse<ArtworkResponse>> {
    let artwork = state.artwork_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(artwork.into()))
}

async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListArtworksInput>,
) -> AppResult<ApiResponse<Vec<ArtworkResponse>>> {
    let artworks = state.artwork_service.list(query).await?;
    Ok(ApiResponse::ok(artworks.into_iter().map(Into::into).collect()))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ArtworkResponse>> {
    let artwork = state.artwork_service.get(&id).await?;
    Ok(ApiResponse::ok(artwork.into()))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.artwork_service.delete(&user.id, &id).await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).delete(delete))
}
