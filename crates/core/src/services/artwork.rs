//! Artwork service.

use artilink_common::{AppError, AppResult, IdGenerator};
use artilink_db::{
    entities::artwork,
    repositories::{ArtworkFilter, ArtworkRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{clamp_limit, validate_not_blank};

/// Input for publishing an artwork.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtworkInput {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 32), custom(function = "validate_not_blank"))]
    pub medium: String,

    #[validate(url, length(max = 512))]
    pub image_url: String,

    #[serde(default)]
    #[validate(length(max = 10), custom(function = "validate_tags"))]
    pub tags: Vec<String>,
}

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags
        .iter()
        .all(|t| (1..=32).contains(&t.trim().chars().count()))
    {
        Ok(())
    } else {
        Err(ValidationError::new("tag_length"))
    }
}

/// Query for the artwork listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArtworksInput {
    pub limit: Option<u64>,
    pub until_id: Option<String>,
    pub user_id: Option<String>,
    pub medium: Option<String>,
    pub tag: Option<String>,
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Artwork service for business logic.
#[derive(Clone)]
pub struct ArtworkService {
    artwork_repo: ArtworkRepository,
    id_gen: IdGenerator,
}

impl ArtworkService {
    /// Create a new artwork service.
    #[must_use]
    pub fn new(artwork_repo: ArtworkRepository) -> Self {
        Self {
            artwork_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Publish an artwork. Medium and tags are stored lowercased, tags deduplicated.
    #[tracing::instrument(skip(self, input))]
    pub async fn create(&self, user_id: &str, input: CreateArtworkInput) -> AppResult<artwork::Model> {
        input.validate()?;

        let mut tags: Vec<String> = Vec::with_capacity(input.tags.len());
        for tag in input.tags.iter().map(|t| normalize(t)) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let model = artwork::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description.filter(|d| !d.trim().is_empty())),
            medium: Set(normalize(&input.medium)),
            image_url: Set(input.image_url),
            tags: Set(serde_json::json!(tags)),
            created_at: Set(Utc::now().into()),
        };

        let artwork = self.artwork_repo.create(model).await?;
        tracing::info!(artwork_id = %artwork.id, "Artwork published");
        Ok(artwork)
    }

    /// Get an artwork by ID.
    pub async fn get(&self, id: &str) -> AppResult<artwork::Model> {
        self.artwork_repo.get_by_id(id).await
    }

    /// Delete an artwork. Only its owner may do so.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, user_id: &str, id: &str) -> AppResult<()> {
        let artwork = self.artwork_repo.get_by_id(id).await?;
        if artwork.user_id != user_id {
            return Err(AppError::Forbidden(
                "you can only delete your own artworks".to_string(),
            ));
        }
        self.artwork_repo.delete(id).await
    }

    /// List artworks newest first, with all given filters applied together.
    pub async fn list(&self, input: ListArtworksInput) -> AppResult<Vec<artwork::Model>> {
        let filter = ArtworkFilter {
            user_id: input.user_id,
            medium: input.medium.as_deref().map(normalize),
            tag: input.tag.as_deref().map(normalize),
        };

        self.artwork_repo
            .list(&filter, clamp_limit(input.limit), input.until_id.as_deref())
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::sync::Arc;

    fn create_test_artwork(id: &str, user_id: &str) -> artwork::Model {
        artwork::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Dunes".to_string(),
            description: None,
            medium: "oil".to_string(),
            image_url: "https://cdn.example/dunes.png".to_string(),
            tags: json!(["landscape"]),
            created_at: Utc::now().into(),
        }
    }

    fn service(db: MockDatabase) -> ArtworkService {
        ArtworkService::new(ArtworkRepository::new(Arc::new(db.into_connection())))
    }

    #[test]
    fn test_input_validation() {
        let input: CreateArtworkInput = serde_json::from_value(json!({
            "title": "Dunes",
            "medium": "Oil",
            "imageUrl": "not a url"
        }))
        .unwrap();
        assert!(input.validate().is_err());

        let input: CreateArtworkInput = serde_json::from_value(json!({
            "title": "Dunes",
            "medium": "Oil",
            "imageUrl": "https://cdn.example/dunes.png",
            "tags": ["landscape", ""]
        }))
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_whitespace_title_and_medium_rejected() {
        let input: CreateArtworkInput = serde_json::from_value(json!({
            "title": "   ",
            "medium": " ",
            "imageUrl": "https://cdn.example/dunes.png"
        }))
        .unwrap();

        let err = input.validate().unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("medium"));
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_forbidden() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_artwork("art1", "owner")]]),
        );

        let result = svc.delete("someone_else", "art1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_artwork("art1", "owner")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }]),
        );

        assert!(svc.delete("owner", "art1").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_normalizes_medium() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_artwork("art1", "owner")]]),
        );

        let artwork = svc
            .create(
                "owner",
                serde_json::from_value(json!({
                    "title": "Dunes",
                    "medium": " Oil ",
                    "imageUrl": "https://cdn.example/dunes.png",
                    "tags": ["Landscape", "landscape"]
                }))
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(artwork.medium, "oil");
    }
}
