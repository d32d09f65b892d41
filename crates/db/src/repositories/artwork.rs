//! Artwork repository.

use std::sync::Arc;

use crate::entities::{Artwork, artwork};
use artilink_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, sea_query::Expr,
};

/// Filters for the artwork listing. All set filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtworkFilter {
    pub user_id: Option<String>,
    /// Lowercased medium.
    pub medium: Option<String>,
    /// Lowercased tag the artwork must carry.
    pub tag: Option<String>,
}

impl ArtworkFilter {
    /// Build the filtered, newest-first select for this filter.
    #[must_use]
    pub fn query(&self, until_id: Option<&str>) -> Select<Artwork> {
        let mut query = Artwork::find().order_by_desc(artwork::Column::Id);

        if let Some(user_id) = &self.user_id {
            query = query.filter(artwork::Column::UserId.eq(user_id.as_str()));
        }
        if let Some(medium) = &self.medium {
            query = query.filter(artwork::Column::Medium.eq(medium.as_str()));
        }
        if let Some(tag) = &self.tag {
            let needle = serde_json::json!([tag]).to_string();
            query = query.filter(Expr::cust_with_values(
                "\"artwork\".\"tags\" @> $1::jsonb",
                [needle],
            ));
        }
        if let Some(id) = until_id {
            query = query.filter(artwork::Column::Id.lt(id));
        }

        query
    }
}

/// Artwork repository for database operations.
#[derive(Clone)]
pub struct ArtworkRepository {
    db: Arc<DatabaseConnection>,
}

impl ArtworkRepository {
    /// Create a new artwork repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an artwork by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<artwork::Model>> {
        Artwork::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an artwork by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<artwork::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("artwork not found: {id}")))
    }

    /// Create a new artwork.
    pub async fn create(&self, model: artwork::ActiveModel) -> AppResult<artwork::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an artwork by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Artwork::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List artworks matching `filter`, newest first.
    pub async fn list(
        &self,
        filter: &ArtworkFilter,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<artwork::Model>> {
        filter
            .query(until_id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
