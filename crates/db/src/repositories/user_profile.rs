//! User profile repository.

use std::sync::Arc;

use crate::entities::{UserProfile, user, user_profile};
use artilink_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, TransactionTrait};

/// User profile repository for database operations.
#[derive(Clone)]
pub struct UserProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl UserProfileRepository {
    /// Create a new user profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user profile by user ID.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<user_profile::Model>> {
        UserProfile::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user profile by user ID, returning an error if not found.
    pub async fn get_by_user_id(&self, user_id: &str) -> AppResult<user_profile::Model> {
        self.find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("profile not found: {user_id}")))
    }

    /// Create a new user profile.
    pub async fn create(&self, model: user_profile::ActiveModel) -> AppResult<user_profile::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a user profile.
    pub async fn update(&self, model: user_profile::ActiveModel) -> AppResult<user_profile::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a profile and its user row together. Neither write is kept if
    /// the other fails.
    pub async fn update_with_user(
        &self,
        profile: user_profile::ActiveModel,
        user: user::ActiveModel,
    ) -> AppResult<(user_profile::Model, user::Model)> {
        self.db
            .transaction::<_, _, DbErr>(|txn| {
                Box::pin(async move {
                    let profile = profile.update(txn).await?;
                    let user = user.update(txn).await?;
                    Ok((profile, user))
                })
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
