//! Following service.

use artilink_common::{AppError, AppResult, IdGenerator};
use artilink_db::{
    entities::following,
    repositories::{FollowingRepository, UserRepository},
};
use chrono::Utc;
use sea_orm::Set;

use crate::clamp_limit;

/// Following service for business logic.
#[derive(Clone)]
pub struct FollowingService {
    following_repo: FollowingRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FollowingService {
    /// Create a new following service.
    #[must_use]
    pub fn new(following_repo: FollowingRepository, user_repo: UserRepository) -> Self {
        Self {
            following_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow a user.
    #[tracing::instrument(skip(self))]
    pub async fn follow(&self, follower_id: &str, followee_id: &str) -> AppResult<following::Model> {
        if follower_id == followee_id {
            return Err(AppError::BadRequest("cannot follow yourself".to_string()));
        }

        // Target must exist
        self.user_repo.get_by_id(followee_id).await?;

        if self
            .following_repo
            .is_following(follower_id, followee_id)
            .await?
        {
            return Err(AppError::Conflict("already following".to_string()));
        }

        let model = following::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower_id.to_string()),
            followee_id: Set(followee_id.to_string()),
            created_at: Set(Utc::now().into()),
        };
        let following = self.following_repo.create(model).await?;

        self.user_repo.increment_following_count(follower_id).await?;
        self.user_repo.increment_followers_count(followee_id).await?;

        Ok(following)
    }

    /// Unfollow a user.
    #[tracing::instrument(skip(self))]
    pub async fn unfollow(&self, follower_id: &str, followee_id: &str) -> AppResult<()> {
        if !self
            .following_repo
            .delete_by_pair(follower_id, followee_id)
            .await?
        {
            return Err(AppError::NotFound("not following this user".to_string()));
        }

        self.user_repo.decrement_following_count(follower_id).await?;
        self.user_repo.decrement_followers_count(followee_id).await?;

        Ok(())
    }

    /// Users `user_id` follows.
    pub async fn following(
        &self,
        user_id: &str,
        limit: Option<u64>,
        until_id: Option<&str>,
    ) -> AppResult<Vec<following::Model>> {
        self.following_repo
            .find_following(user_id, clamp_limit(limit), until_id)
            .await
    }

    /// Users following `user_id`.
    pub async fn followers(
        &self,
        user_id: &str,
        limit: Option<u64>,
        until_id: Option<&str>,
    ) -> AppResult<Vec<following::Model>> {
        self.following_repo
            .find_followers(user_id, clamp_limit(limit), until_id)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use artilink_db::entities::user;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: id.to_string(),
            username_lower: id.to_string(),
            token: None,
            name: None,
            followers_count: 0,
            following_count: 0,
            posts_count: 0,
            onboarding_step: 3,
            is_onboarded: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_following(follower_id: &str, followee_id: &str) -> following::Model {
        following::Model {
            id: "follow1".to_string(),
            follower_id: follower_id.to_string(),
            followee_id: followee_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn service(db: MockDatabase) -> FollowingService {
        let db = Arc::new(db.into_connection());
        FollowingService::new(FollowingRepository::new(db.clone()), UserRepository::new(db))
    }

    fn updated() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[tokio::test]
    async fn test_cannot_follow_self() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = svc.follow("user1", "user1").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_follow_unknown_user() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let result = svc.follow("user1", "ghost").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_follow_twice_conflicts() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user2")]])
                .append_query_results([[create_test_following("user1", "user2")]]),
        );

        let result = svc.follow("user1", "user2").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_follow_updates_counts() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user2")]])
                .append_query_results([Vec::<following::Model>::new()])
                .append_query_results([[create_test_following("user1", "user2")]])
                .append_exec_results([updated(), updated()]),
        );

        let following = svc.follow("user1", "user2").await.unwrap();

        assert_eq!(following.followee_id, "user2");
    }

    #[tokio::test]
    async fn test_unfollow_when_not_following() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<following::Model>::new()]),
        );

        let result = svc.unfollow("user1", "user2").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
