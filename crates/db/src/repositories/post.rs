//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, User, answer, post, question, user};
use artilink_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

/// A question and its answers, in insertion order.
pub type QuestionWithAnswers = (question::Model, Vec<answer::Model>);

/// Question to attach to a new post.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub text: String,
    pub answers: Vec<String>,
}

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post not found: {id}")))
    }

    /// Get posts by a user, newest first (paginated).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<post::Model>> {
        let mut query = Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(post::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a post, its optional question with answers, and bump the author's
    /// post count, all in one transaction.
    pub async fn create(
        &self,
        model: post::ActiveModel,
        new_question: Option<NewQuestion>,
    ) -> AppResult<(post::Model, Option<QuestionWithAnswers>)> {
        let created = self
            .db
            .transaction::<_, _, DbErr>(|txn| {
                Box::pin(async move {
                    let post = model.insert(txn).await?;

                    let question = match new_question {
                        Some(new_question) => {
                            let question = question::ActiveModel {
                                post_id: Set(post.id.clone()),
                                text: Set(new_question.text),
                                created_at: Set(post.created_at),
                                ..Default::default()
                            }
                            .insert(txn)
                            .await?;

                            let mut answers = Vec::with_capacity(new_question.answers.len());
                            for text in new_question.answers {
                                let answer = answer::ActiveModel {
                                    question_id: Set(question.id),
                                    text: Set(text),
                                    vote_count: Set(0),
                                    ..Default::default()
                                }
                                .insert(txn)
                                .await?;
                                answers.push(answer);
                            }
                            Some((question, answers))
                        }
                        None => None,
                    };

                    User::update_many()
                        .col_expr(
                            user::Column::PostsCount,
                            Expr::col(user::Column::PostsCount).add(1),
                        )
                        .filter(user::Column::Id.eq(post.user_id.clone()))
                        .exec(txn)
                        .await?;

                    Ok((post, question))
                })
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }
}
