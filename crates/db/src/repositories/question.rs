//! Question repository: questions, answers and vote memberships.

use std::sync::Arc;

use crate::entities::{Answer, AnswerVote, Question, answer, answer_vote, question};
use artilink_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait, sea_query::Expr,
};

/// Message for a second vote by the same user on the same question.
pub const ALREADY_ANSWERED: &str = "already answered";

/// Question repository for database operations.
#[derive(Clone)]
pub struct QuestionRepository {
    db: Arc<DatabaseConnection>,
}

impl QuestionRepository {
    /// Create a new question repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a question by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<question::Model>> {
        Question::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the question attached to a post.
    pub async fn find_by_post_id(&self, post_id: &str) -> AppResult<Option<question::Model>> {
        Question::find()
            .filter(question::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All answers of a question, in creation order.
    pub async fn find_answers(&self, question_id: i32) -> AppResult<Vec<answer::Model>> {
        Answer::find()
            .filter(answer::Column::QuestionId.eq(question_id))
            .order_by_asc(answer::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an answer by ID, scoped to the question it must belong to.
    pub async fn find_answer_in_question(
        &self,
        question_id: i32,
        answer_id: i32,
    ) -> AppResult<Option<answer::Model>> {
        Answer::find_by_id(answer_id)
            .filter(answer::Column::QuestionId.eq(question_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the caller's vote on any answer of a question.
    pub async fn find_vote_by_user(
        &self,
        question_id: i32,
        user_id: &str,
    ) -> AppResult<Option<answer_vote::Model>> {
        AnswerVote::find()
            .filter(answer_vote::Column::QuestionId.eq(question_id))
            .filter(answer_vote::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a vote membership and increment its answer's count in one transaction.
    ///
    /// The `(question_id, user_id)` unique index rejects a second membership for
    /// the same user and question; that rejection is reported as
    /// [`AppError::Conflict`] with [`ALREADY_ANSWERED`], exactly like a pre-check hit.
    pub async fn record_vote(
        &self,
        vote: answer_vote::ActiveModel,
    ) -> AppResult<(answer::Model, answer_vote::Model)> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let vote = match vote.insert(&txn).await {
            Ok(vote) => vote,
            Err(e) => {
                let unique_violation = crate::is_unique_violation(&e);
                let rollback = txn.rollback().await;
                return Err(rejected_vote(e, unique_violation, rollback));
            }
        };

        let updated = Answer::update_many()
            .col_expr(
                answer::Column::VoteCount,
                Expr::col(answer::Column::VoteCount).add(1),
            )
            .filter(answer::Column::Id.eq(vote.answer_id))
            .filter(answer::Column::QuestionId.eq(vote.question_id))
            .exec(&txn)
            .await
            .map_err(db_error)?;

        if updated.rows_affected != 1 {
            txn.rollback().await.map_err(db_error)?;
            return Err(AppError::Internal(format!(
                "vote increment touched {} rows for answer {}",
                updated.rows_affected, vote.answer_id
            )));
        }

        let answer = Answer::find_by_id(vote.answer_id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::Internal(format!("answer {} vanished", vote.answer_id)))?;

        txn.commit().await.map_err(db_error)?;

        Ok((answer, vote))
    }
}

fn db_error(e: DbErr) -> AppError {
    AppError::Database(e.to_string())
}

/// Map a failed membership insert. A unique violation stays a conflict even
/// when the rollback that follows it fails.
fn rejected_vote(err: DbErr, unique_violation: bool, rollback: Result<(), DbErr>) -> AppError {
    if unique_violation {
        if let Err(rollback_err) = rollback {
            tracing::warn!(error = %rollback_err, "Rollback after rejected vote failed");
        }
        tracing::debug!(error = %err, "Vote rejected by unique index");
        return AppError::Conflict(ALREADY_ANSWERED.to_string());
    }
    match rollback {
        Ok(()) => db_error(err),
        Err(rollback_err) => db_error(rollback_err),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn create_test_answer(id: i32, question_id: i32, text: &str, votes: i32) -> answer::Model {
        answer::Model {
            id,
            question_id,
            text: text.to_string(),
            vote_count: votes,
        }
    }

    fn create_test_vote(id: &str, answer_id: i32, question_id: i32) -> answer_vote::Model {
        answer_vote::Model {
            id: id.to_string(),
            answer_id,
            question_id,
            user_id: "user1".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_answer_in_question_mismatch() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<answer::Model>::new()])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        let result = repo.find_answer_in_question(9, 7).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_answers_in_order() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_answer(7, 2, "Oil", 3),
                    create_test_answer(8, 2, "Ink", 1),
                ]])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        let answers = repo.find_answers(2).await.unwrap();

        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].text, "Oil");
    }

    #[tokio::test]
    async fn test_find_vote_by_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_vote("v1", 8, 2)]])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        let vote = repo.find_vote_by_user(2, "user1").await.unwrap();

        assert_eq!(vote.unwrap().answer_id, 8);
    }

    #[tokio::test]
    async fn test_record_vote_increments_and_returns_membership() {
        let vote = create_test_vote("v1", 7, 2);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[vote.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[create_test_answer(7, 2, "Oil", 4)]])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        let active = answer_vote::ActiveModel {
            id: Set("v1".to_string()),
            answer_id: Set(7),
            question_id: Set(2),
            user_id: Set("user1".to_string()),
            created_at: Set(vote.created_at),
        };

        let (answer, recorded) = repo.record_vote(active).await.unwrap();

        assert_eq!(answer.vote_count, 4);
        assert_eq!(recorded.id, "v1");
        assert_eq!(recorded.user_id, "user1");
    }

    #[tokio::test]
    async fn test_record_vote_rolls_back_when_no_answer_row_updated() {
        let vote = create_test_vote("v1", 7, 2);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[vote.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        let active = answer_vote::ActiveModel {
            id: Set("v1".to_string()),
            answer_id: Set(7),
            question_id: Set(2),
            user_id: Set("user1".to_string()),
            created_at: Set(vote.created_at),
        };

        let result = repo.record_vote(active).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_unique_violation_stays_conflict_when_rollback_fails() {
        let err = rejected_vote(
            DbErr::Custom("duplicate key value".to_string()),
            true,
            Err(DbErr::Custom("connection closed".to_string())),
        );

        match err {
            AppError::Conflict(msg) => assert_eq!(msg, ALREADY_ANSWERED),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_other_insert_failure_is_database_error() {
        let err = rejected_vote(DbErr::Custom("disk full".to_string()), false, Ok(()));

        match err {
            AppError::Database(msg) => assert!(msg.contains("disk full")),
            other => panic!("expected database error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_record_vote_insert_failure_rolls_back() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom("disk full".to_string())])
                .into_connection(),
        );

        let repo = QuestionRepository::new(db);
        let active = answer_vote::ActiveModel {
            id: Set("v1".to_string()),
            answer_id: Set(7),
            question_id: Set(2),
            user_id: Set("user1".to_string()),
            created_at: Set(Utc::now().into()),
        };

        let result = repo.record_vote(active).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
