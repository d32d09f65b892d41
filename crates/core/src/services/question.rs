//! Question service: question views and the single-choice vote.

use artilink_common::{
    AppError, AppResult, IdGenerator,
    contract::{AnswerView, QuestionView, VoteMembershipView},
};
use artilink_db::{
    entities::{answer, answer_vote, question},
    repositories::{ALREADY_ANSWERED, QuestionRepository},
};
use chrono::Utc;
use sea_orm::Set;

/// Message for an answer id that is unknown or belongs to another question.
pub const ANSWER_NOT_IN_QUESTION: &str = "answer does not belong to this question";

/// Render an answer, optionally with the membership that was just recorded.
#[must_use]
pub fn answer_view(answer: answer::Model, vote: Option<answer_vote::Model>) -> AnswerView {
    AnswerView {
        id: answer.id,
        question_id: answer.question_id,
        text: answer.text,
        votes: answer.vote_count,
        vote: vote.map(|v| VoteMembershipView {
            id: v.id,
            user_id: v.user_id,
            answer_id: v.answer_id,
            created_at: v.created_at.with_timezone(&Utc),
        }),
    }
}

/// Render a question with its answers.
#[must_use]
pub fn question_view(
    question: question::Model,
    answers: Vec<answer::Model>,
    my_vote: Option<i32>,
) -> QuestionView {
    QuestionView {
        id: question.id,
        post_id: question.post_id,
        text: question.text,
        answers: answers.into_iter().map(|a| answer_view(a, None)).collect(),
        my_vote,
    }
}

/// Question service for business logic.
#[derive(Clone)]
pub struct QuestionService {
    question_repo: QuestionRepository,
    id_gen: IdGenerator,
}

impl QuestionService {
    /// Create a new question service.
    #[must_use]
    pub fn new(question_repo: QuestionRepository) -> Self {
        Self {
            question_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Load a question with its answers and, for a signed-in viewer, their vote.
    pub async fn get_view(&self, question_id: i32, viewer_id: Option<&str>) -> AppResult<QuestionView> {
        let question = self
            .question_repo
            .find_by_id(question_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("question not found: {question_id}")))?;

        self.view_of(question, viewer_id).await
    }

    /// View of the question attached to a post, if the post has one.
    pub async fn view_for_post(
        &self,
        post_id: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<Option<QuestionView>> {
        match self.question_repo.find_by_post_id(post_id).await? {
            Some(question) => Ok(Some(self.view_of(question, viewer_id).await?)),
            None => Ok(None),
        }
    }

    /// Build the view for an already loaded question.
    pub async fn view_of(
        &self,
        question: question::Model,
        viewer_id: Option<&str>,
    ) -> AppResult<QuestionView> {
        let answers = self.question_repo.find_answers(question.id).await?;
        let my_vote = match viewer_id {
            Some(user_id) => self
                .question_repo
                .find_vote_by_user(question.id, user_id)
                .await?
                .map(|v| v.answer_id),
            None => None,
        };

        Ok(question_view(question, answers, my_vote))
    }

    /// Record `user_id`'s vote for `answer_id` on `question_id`.
    ///
    /// Fails with `NotFound` when the answer is not part of the question and
    /// with `Conflict` when the user already voted on any of its answers. The
    /// membership insert and the count increment commit together; a concurrent
    /// duplicate loses at the unique index and gets the same `Conflict`.
    #[tracing::instrument(skip(self))]
    pub async fn vote(
        &self,
        user_id: &str,
        question_id: i32,
        answer_id: i32,
    ) -> AppResult<AnswerView> {
        if self
            .question_repo
            .find_answer_in_question(question_id, answer_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(ANSWER_NOT_IN_QUESTION.to_string()));
        }

        if self
            .question_repo
            .find_vote_by_user(question_id, user_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(ALREADY_ANSWERED.to_string()));
        }

        let membership = answer_vote::ActiveModel {
            id: Set(self.id_gen.generate()),
            answer_id: Set(answer_id),
            question_id: Set(question_id),
            user_id: Set(user_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let (answer, vote) = self.question_repo.record_vote(membership).await?;

        tracing::info!(votes = answer.vote_count, "Vote recorded");
        Ok(answer_view(answer, Some(vote)))
    }
}
