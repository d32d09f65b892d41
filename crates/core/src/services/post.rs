//! Post service.

use artilink_common::{AppResult, IdGenerator, contract::QuestionView};
use artilink_db::{
    entities::post,
    repositories::{NewQuestion, PostRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::validate_not_blank;
use crate::services::question::{QuestionService, question_view};

/// Input for attaching a question to a new post.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionInput {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub text: String,

    #[validate(length(min = 2, max = 10), custom(function = "validate_answers"))]
    pub answers: Vec<String>,
}

/// Input for creating a post.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 2000), custom(function = "validate_not_blank"))]
    pub text: String,

    #[validate(nested)]
    pub question: Option<CreateQuestionInput>,
}

fn validate_answers(answers: &[String]) -> Result<(), ValidationError> {
    for answer in answers {
        if answer.trim().is_empty() {
            return Err(ValidationError::new("answer_blank"));
        }
        if answer.chars().count() > 100 {
            return Err(ValidationError::new("answer_too_long"));
        }
    }
    Ok(())
}

/// A post together with its question, if it has one.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: post::Model,
    pub question: Option<QuestionView>,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    question_service: QuestionService,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(post_repo: PostRepository, question_service: QuestionService) -> Self {
        Self {
            post_repo,
            question_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a post, with its question and answers when given.
    #[tracing::instrument(skip(self, input))]
    pub async fn create(&self, user_id: &str, input: CreatePostInput) -> AppResult<PostDetail> {
        input.validate()?;

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            text: Set(input.text),
            created_at: Set(Utc::now().into()),
        };
        let new_question = input.question.map(|q| NewQuestion {
            text: q.text.trim().to_string(),
            answers: q.answers.iter().map(|a| a.trim().to_string()).collect(),
        });

        let (post, question) = self.post_repo.create(model, new_question).await?;

        tracing::info!(post_id = %post.id, has_question = question.is_some(), "Post created");
        Ok(PostDetail {
            post,
            question: question.map(|(q, answers)| question_view(q, answers, None)),
        })
    }

    /// Get a post with its question as seen by `viewer_id`.
    pub async fn get(&self, id: &str, viewer_id: Option<&str>) -> AppResult<PostDetail> {
        let post = self.post_repo.get_by_id(id).await?;
        let question = self.question_service.view_for_post(&post.id, viewer_id).await?;
        Ok(PostDetail { post, question })
    }

    /// Posts by a user, newest first.
    pub async fn list_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<post::Model>> {
        self.post_repo.find_by_user(user_id, limit, until_id).await
    }
}
