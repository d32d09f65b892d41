//! Network seam for the vote widget.

use std::time::Duration;

use artilink_common::contract::{AnswerView, ErrorBody, QuestionView, VoteBody};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Submits votes on behalf of the widget.
#[async_trait]
pub trait VoteTransport: Send + Sync {
    /// Submit a vote for `answer_id` on `question_id` and return the updated answer.
    async fn submit_vote(&self, question_id: i32, answer_id: i32)
    -> Result<AnswerView, ClientError>;
}

/// `reqwest`-backed transport authenticated with a bearer token.
#[derive(Clone)]
pub struct HttpVoteTransport {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpVoteTransport {
    /// Create a transport for the instance at `base_url`.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        // A request that outlives the timeout fails and the widget can be retried.
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token: token.into(),
        })
    }

    fn vote_url(&self, question_id: i32, answer_id: i32) -> String {
        format!(
            "{}/api/questions/{question_id}/answers/{answer_id}/vote",
            self.base_url
        )
    }

    /// Load a question with the caller's prior vote, to seed a widget.
    pub async fn fetch_question(&self, question_id: i32) -> Result<QuestionView, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/questions/{question_id}", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;

        decode(response).await
    }
}

#[async_trait]
impl VoteTransport for HttpVoteTransport {
    async fn submit_vote(
        &self,
        question_id: i32,
        answer_id: i32,
    ) -> Result<AnswerView, ClientError> {
        let response = self
            .client
            .post(self.vote_url(question_id, answer_id))
            .bearer_auth(&self.token)
            .json(&VoteBody {
                question_id: i64::from(question_id),
            })
            .send()
            .await?;

        decode(response).await
    }
}

/// Decode a success body, or turn an error status into [`ClientError::Api`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or_else(|_| ErrorBody {
        error: status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string(),
        code: None,
        details: None,
    });

    Err(ClientError::Api {
        status: status.as_u16(),
        body,
    })
}
