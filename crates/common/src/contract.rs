//! JSON shapes shared by the HTTP API and its clients.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a vote request. `question_id` must repeat the path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteBody {
    pub question_id: i64,
}

/// A recorded vote membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteMembershipView {
    pub id: String,
    pub user_id: String,
    pub answer_id: i32,
    pub created_at: DateTime<Utc>,
}

/// One answer of a question with its current tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub id: i32,
    pub question_id: i32,
    pub text: String,
    pub votes: i32,
    /// The membership created by the request that produced this view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote: Option<VoteMembershipView>,
}

/// A question with all of its answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: i32,
    pub post_id: String,
    pub text: String,
    pub answers: Vec<AnswerView>,
    /// Answer the caller voted for, if any.
    #[serde(default)]
    pub my_vote: Option<i32>,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
