//! Question endpoints: view and vote.

use artilink_common::{
    AppError, AppResult,
    contract::{AnswerView, QuestionView, VoteBody},
};
use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

const QUESTION_ID: &str = "questionId";
const ANSWER_ID: &str = "answerId";

/// Parse a path segment as a positive `i32` identifier.
fn parse_positive_id(field: &str, raw: &str) -> AppResult<i32> {
    let parsed = if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        None
    } else {
        raw.parse::<i32>().ok().filter(|id| *id > 0)
    };

    parsed.ok_or_else(|| {
        AppError::invalid_field(
            field,
            "positive_integer",
            format!("{field} must be a positive integer"),
        )
    })
}

/// Parse the vote body and check it names the same question as the path.
fn parse_vote_body(bytes: &[u8], path_question_id: i32) -> AppResult<VoteBody> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| {
        AppError::invalid_field("body", "json", format!("request body is not valid JSON: {e}"))
    })?;

    let not_positive = || {
        AppError::invalid_field(
            QUESTION_ID,
            "positive_integer",
            "questionId must be a positive integer",
        )
    };

    let body: VoteBody = serde_json::from_value(value).map_err(|_| not_positive())?;
    if body.question_id <= 0 {
        return Err(not_positive());
    }
    if body.question_id != i64::from(path_question_id) {
        return Err(AppError::invalid_field(
            QUESTION_ID,
            "mismatch",
            "questionId does not match the question in the path",
        ));
    }

    Ok(body)
}

/// Vote for one answer of a question.
///
/// Checks run in a fixed order: session, path ids, body, answer membership,
/// then prior vote.
async fn vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((raw_question_id, raw_answer_id)): Path<(String, String)>,
    body: Bytes,
) -> AppResult<ApiResponse<AnswerView>> {
    let question_id = parse_positive_id(QUESTION_ID, &raw_question_id)?;
    let answer_id = parse_positive_id(ANSWER_ID, &raw_answer_id)?;
    parse_vote_body(&body, question_id)?;

    let answer = state
        .question_service
        .vote(&user.id, question_id, answer_id)
        .await?;

    Ok(ApiResponse::ok(answer))
}

/// Show a question with its tallies and the caller's vote.
async fn show(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(raw_question_id): Path<String>,
) -> AppResult<ApiResponse<QuestionView>> {
    let question_id = parse_positive_id(QUESTION_ID, &raw_question_id)?;
    let view = state
        .question_service
        .get_view(question_id, user.as_ref().map(|u| u.id.as_str()))
        .await?;
    Ok(ApiResponse::ok(view))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{question_id}", get(show))
        .route("/{question_id}/answers/{answer_id}/vote", post(vote))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn field_code(err: AppError, field: &str) -> String {
        let details = err.to_body().details.unwrap();
        details[field][0]["code"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_path_ids() {
        assert_eq!(parse_positive_id(ANSWER_ID, "7").unwrap(), 7);
        for raw in ["0", "-3", "abc", "", "+5", "1.5", "99999999999"] {
            let err = parse_positive_id(ANSWER_ID, raw).unwrap_err();
            assert_eq!(field_code(err, ANSWER_ID), "positive_integer", "input {raw:?}");
        }
    }

    #[test]
    fn test_body_matches_path() {
        assert_eq!(
            parse_vote_body(br#"{"questionId":2}"#, 2).unwrap().question_id,
            2
        );

        let err = parse_vote_body(br#"{"questionId":3}"#, 2).unwrap_err();
        assert_eq!(field_code(err, QUESTION_ID), "mismatch");
    }

    #[test]
    fn test_body_shape() {
        let err = parse_vote_body(b"not json", 2).unwrap_err();
        assert_eq!(field_code(err, "body"), "json");

        for body in [
            &br#"{}"#[..],
            br#"{"questionId":"2"}"#,
            br#"{"questionId":0}"#,
            br#"{"questionId":-2}"#,
            br#"{"questionId":2.5}"#,
        ] {
            let err = parse_vote_body(body, 2).unwrap_err();
            assert_eq!(field_code(err, QUESTION_ID), "positive_integer");
        }
    }
}
