//! Widget cycles against an in-memory transport that counts network calls.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};

use artilink_client::{ClientError, VoteState, VoteTransport, VoteWidget, WidgetAnswer};
use artilink_common::contract::{AnswerView, ErrorBody, VoteMembershipView};
use async_trait::async_trait;
use chrono::Utc;

struct CountingTransport {
    calls: AtomicUsize,
    fail_with: Option<u16>,
}

impl CountingTransport {
    const fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_with: None,
        }
    }

    const fn failing(status: u16) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_with: Some(status),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoteTransport for CountingTransport {
    async fn submit_vote(
        &self,
        question_id: i32,
        answer_id: i32,
    ) -> Result<AnswerView, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = self.fail_with {
            return Err(ClientError::Api {
                status,
                body: ErrorBody {
                    error: "already answered".to_string(),
                    code: Some("CONFLICT".to_string()),
                    details: None,
                },
            });
        }

        Ok(AnswerView {
            id: answer_id,
            question_id,
            text: String::new(),
            votes: 1,
            vote: Some(VoteMembershipView {
                id: "01hzvote".to_string(),
                user_id: "U".to_string(),
                answer_id,
                created_at: Utc::now(),
            }),
        })
    }
}

fn answers(counts: &[(i32, u64)]) -> Vec<WidgetAnswer> {
    counts
        .iter()
        .map(|(id, votes)| WidgetAnswer {
            id: *id,
            text: format!("Answer {id}"),
            votes: *votes,
        })
        .collect()
}

#[tokio::test]
async fn test_vote_for_a_then_percentages() {
    let transport = CountingTransport::succeeding();
    let mut widget = VoteWidget::new(1, answers(&[(1, 3), (2, 1)]));

    let state = widget.vote(&transport, 1).await;

    assert_eq!(state, VoteState::Voted { answer_id: 1 });
    assert_eq!(transport.calls(), 1);
    assert_eq!(widget.answers()[0].votes, 4);
    assert_eq!(widget.total_votes(), 5);
    assert_eq!(widget.percentages(), vec![80, 20]);
    assert_eq!(widget.selected_answer(), Some(1));
}

#[tokio::test]
async fn test_no_second_call_while_submitting() {
    let transport = CountingTransport::succeeding();
    let mut widget = VoteWidget::new(1, answers(&[(1, 3), (2, 1)]));

    let submission = widget.activate(1).unwrap();
    for _ in 0..5 {
        widget.vote(&transport, 1).await;
        widget.vote(&transport, 2).await;
    }
    assert_eq!(transport.calls(), 0);

    transport
        .submit_vote(submission.question_id, submission.answer_id)
        .await
        .unwrap();
    widget.resolve_success();
    assert_eq!(transport.calls(), 1);
    assert_eq!(widget.state(), VoteState::Voted { answer_id: 1 });
}

#[tokio::test]
async fn test_no_call_after_voted() {
    let transport = CountingTransport::succeeding();
    let mut widget = VoteWidget::new(1, answers(&[(1, 3), (2, 1)]));

    widget.vote(&transport, 1).await;
    widget.vote(&transport, 1).await;
    widget.vote(&transport, 2).await;

    assert_eq!(transport.calls(), 1);
    assert_eq!(widget.total_votes(), 5);
}

#[tokio::test]
async fn test_failure_reverts_and_allows_retry() {
    let failing = CountingTransport::failing(409);
    let mut widget = VoteWidget::new(1, answers(&[(1, 3), (2, 1)]));

    let state = widget.vote(&failing, 2).await;

    assert_eq!(state, VoteState::Unvoted);
    assert_eq!(widget.total_votes(), 4);
    assert!(!widget.shows_results());

    let ok = CountingTransport::succeeding();
    assert_eq!(
        widget.vote(&ok, 2).await,
        VoteState::Voted { answer_id: 2 }
    );
    assert_eq!(failing.calls() + ok.calls(), 2);
}

#[tokio::test]
async fn test_first_vote_on_empty_question() {
    let transport = CountingTransport::succeeding();
    let mut widget = VoteWidget::new(1, answers(&[(1, 0), (2, 0), (3, 0)]));
    assert_eq!(widget.percentages(), vec![0, 0, 0]);

    widget.vote(&transport, 2).await;

    assert_eq!(widget.total_votes(), 1);
    assert_eq!(widget.percentages(), vec![0, 100, 0]);
}

#[tokio::test]
async fn test_dyn_transport() {
    let transport: Box<dyn VoteTransport> = Box::new(CountingTransport::succeeding());
    let mut widget = VoteWidget::new(1, answers(&[(1, 0), (2, 0)]));

    assert_eq!(
        widget.vote(transport.as_ref(), 1).await,
        VoteState::Voted { answer_id: 1 }
    );
}
