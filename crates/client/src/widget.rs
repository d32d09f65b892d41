//! Vote widget state machine.
//!
//! ```text
//! Unvoted --activate--> Submitting --success--> Voted
//!    ^                      |
//!    +-------failure--------+
//!
//! AlreadyVoted (initial load only)
//! ```

use artilink_common::contract::{AnswerView, QuestionView};

use crate::{error::ClientError, transport::VoteTransport};

/// Where the widget is in the voting cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteState {
    /// Initial state. Answers are interactive.
    Unvoted,
    /// A submission for `answer_id` is in flight.
    Submitting { answer_id: i32 },
    /// The vote for `answer_id` was recorded during this session.
    Voted { answer_id: i32 },
    /// The server reported a vote for `answer_id` on load.
    AlreadyVoted { answer_id: i32 },
}

/// One answer as the widget displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetAnswer {
    pub id: i32,
    pub text: String,
    pub votes: u64,
}

impl From<&AnswerView> for WidgetAnswer {
    fn from(answer: &AnswerView) -> Self {
        Self {
            id: answer.id,
            text: answer.text.clone(),
            votes: u64::try_from(answer.votes).unwrap_or(0),
        }
    }
}

/// The single network call an activation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteSubmission {
    pub question_id: i32,
    pub answer_id: i32,
}

/// Client state for one question.
#[derive(Debug, Clone)]
pub struct VoteWidget {
    question_id: i32,
    answers: Vec<WidgetAnswer>,
    state: VoteState,
}

impl VoteWidget {
    /// A widget for a question the user has not voted on.
    #[must_use]
    pub const fn new(question_id: i32, answers: Vec<WidgetAnswer>) -> Self {
        Self {
            question_id,
            answers,
            state: VoteState::Unvoted,
        }
    }

    /// Seed from a server view. A reported prior vote starts in `AlreadyVoted`.
    #[must_use]
    pub fn from_view(view: &QuestionView) -> Self {
        let answers = view.answers.iter().map(WidgetAnswer::from).collect();
        let state = match view.my_vote {
            Some(answer_id) => VoteState::AlreadyVoted { answer_id },
            None => VoteState::Unvoted,
        };
        Self {
            question_id: view.id,
            answers,
            state,
        }
    }

    /// Question this widget votes on.
    #[must_use]
    pub const fn question_id(&self) -> i32 {
        self.question_id
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> VoteState {
        self.state
    }

    /// Answers with their in-memory counts.
    #[must_use]
    pub fn answers(&self) -> &[WidgetAnswer] {
        &self.answers
    }

    /// Whether tapping an answer does anything.
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        matches!(self.state, VoteState::Unvoted)
    }

    /// `Voted` and `AlreadyVoted` both reveal percentages.
    #[must_use]
    pub const fn shows_results(&self) -> bool {
        matches!(
            self.state,
            VoteState::Voted { .. } | VoteState::AlreadyVoted { .. }
        )
    }

    /// The user's own selection, once results are shown.
    #[must_use]
    pub const fn selected_answer(&self) -> Option<i32> {
        match self.state {
            VoteState::Voted { answer_id } | VoteState::AlreadyVoted { answer_id } => {
                Some(answer_id)
            }
            VoteState::Unvoted | VoteState::Submitting { .. } => None,
        }
    }

    /// Sum of all answers' counts.
    #[must_use]
    pub fn total_votes(&self) -> u64 {
        self.answers.iter().map(|a| a.votes).sum()
    }

    /// Whole-number percentage per answer, in answer order.
    ///
    /// All zero when nobody has voted. Otherwise each share is floored and the
    /// points left over go to the largest remainders (earlier answers win
    /// ties), so the values always add up to exactly 100.
    #[must_use]
    pub fn percentages(&self) -> Vec<u64> {
        let total = self.total_votes();
        if total == 0 {
            return vec![0; self.answers.len()];
        }

        let mut shares: Vec<u64> = self.answers.iter().map(|a| a.votes * 100 / total).collect();
        let mut leftover = 100 - shares.iter().sum::<u64>();

        let mut by_remainder: Vec<(usize, u64)> = self
            .answers
            .iter()
            .enumerate()
            .map(|(i, a)| (i, a.votes * 100 % total))
            .collect();
        // Stable sort keeps index order among equal remainders
        by_remainder.sort_by(|a, b| b.1.cmp(&a.1));

        for (index, _) in by_remainder {
            if leftover == 0 {
                break;
            }
            shares[index] += 1;
            leftover -= 1;
        }

        shares
    }

    /// Tap on an answer.
    ///
    /// Returns the submission to send when the widget was `Unvoted` and the
    /// answer is one of its own; every other tap is ignored.
    pub fn activate(&mut self, answer_id: i32) -> Option<VoteSubmission> {
        if !self.is_interactive() {
            tracing::debug!(question_id = self.question_id, state = ?self.state, "Ignoring tap");
            return None;
        }
        if !self.answers.iter().any(|a| a.id == answer_id) {
            tracing::debug!(question_id = self.question_id, answer_id, "Ignoring tap on unknown answer");
            return None;
        }

        self.state = VoteState::Submitting { answer_id };
        Some(VoteSubmission {
            question_id: self.question_id,
            answer_id,
        })
    }

    /// Apply a successful submission: the chosen answer gains one vote locally.
    pub fn resolve_success(&mut self) {
        let VoteState::Submitting { answer_id } = self.state else {
            return;
        };

        if let Some(answer) = self.answers.iter_mut().find(|a| a.id == answer_id) {
            answer.votes += 1;
        }
        self.state = VoteState::Voted { answer_id };
    }

    /// Apply a failed submission: back to `Unvoted`, counts untouched.
    pub fn resolve_failure(&mut self, error: &ClientError) {
        let VoteState::Submitting { answer_id } = self.state else {
            return;
        };

        tracing::warn!(
            question_id = self.question_id,
            answer_id,
            error = %error,
            "Vote submission failed"
        );
        self.state = VoteState::Unvoted;
    }

    /// Run one full cycle for a tap on `answer_id` and return the resulting state.
    ///
    /// Calls the transport at most once, and only when the tap was accepted.
    pub async fn vote<T>(&mut self, transport: &T, answer_id: i32) -> VoteState
    where
        T: VoteTransport + ?Sized,
    {
        let Some(submission) = self.activate(answer_id) else {
            return self.state;
        };

        match transport
            .submit_vote(submission.question_id, submission.answer_id)
            .await
        {
            Ok(_) => self.resolve_success(),
            Err(e) => self.resolve_failure(&e),
        }

        self.state
    }
}
