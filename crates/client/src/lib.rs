//! Client side of community questions.
//!
//! [`VoteWidget`] is the state machine behind a question's answer list.
//! It talks to the server through a [`VoteTransport`]; [`HttpVoteTransport`]
//! is the `reqwest` implementation.

pub mod error;
pub mod transport;
pub mod widget;

pub use error::ClientError;
pub use transport::{HttpVoteTransport, VoteTransport};
pub use widget::{VoteState, VoteSubmission, VoteWidget, WidgetAnswer};
