//! Conversation state machine.
//!
//! The gate that keeps a single submission in flight at a time.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The lifecycle state of the conversation gate.
///
/// - `Idle`: input accepted
/// - `AwaitingReply`: a submission is in flight, input is locked
/// - `Error`: the reply failed; the failure is being reported before unlocking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Idle,

    AwaitingReply,

    Error,
}

impl ConversationState {
    /// Returns true if a new line may be submitted in this state.
    pub fn accepts_user_input(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl StateMachine for ConversationState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConversationState::*;
        matches!(
            (self, target),
            (Idle, AwaitingReply) | (AwaitingReply, Idle) | (AwaitingReply, Error) | (Error, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationState::*;
        match self {
            Idle => vec![AwaitingReply],
            AwaitingReply => vec![Idle, Error],
            Error => vec![Idle],
        }
    }
}
