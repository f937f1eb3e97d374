//! Application layer - Conversation orchestration.
//!
//! Coordinates the domain model with the inference, emotion log and display
//! ports. The controller owns the transcript and the input gate.

mod conversation_controller;
mod submission;

pub use conversation_controller::{
    ControllerConfig, ControllerError, ConversationController, DEFAULT_CALL_TIMEOUT,
    DEFAULT_OPENING_LINE, DEFAULT_TYPING_PLACEHOLDER,
};
pub use submission::{
    ClassificationOutcome, IgnoreReason, ReplyOutcome, Submission, SubmitOutcome,
};
