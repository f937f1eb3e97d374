//! Foundation module - Shared domain primitives.
//!
//! Value objects, state machine support and error types that the
//! conversation domain is built on.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::SubmissionId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
