//! Domain layer containing the conversation rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (timestamps, state machine trait, errors)
//! - `conversation` - Turns, transcript, input gate and prompt rendering

pub mod conversation;
pub mod foundation;
