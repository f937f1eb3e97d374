//! Nostalgia Friend - Conversation engine for a 2000s flip-phone buddy.
//!
//! The player types a line; the engine echoes it, locks input, asks a remote
//! classifier for the line's emotion and a remote generator for the friend's
//! reply, then records the outcome and unlocks input.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
