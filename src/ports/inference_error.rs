//! Errors shared by the remote inference ports.
//!
//! Both the emotion classifier and the reply generator fail in the same ways,
//! so they share one taxonomy. Failures are returned as values; nothing here
//! is fatal to the process.

use std::time::Duration;

/// Inference call failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    /// The input text was empty; no request was sent.
    #[error("empty input")]
    EmptyInput,

    /// The request failed in transport or returned a non-2xx status.
    #[error("transport error{}: {message}", status_suffix(.status_code))]
    Transport {
        /// HTTP status, when a response was received.
        status_code: Option<u16>,
        /// Error details.
        message: String,
    },

    /// The endpoint answered successfully but with no results.
    #[error("empty result")]
    EmptyResult,

    /// The call did not finish within the configured bound.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Classifier failure.
pub type ClassifyError = InferenceError;

/// Reply generation failure.
pub type GenerateError = InferenceError;

fn status_suffix(status_code: &Option<u16>) -> String {
    status_code.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl InferenceError {
    /// Creates a transport error for a received HTTP status.
    pub fn status(status_code: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status_code: Some(status_code),
            message: message.into(),
        }
    }

    /// Creates a transport error where no response was received.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Transport {
            status_code: None,
            message: message.into(),
        }
    }

    /// Creates a timeout error, rounding the bound up to whole seconds.
    pub fn timeout(limit: Duration) -> Self {
        let partial = u64::from(limit.subsec_nanos() > 0);
        Self::Timeout {
            timeout_secs: limit.as_secs().saturating_add(partial),
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true when the endpoint answered but gave nothing usable.
    ///
    /// Malformed and empty responses are handled the same way.
    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::EmptyResult | Self::Parse(_))
    }

    /// Short, player-facing description. Never includes response bodies.
    pub fn user_summary(&self) -> String {
        match self {
            Self::EmptyInput => "Nothing to send".to_string(),
            Self::Transport {
                status_code: Some(code),
                ..
            } => format!("Error {}: couldn't reach your friend", code),
            Self::Transport {
                status_code: None, ..
            } => "Connection problem: couldn't reach your friend".to_string(),
            Self::Timeout { .. } => "Your friend took too long to reply".to_string(),
            Self::EmptyResult | Self::Parse(_) => "No reply".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_display_includes_status_when_known() {
        let err = InferenceError::status(503, "model loading");
        assert_eq!(err.to_string(), "transport error (503): model loading");

        let err = InferenceError::network("connection refused");
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn timeout_displays_bound() {
        let err = InferenceError::Timeout { timeout_secs: 15 };
        assert_eq!(err.to_string(), "request timed out after 15s");
    }

    #[test]
    fn sub_second_timeout_is_not_reported_as_zero() {
        let err = InferenceError::timeout(Duration::from_millis(50));
        assert_eq!(err, InferenceError::Timeout { timeout_secs: 1 });
        assert_eq!(err.to_string(), "request timed out after 1s");

        assert_eq!(
            InferenceError::timeout(Duration::from_millis(1500)),
            InferenceError::Timeout { timeout_secs: 2 }
        );
        assert_eq!(
            InferenceError::timeout(Duration::from_secs(15)),
            InferenceError::Timeout { timeout_secs: 15 }
        );
    }

    #[test]
    fn empty_and_malformed_are_both_no_content() {
        assert!(InferenceError::EmptyResult.is_no_content());
        assert!(InferenceError::parse("expected array").is_no_content());
        assert!(!InferenceError::EmptyInput.is_no_content());
        assert!(!InferenceError::status(500, "boom").is_no_content());
    }

    #[test]
    fn user_summary_hides_internals() {
        let err = InferenceError::status(500, "Traceback (most recent call last): ...");
        let summary = err.user_summary();
        assert_eq!(summary, "Error 500: couldn't reach your friend");
        assert!(!summary.contains("Traceback"));

        assert_eq!(InferenceError::parse("eof").user_summary(), "No reply");
        assert_eq!(
            InferenceError::Timeout { timeout_secs: 15 }.user_summary(),
            "Your friend took too long to reply"
        );
    }
}
