//! Submission handles and outcomes.
//!
//! An accepted line spawns two independent tasks. The `Submission` handle
//! lets callers await either one without tying it to the other.

use tokio::task::JoinHandle;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::SubmissionId;
use crate::ports::{ClassificationResult, InferenceError};

/// Result of calling `submit`.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The line was appended and both remote calls were started.
    Accepted(Submission),
    /// The line was dropped without touching the transcript.
    Ignored(IgnoreReason),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Returns the submission handle if the line was accepted.
    pub fn accepted(self) -> Option<Submission> {
        match self {
            Self::Accepted(submission) => Some(submission),
            Self::Ignored(_) => None,
        }
    }
}

/// Why a line was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The line was empty after trimming.
    EmptyLine,
    /// Another submission is still in flight.
    Busy(ConversationState),
    /// The controller has been stopped.
    Stopped,
}

/// How a submission's reply task ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    /// Friend turns appended to the transcript, in order.
    Replied(Vec<String>),
    /// The reply failed and a System turn was appended.
    Failed(InferenceError),
    /// The controller was stopped before the reply arrived.
    Cancelled,
}

/// How a submission's classification task ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    Classified(ClassificationResult),
    Failed(InferenceError),
    Cancelled,
}

/// Handle to the two tasks of an accepted submission.
///
/// Dropping the handle detaches the tasks; they still run to completion.
#[derive(Debug)]
pub struct Submission {
    id: SubmissionId,
    reply: JoinHandle<ReplyOutcome>,
    classification: JoinHandle<ClassificationOutcome>,
}

impl Submission {
    pub(crate) fn new(
        id: SubmissionId,
        reply: JoinHandle<ReplyOutcome>,
        classification: JoinHandle<ClassificationOutcome>,
    ) -> Self {
        Self {
            id,
            reply,
            classification,
        }
    }

    pub fn id(&self) -> SubmissionId {
        self.id
    }

    /// Waits for the reply only. Classification keeps running detached.
    pub async fn reply(self) -> ReplyOutcome {
        self.reply.await.unwrap_or_else(|e| {
            tracing::error!(submission_id = %self.id, error = %e, "reply task aborted");
            ReplyOutcome::Cancelled
        })
    }

    /// Waits for the classification only. The reply keeps running detached.
    pub async fn classification(self) -> ClassificationOutcome {
        self.classification.await.unwrap_or_else(|e| {
            tracing::error!(submission_id = %self.id, error = %e, "classification task aborted");
            ClassificationOutcome::Cancelled
        })
    }

    /// Waits for both tasks.
    pub async fn join(self) -> (ReplyOutcome, ClassificationOutcome) {
        let id = self.id;
        let (reply, classification) = tokio::join!(self.reply, self.classification);
        let reply = reply.unwrap_or_else(|e| {
            tracing::error!(submission_id = %id, error = %e, "reply task aborted");
            ReplyOutcome::Cancelled
        });
        let classification = classification.unwrap_or_else(|e| {
            tracing::error!(submission_id = %id, error = %e, "classification task aborted");
            ClassificationOutcome::Cancelled
        });
        (reply, classification)
    }
}
