//! Conversation turns.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Timestamp;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The player.
    User,
    /// The flip-phone friend (generated reply).
    Friend,
    /// Engine-authored notices, e.g. a failed reply.
    System,
}

impl TurnRole {
    /// Label used when the turn is rendered into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            TurnRole::User => "User",
            TurnRole::Friend => "Friend",
            TurnRole::System => "System",
        }
    }
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One utterance in the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: TurnRole,
    text: String,
    timestamp: Timestamp,
}

impl Turn {
    /// Creates a turn stamped with the current time.
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self::at(role, text, Timestamp::now())
    }

    /// Creates a turn with an explicit timestamp.
    pub fn at(role: TurnRole, text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, text)
    }

    pub fn friend(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Friend, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(TurnRole::System, text)
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Renders the turn as a prompt line, `"<Role>: <text>"`.
    pub fn to_prompt_line(&self) -> String {
        format!("{}: {}", self.role.label(), self.text)
    }
}
