//! Transcript store.
//!
//! Ordered history of every turn in a conversation. Storage is unbounded so
//! the full transcript stays available for display, but prompt construction
//! only ever sees the recency window.

use super::turn::Turn;

/// Ordered, append-only conversation history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptStore {
    turns: Vec<Turn>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn to the end of the history. Always succeeds.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Returns the last `min(n, len)` turns in their original order.
    pub fn recent_window(&self, n: usize) -> Vec<Turn> {
        let start = self.turns.len().saturating_sub(n);
        self.turns[start..].to_vec()
    }

    /// Full history, oldest first.
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
