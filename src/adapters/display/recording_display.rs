//! Recording Display Adapter
//!
//! Captures every display update and input toggle in memory so tests can
//! assert on exactly what the player would have seen.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::{DisplaySurface, DisplayUpdate};

#[derive(Debug, Default)]
struct Recorded {
    updates: Vec<DisplayUpdate>,
    input_toggles: Vec<bool>,
}

/// In-memory display surface. Clones share the same recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every update shown so far, oldest first.
    pub fn updates(&self) -> Vec<DisplayUpdate> {
        self.recorded().updates.clone()
    }

    /// Updates rendered as `"Speaker: text"` lines.
    pub fn lines(&self) -> Vec<String> {
        self.recorded()
            .updates
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// The most recent update, if any.
    pub fn last(&self) -> Option<DisplayUpdate> {
        self.recorded().updates.last().cloned()
    }

    /// Every `set_input_enabled` call, oldest first.
    pub fn input_toggles(&self) -> Vec<bool> {
        self.recorded().input_toggles.clone()
    }

    /// Current input flag. Input starts enabled.
    pub fn input_enabled(&self) -> bool {
        self.recorded().input_toggles.last().copied().unwrap_or(true)
    }
}

impl DisplaySurface for RecordingDisplay {
    fn show(&self, update: DisplayUpdate) {
        self.recorded().updates.push(update);
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.recorded().input_toggles.push(enabled);
    }
}
