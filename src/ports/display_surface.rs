//! Display Surface Port - What the player sees.
//!
//! The conversation pushes speaker/text updates and a single input-enabled
//! flag. Updates are synchronous and infallible from the engine's side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Speaker shown next to a line of dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeakerLabel {
    You,
    Friend,
    System,
}

impl fmt::Display for SpeakerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpeakerLabel::You => "You",
            SpeakerLabel::Friend => "Friend",
            SpeakerLabel::System => "System",
        };
        f.write_str(s)
    }
}

/// One line shown on the display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayUpdate {
    pub speaker: SpeakerLabel,
    pub text: String,
}

impl DisplayUpdate {
    pub fn new(speaker: SpeakerLabel, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }

    pub fn you(text: impl Into<String>) -> Self {
        Self::new(SpeakerLabel::You, text)
    }

    pub fn friend(text: impl Into<String>) -> Self {
        Self::new(SpeakerLabel::Friend, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(SpeakerLabel::System, text)
    }
}

impl fmt::Display for DisplayUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.text)
    }
}

/// Port for the conversation's presentation layer.
///
/// Calls arrive one at a time and in order. Implementations may query the
/// controller but must not submit lines from inside a call.
pub trait DisplaySurface: Send + Sync {
    /// Replaces or appends the visible line, depending on the surface.
    fn show(&self, update: DisplayUpdate);

    /// Enables or disables the input field.
    fn set_input_enabled(&self, enabled: bool);
}
