//! Display Adapters
//!
//! - `ConsoleDisplay` - Prints dialogue to the terminal
//! - `RecordingDisplay` - Records updates in memory for tests

mod console_display;
mod recording_display;

pub use console_display::ConsoleDisplay;
pub use recording_display::RecordingDisplay;
