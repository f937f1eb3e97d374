//! Console Display Adapter
//!
//! Writes dialogue lines to stdout for the terminal demo.

use std::io::{self, Write};

use crate::ports::{DisplaySurface, DisplayUpdate};

/// Prompt printed when the player may type again.
const INPUT_PROMPT: &str = "> ";

/// Display surface that prints to the terminal.
#[derive(Debug, Clone, Default)]
pub struct ConsoleDisplay;

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySurface for ConsoleDisplay {
    fn show(&self, update: DisplayUpdate) {
        if let Err(e) = write_update(&mut io::stdout().lock(), &update) {
            tracing::warn!(error = %e, "failed to write to console");
        }
    }

    fn set_input_enabled(&self, enabled: bool) {
        if !enabled {
            return;
        }
        if let Err(e) = write_input_prompt(&mut io::stdout().lock()) {
            tracing::warn!(error = %e, "failed to write input prompt to console");
        }
    }
}

fn write_update(out: &mut impl Write, update: &DisplayUpdate) -> io::Result<()> {
    writeln!(out, "{}", update)
}

fn write_input_prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "{}", INPUT_PROMPT)?;
    out.flush()
}
