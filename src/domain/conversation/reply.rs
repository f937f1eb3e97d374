//! Shaping generated text into Friend turns.
//!
//! Generation endpoints return raw continuation text: sometimes with the
//! prompt echoed in front, usually with a `Friend:` cue, occasionally with
//! the model carrying on as the player. Only the friend's own lines survive.

use serde::{Deserialize, Serialize};

use super::prompt::REPLY_CUE;

/// Line prefixes that mean the generator started writing the player's part.
const USER_CUES: [&str; 2] = ["User:", "You:"];

/// How a multi-line reply lands in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReplyLinePolicy {
    /// Every non-empty line becomes its own Friend turn.
    #[default]
    SeparateTurns,
    /// All lines are joined with a space into a single Friend turn.
    JoinLines,
}

impl ReplyLinePolicy {
    /// Groups cleaned reply lines into Friend turn texts.
    pub fn shape(&self, lines: Vec<String>) -> Vec<String> {
        match self {
            ReplyLinePolicy::SeparateTurns => lines,
            ReplyLinePolicy::JoinLines if lines.is_empty() => lines,
            ReplyLinePolicy::JoinLines => vec![lines.join(" ")],
        }
    }
}

/// Extracts the friend's lines from generated text.
///
/// Returns an empty vector when nothing usable is left.
pub fn friend_lines(generated: &str, prompt: &str) -> Vec<String> {
    let continuation = generated.strip_prefix(prompt).unwrap_or(generated);

    let mut lines = Vec::new();
    for raw in continuation.lines() {
        let line = raw.trim();
        if starts_with_cue(line, &USER_CUES) {
            break;
        }
        let line = strip_cue(line, REPLY_CUE).trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    lines
}

fn starts_with_cue(line: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| has_cue(line, cue))
}

fn has_cue(line: &str, cue: &str) -> bool {
    line.get(..cue.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(cue))
}

fn strip_cue<'a>(line: &'a str, cue: &str) -> &'a str {
    if has_cue(line, cue) {
        &line[cue.len()..]
    } else {
        line
    }
}
