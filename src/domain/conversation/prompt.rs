//! Prompt construction for the reply generator.
//!
//! A prompt is the persona preamble, a fixed set of style exemplars, the
//! recent history window and a trailing `Friend:` cue that the generator
//! continues from. Rendering is deterministic: the same history always
//! yields the same string.

use super::transcript::TranscriptStore;
use super::turn::{Turn, TurnRole};

/// Number of recent turns rendered into each prompt.
pub const DEFAULT_HISTORY_WINDOW: usize = 4;

/// Generation budget sent with every reply request.
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 100;

/// Cue the generator continues from.
pub const REPLY_CUE: &str = "Friend:";

const PERSONA_PREAMBLE: &str = "You are a 2000's-era flip-phone buddy. Reply in 1-2 short lines as \"Friend: ...\"\n\
Use 'omg', ':P', '<3', refs to mix-CDs, Razr phones, MySpace Top 8, early Bieber, etc.";

/// A hand-written exchange that shows the generator the expected voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExemplarPair {
    pub friend: &'static str,
    pub user: &'static str,
}

/// Exemplars are fixed at compile time and never reloaded.
pub const STYLE_EXEMPLARS: &[ExemplarPair] = &[
    ExemplarPair {
        friend: "omg remember making mix-cds in my dorm? :P",
        user: "yesss, those midnight burns were fire",
    },
    ExemplarPair {
        friend: "brb gotta charge my Razr",
        user: "lol flip-phone life was wild <3",
    },
];

/// Fixed prompt rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRenderConfig {
    pub history_window: usize,
    pub style_exemplars: &'static [ExemplarPair],
    pub max_new_tokens: u32,
}

impl Default for PromptRenderConfig {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            style_exemplars: STYLE_EXEMPLARS,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }
}

/// Renders conversation history into a generator prompt.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Renders `history` (already windowed) into a prompt string.
    ///
    /// The result ends with `Friend:` and no trailing newline.
    pub fn build(history: &[Turn], config: &PromptRenderConfig) -> String {
        let mut prompt = String::with_capacity(512);

        prompt.push_str(PERSONA_PREAMBLE);
        prompt.push_str("\n\n");

        for pair in config.style_exemplars {
            push_line(&mut prompt, TurnRole::Friend, pair.friend);
            push_line(&mut prompt, TurnRole::User, pair.user);
            prompt.push('\n');
        }

        for turn in history {
            prompt.push_str(&turn.to_prompt_line());
            prompt.push('\n');
        }

        prompt.push_str(REPLY_CUE);
        prompt
    }

    /// Renders the recency window of `store`.
    pub fn build_from_store(store: &TranscriptStore, config: &PromptRenderConfig) -> String {
        Self::build(&store.recent_window(config.history_window), config)
    }
}

fn push_line(prompt: &mut String, role: TurnRole, text: &str) {
    prompt.push_str(role.label());
    prompt.push_str(": ");
    prompt.push_str(text);
    prompt.push('\n');
}

/// Escapes `raw` for embedding between the quotes of a JSON string.
///
/// Backslash is escaped first, then quote, then newline, so escapes inserted
/// by a later step are never escaped again. Any other control character is
/// written as a JSON escape so the encoded body is always valid.
pub fn escape_json_string(raw: &str) -> String {
    let escaped = raw
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");

    if !escaped.chars().any(char::is_control) {
        return escaped;
    }

    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
