//! Conversation domain module.
//!
//! Turns, the transcript, the input gate and prompt rendering for the
//! flip-phone friend conversation.

mod prompt;
mod reply;
mod state;
mod transcript;
mod turn;

pub use prompt::{
    escape_json_string, ExemplarPair, PromptBuilder, PromptRenderConfig,
    DEFAULT_HISTORY_WINDOW, DEFAULT_MAX_NEW_TOKENS, REPLY_CUE, STYLE_EXEMPLARS,
};
pub use reply::{friend_lines, ReplyLinePolicy};
pub use state::ConversationState;
pub use transcript::TranscriptStore;
pub use turn::{Turn, TurnRole};
