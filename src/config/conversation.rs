//! Conversation behaviour configuration

use serde::Deserialize;

use crate::domain::conversation::ReplyLinePolicy;

/// Conversation behaviour settings
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// How multi-line replies become Friend turns
    #[serde(default)]
    pub reply_lines: ReplyLinePolicy,

    /// Transient line shown while the reply is pending
    #[serde(default = "default_typing_placeholder")]
    pub typing_placeholder: String,

    /// Greeting shown on start; an empty string disables it
    #[serde(default = "default_opening_line")]
    pub opening_line: String,
}

impl ConversationConfig {
    /// Opening line, if one should be shown
    pub fn opening_line(&self) -> Option<String> {
        let line = self.opening_line.trim();
        (!line.is_empty()).then(|| line.to_string())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            reply_lines: ReplyLinePolicy::default(),
            typing_placeholder: default_typing_placeholder(),
            opening_line: default_opening_line(),
        }
    }
}

fn default_typing_placeholder() -> String {
    "…typing…".to_string()
}

fn default_opening_line() -> String {
    "hii, don't you miss the Bieber swag era? :P".to_string()
}
