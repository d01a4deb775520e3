//! Offline keyword replies.

use regex::{Regex, RegexBuilder};

use ozone_core::config::FallbackConfig;
use ozone_core::types::{ConversationMessage, Sender};

use crate::error::AssistantError;

/// Plural and past-tense endings accepted after a keyword.
const INFLECTION: &str = "(?:s|es|d|ed)?";

struct CompiledGroup {
    name: String,
    /// `None` when the group has no usable keywords and can never match.
    pattern: Option<Regex>,
    reply: String,
}

/// Picks a canned reply from the latest user message.
pub struct FallbackResponder {
    groups: Vec<CompiledGroup>,
    default_reply: String,
    offline_notice: String,
}

impl FallbackResponder {
    pub fn new(config: &FallbackConfig) -> Result<Self, AssistantError> {
        let groups = config
            .groups
            .iter()
            .map(|group| -> Result<CompiledGroup, AssistantError> {
                let alternatives: Vec<String> = group
                    .keywords
                    .iter()
                    .map(|k| k.trim())
                    .filter(|k| !k.is_empty())
                    .map(regex::escape)
                    .collect();

                let pattern = if alternatives.is_empty() {
                    None
                } else {
                    let source = format!(r"\b(?:{}){}\b", alternatives.join("|"), INFLECTION);
                    let regex = RegexBuilder::new(&source)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| AssistantError::InvalidKeywords {
                            group: group.name.clone(),
                            reason: e.to_string(),
                        })?;
                    Some(regex)
                };

                Ok(CompiledGroup {
                    name: group.name.clone(),
                    pattern,
                    reply: group.reply.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            groups,
            default_reply: config.default_reply.clone(),
            offline_notice: config.offline_notice.clone(),
        })
    }

    /// The canned reply for a message, without the offline notice.
    pub fn canned_reply(&self, message: &str) -> &str {
        self.groups
            .iter()
            .find(|g| g.pattern.as_ref().is_some_and(|p| p.is_match(message)))
            .map(|g| {
                tracing::debug!(group = %g.name, "Fallback keyword group matched");
                g.reply.as_str()
            })
            .unwrap_or(&self.default_reply)
    }

    /// Canned reply followed by the offline notice.
    pub fn reply_for(&self, message: &str) -> String {
        let canned = self.canned_reply(message);
        if self.offline_notice.is_empty() {
            canned.to_string()
        } else {
            format!("{} {}", canned, self.offline_notice)
        }
    }

    /// Degraded reply for a conversation, keyed on its latest user message.
    pub fn respond(&self, history: &[ConversationMessage]) -> String {
        let latest = history
            .iter()
            .rev()
            .find(|m| m.sender == Sender::User)
            .map(|m| m.text.as_str())
            .unwrap_or("");
        self.reply_for(latest)
    }
}
