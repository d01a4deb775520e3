use ozone_core::types::ConversationMessage;

use crate::responder::{AssistantReply, AssistantResponder};

/// A running chat that opens with the assistant's greeting.
///
/// Message ids are sequential starting at 1, so the greeting is always id 1.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ConversationMessage>,
}

impl Conversation {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![ConversationMessage::bot(1, greeting)],
        }
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    fn next_id(&self) -> u64 {
        self.messages.len() as u64 + 1
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &ConversationMessage {
        let message = ConversationMessage::user(self.next_id(), text);
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn push_bot(&mut self, text: impl Into<String>) -> &ConversationMessage {
        let message = ConversationMessage::bot(self.next_id(), text);
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Append a user message, get a reply for the whole history and append it.
    ///
    /// Blank input is ignored and returns `None`.
    pub async fn ask(
        &mut self,
        responder: &AssistantResponder,
        text: &str,
    ) -> Option<AssistantReply> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.push_user(text);
        let reply = responder.respond_detailed(&self.messages).await;
        self.push_bot(reply.text.clone());
        Some(reply)
    }
}
