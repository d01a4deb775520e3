//! Chat assistant: ordered remote-model attempts under a deadline, with a
//! keyword-matched offline reply when no model answers.

pub mod conversation;
pub mod error;
pub mod fallback;
pub mod gateway;
pub mod responder;

pub use conversation::Conversation;
pub use error::{AssistantError, GatewayError};
pub use fallback::FallbackResponder;
pub use gateway::{
    CompletionGateway, CompletionRequest, HttpCompletionGateway, Role, WireMessage,
};
pub use responder::{AssistantReply, AssistantResponder, FallbackReason, ReplySource};
