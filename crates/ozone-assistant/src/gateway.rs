//! Remote chat-completion gateway.
//!
//! The responder only sees the [`CompletionGateway`] trait, so tests can
//! substitute scripted gateways for the HTTP one.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use ozone_core::config::AssistantConfig;
use ozone_core::types::{ConversationMessage, Sender};

use crate::error::{AssistantError, GatewayError};

/// Longest error body kept in a [`GatewayError::Status`].
const MAX_ERROR_BODY: usize = 256;

/// Conversation turn roles. The system prompt travels separately in
/// [`CompletionRequest::system`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl WireMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Map conversation history onto wire roles: user stays user, bot becomes assistant.
pub fn to_wire_messages(history: &[ConversationMessage]) -> Vec<WireMessage> {
    history
        .iter()
        .map(|m| {
            let role = match m.sender {
                Sender::User => Role::User,
                Sender::Bot => Role::Assistant,
            };
            WireMessage::new(role, m.text.clone())
        })
        .collect()
}

/// One completion call against one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Sent as a top-level `system` field alongside the messages.
    pub system: String,
}

#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Return the model's reply text, or why this attempt failed.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
}

/// Pull `choices[0].message.content` out of a response body.
///
/// A missing, non-string or blank content counts as a malformed response.
pub fn extract_reply(body: &Value) -> Result<String, GatewayError> {
    let content = body
        .pointer("/choices/0/message/content")
        .ok_or_else(|| {
            GatewayError::MalformedResponse("missing choices[0].message.content".to_string())
        })?;

    let text = content
        .as_str()
        .ok_or_else(|| GatewayError::MalformedResponse("content is not a string".to_string()))?
        .trim();

    if text.is_empty() {
        return Err(GatewayError::MalformedResponse("empty reply".to_string()));
    }

    Ok(text.to_string())
}

/// OpenAI-compatible gateway over HTTPS.
pub struct HttpCompletionGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    referrer: String,
    app_title: String,
}

impl HttpCompletionGateway {
    /// Build from config. A missing API key is not an error here; each
    /// attempt fails with [`GatewayError::MissingCredential`] instead.
    pub fn new(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AssistantError::GatewaySetup(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.resolve_api_key(),
            referrer: config.referrer.clone(),
            app_title: config.app_title.clone(),
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CompletionGateway for HttpCompletionGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingCredential)?;

        debug!(model = %request.model, endpoint = %self.endpoint, "Requesting completion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referrer)
            .header("X-Title", &self.app_title)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        extract_reply(&body)
    }
}
