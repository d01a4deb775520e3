//! Ordered model attempts with an overall deadline and offline fallback.
//!
//! ```text
//! respond_detailed(history)
//!   ├─ no models configured ─────────────────────► Fallback(NoModelsConfigured)
//!   └─ timeout(deadline, attempts)
//!        ├─ model[0] ok ──► Model(model[0])
//!        ├─ model[0] err ─► model[1] ... ─► Model(model[i])
//!        ├─ every model err ─────────────────────► Fallback(AllModelsFailed)
//!        └─ deadline elapsed ────────────────────► Fallback(TimedOut)
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use ozone_core::config::{AssistantConfig, FallbackConfig};
use ozone_core::types::ConversationMessage;

use crate::error::AssistantError;
use crate::fallback::FallbackResponder;
use crate::gateway::{to_wire_messages, CompletionGateway, CompletionRequest};

/// Why a reply came from the offline responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    AllModelsFailed,
    TimedOut,
    NoModelsConfigured,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum ReplySource {
    /// Answered by the named model.
    Model(String),
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantReply {
    pub text: String,
    pub source: ReplySource,
}

impl AssistantReply {
    pub fn is_degraded(&self) -> bool {
        matches!(self.source, ReplySource::Fallback(_))
    }
}

/// Produces a reply for a conversation, never failing.
pub struct AssistantResponder {
    gateway: Arc<dyn CompletionGateway>,
    models: Vec<String>,
    timeout: Duration,
    max_tokens: u32,
    temperature: f32,
    system_prompt: String,
    fallback: FallbackResponder,
}

impl AssistantResponder {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        config: &AssistantConfig,
        fallback: &FallbackConfig,
    ) -> Result<Self, AssistantError> {
        Ok(Self {
            gateway,
            models: config.models.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system_prompt: config.system_prompt.clone(),
            fallback: FallbackResponder::new(fallback)?,
        })
    }

    /// Override the overall deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Reply text only.
    pub async fn respond(&self, history: &[ConversationMessage]) -> String {
        self.respond_detailed(history).await.text
    }

    /// Reply text together with where it came from.
    pub async fn respond_detailed(&self, history: &[ConversationMessage]) -> AssistantReply {
        if self.models.is_empty() {
            info!("No assistant models configured; using offline reply");
            return self.degraded(history, FallbackReason::NoModelsConfigured);
        }

        match tokio::time::timeout(self.timeout, self.attempt_models(history)).await {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                info!(
                    models = self.models.len(),
                    "All assistant models failed; using offline reply"
                );
                self.degraded(history, FallbackReason::AllModelsFailed)
            }
            Err(_) => {
                info!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Assistant timed out; using offline reply"
                );
                self.degraded(history, FallbackReason::TimedOut)
            }
        }
    }

    /// Try each model in order, stopping at the first usable reply.
    async fn attempt_models(&self, history: &[ConversationMessage]) -> Option<AssistantReply> {
        let mut request = CompletionRequest {
            model: String::new(),
            messages: to_wire_messages(history),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: self.system_prompt.clone(),
        };

        for (index, model) in self.models.iter().enumerate() {
            request.model.clone_from(model);
            debug!(model = %model, attempt = index + 1, "Trying assistant model");

            match self.gateway.complete(&request).await {
                Ok(text) => {
                    debug!(model = %model, attempt = index + 1, "Assistant model replied");
                    return Some(AssistantReply {
                        text,
                        source: ReplySource::Model(model.clone()),
                    });
                }
                Err(e) => {
                    warn!(model = %model, attempt = index + 1, error = %e, "Assistant model failed");
                }
            }
        }

        None
    }

    fn degraded(&self, history: &[ConversationMessage], reason: FallbackReason) -> AssistantReply {
        AssistantReply {
            text: self.fallback.respond(history),
            source: ReplySource::Fallback(reason),
        }
    }
}
