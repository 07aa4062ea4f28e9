//! Provider trait: the abstraction over the generative-model backend.
//!
//! A Provider takes an instruction, prior turns and a new message, and
//! returns the model's textual reply. Credentials belong to the provider
//! instance; nothing here reads ambient state.

use crate::error::ProviderError;
use crate::request::{MessagePayload, OutboundRequest, Turn};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A fully specified model call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gemini-2.5-flash")
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Instruction channel content
    pub system_instruction: String,

    /// Prior turns, oldest first
    pub history: Vec<Turn>,

    /// The message to send
    pub message: MessagePayload,
}

pub fn default_temperature() -> f32 {
    0.3
}

impl ProviderRequest {
    /// Lay out a composed request for transmission: the leading context turn
    /// goes ahead of the transcript history.
    pub fn from_outbound(model: impl Into<String>, temperature: f32, outbound: OutboundRequest) -> Self {
        let history = outbound.prior_turns();
        Self {
            model: model.into(),
            temperature,
            system_instruction: outbound.system_instruction,
            history,
            message: outbound.new_turn,
        }
    }
}

/// The model's answer to a single call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Generated text; `None` when the model returned no text parts
    pub text: Option<String>,

    /// Which model actually responded
    pub model: String,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send one request and wait for the complete reply.
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{CompositionMetadata, ContentBlock, TurnRole};

    struct EchoProvider;

    #[async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                text: Some(request.message.text().to_string()),
                model: request.model,
                usage: None,
            })
        }
    }

    #[test]
    fn from_outbound_prepends_leading_context() {
        let outbound = OutboundRequest {
            system_instruction: "policy".into(),
            history: vec![Turn::new(TurnRole::User, vec![ContentBlock::text("q1")])],
            leading_context: Some(Turn::new(TurnRole::User, vec![ContentBlock::text("pdfs")])),
            new_turn: MessagePayload::TextOnly { text: "q2".into() },
            metadata: CompositionMetadata::default(),
        };
        let request = ProviderRequest::from_outbound("gemini-2.5-flash", 0.3, outbound);
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history[0].text(), "pdfs");
        assert_eq!(request.system_instruction, "policy");
        assert!((request.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn default_health_check_is_ok() {
        let provider = EchoProvider;
        assert!(provider.health_check().await.unwrap());
        let response = provider
            .send(ProviderRequest {
                model: "m".into(),
                temperature: default_temperature(),
                system_instruction: String::new(),
                history: vec![],
                message: MessagePayload::TextOnly { text: "hai".into() },
            })
            .await
            .unwrap();
        assert_eq!(response.text.as_deref(), Some("hai"));
    }
}
