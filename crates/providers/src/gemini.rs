//! Google Gemini provider implementation.
//!
//! Uses the `generateContent` REST endpoint directly.
//!
//! Features:
//! - `x-goog-api-key` header authentication
//! - System instruction as a top-level `systemInstruction` field
//! - Binary blocks (images, PDFs) sent as base64 `inlineData` parts
//! - Google error bodies (`{"error": {"status", "message"}}`) surfaced in errors

use agenrp_core::error::ProviderError;
use agenrp_core::provider::*;
use agenrp_core::request::{ContentBlock, Turn, TurnRole};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini `generateContent` provider.
pub struct GeminiProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(180)) // large PDFs take a while
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "gemini".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// Convert a provider request to the Gemini wire format.
    fn to_api_request(request: &ProviderRequest) -> GenerateContentRequest {
        let mut contents: Vec<Content> = request.history.iter().map(Self::to_api_content).collect();
        contents.push(Content {
            role: "user".into(),
            parts: request
                .message
                .to_blocks()
                .iter()
                .map(Self::to_api_part)
                .collect(),
        });

        GenerateContentRequest {
            system_instruction: (!request.system_instruction.is_empty()).then(|| SystemInstruction {
                parts: vec![Part::Text {
                    text: request.system_instruction.clone(),
                }],
            }),
            contents,
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }

    fn to_api_content(turn: &Turn) -> Content {
        Content {
            role: match turn.role {
                TurnRole::User => "user".into(),
                TurnRole::Model => "model".into(),
            },
            parts: turn.blocks.iter().map(Self::to_api_part).collect(),
        }
    }

    fn to_api_part(block: &ContentBlock) -> Part {
        match block {
            ContentBlock::Text { text } => Part::Text { text: text.clone() },
            ContentBlock::Binary(binary) => Part::InlineData {
                inline_data: InlineData {
                    mime_type: binary.mime_type.clone(),
                    data: BASE64_STANDARD.encode(&binary.data),
                },
            },
        }
    }

    /// Convert a Gemini response to our ProviderResponse.
    fn response_to_provider_response(resp: GenerateContentResponse, model: &str) -> ProviderResponse {
        let text = resp
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty());

        let usage = resp.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        ProviderResponse {
            text,
            model: resp.model_version.unwrap_or_else(|| model.to_string()),
            usage,
        }
    }
}

/// Map a non-success status and body to a provider error.
fn map_http_error(status: u16, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => ProviderError::AuthenticationFailed(format!("{status} {message}")),
        429 => ProviderError::RateLimited(format!("{status} {message}")),
        _ => ProviderError::ApiError {
            status_code: status,
            message,
        },
    }
}

#[async_trait]
impl agenrp_core::Provider for GeminiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = self.endpoint(&request.model);
        let body = Self::to_api_request(&request);

        debug!(
            provider = %self.name,
            model = %request.model,
            turns = body.contents.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, "Gemini returned error");
            return Err(map_http_error(status, &error_body));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        Ok(Self::response_to_provider_response(api_response, &request.model))
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/v1beta/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body));
        }
        Ok(response.status().is_success())
    }
}

// --- Gemini API types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}
