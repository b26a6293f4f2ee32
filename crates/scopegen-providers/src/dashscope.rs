//! DashScope provider implementation
//!
//! Talks to Alibaba's DashScope service through its OpenAI-compatible
//! chat-completions endpoint. Supports the International and China
//! regions plus custom endpoints for self-hosted gateways and tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{
    error::ProviderError,
    models::{ChatRequest, ChatResponse, FinishReason, TokenUsage},
    provider::Provider,
};

// DashScope OpenAI-compatible endpoints
const DASHSCOPE_INTL_URL: &str =
    "https://dashscope-intl.aliyuncs.com/compatible-mode/v1/chat/completions";
const DASHSCOPE_CN_URL: &str =
    "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions";

/// Environment variable holding the DashScope credential
pub const API_KEY_ENV: &str = "DASHSCOPE_API_KEY";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// DashScope generation backend
pub struct DashScopeProvider {
    api_key: String,
    endpoint: String,
    client: Client,
}

impl DashScopeProvider {
    /// Create a provider for DashScope International (Singapore)
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        Self::with_endpoint(api_key, DASHSCOPE_INTL_URL.to_string())
    }

    /// Create a provider for DashScope China (Beijing)
    pub fn china(api_key: String) -> Result<Self, ProviderError> {
        Self::with_endpoint(api_key, DASHSCOPE_CN_URL.to_string())
    }

    /// Create a provider with a custom chat-completions endpoint
    pub fn with_endpoint(api_key: String, endpoint: String) -> Result<Self, ProviderError> {
        if api_key.is_empty() {
            return Err(ProviderError::ConfigError(
                "DashScope API key is required".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            endpoint,
            client: Self::build_client()?,
        })
    }

    /// Create a provider from the `DASHSCOPE_API_KEY` environment variable
    ///
    /// Returns `Ok(None)` when the credential is absent or empty, so that
    /// callers can detect an unconfigured backend without attempting a
    /// network call.
    pub fn from_env() -> Result<Option<Self>, ProviderError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Self::new(key).map(Some),
            _ => Ok(None),
        }
    }

    fn build_client() -> Result<Client, ProviderError> {
        Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| {
                ProviderError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    fn convert_response(
        response: WireChatResponse,
        model: String,
    ) -> Result<ChatResponse, ProviderError> {
        let choice = response
            .choices
            .first()
            .ok_or_else(|| ProviderError::ProviderError("No choices in response".to_string()))?;

        let content = choice.message.content.clone().unwrap_or_default();

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("error") => FinishReason::Error,
            _ => FinishReason::Stop,
        };

        Ok(ChatResponse {
            content,
            model,
            usage: TokenUsage {
                prompt_tokens: response.usage.prompt_tokens,
                completion_tokens: response.usage.completion_tokens,
                total_tokens: response.usage.prompt_tokens + response.usage.completion_tokens,
            },
            finish_reason,
        })
    }
}

#[async_trait]
impl Provider for DashScopeProvider {
    fn id(&self) -> &str {
        "dashscope"
    }

    fn name(&self) -> &str {
        "DashScope"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let wire_request = WireChatRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.clone(),
                    content: Some(m.content.clone()),
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        debug!(model = %request.model, "sending chat request to DashScope");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", self.auth_header())
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                error!("DashScope request failed: {}", e);
                ProviderError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("DashScope API error ({}): {}", status, error_text);

            return match status.as_u16() {
                401 => Err(ProviderError::AuthError),
                429 => Err(ProviderError::RateLimited(60)),
                _ => Err(ProviderError::ProviderError(format!(
                    "DashScope API error: {}",
                    status
                ))),
            };
        }

        let wire_response: WireChatResponse = response.json().await?;
        Self::convert_response(wire_response, request.model)
    }
}

#[derive(Debug, Serialize)]
struct WireChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireChatResponse {
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: WireUsage,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}
