//! Provider trait implemented by generation backends

use async_trait::async_trait;

use crate::{
    error::ProviderError,
    models::{ChatRequest, ChatResponse},
};

/// Core trait that all generation backends implement
///
/// The pipeline makes exactly one `chat` call per generation attempt and
/// surfaces any failure as data; implementations should not retry
/// internally.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider's unique identifier
    fn id(&self) -> &str;

    /// Get the provider's human-readable name
    fn name(&self) -> &str;

    /// Send a chat completion request
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;
}
