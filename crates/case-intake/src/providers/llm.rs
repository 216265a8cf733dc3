//! Chat completion provider trait

use async_trait::async_trait;

use crate::error::Result;

/// A single system + user exchange
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// System message
    pub system: String,
    /// User message
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token limit
    pub max_tokens: u32,
}

/// Trait for chat completion
///
/// Implementations:
/// - `AzureOpenAiClient`: Azure OpenAI deployment
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Return the content of the first choice
    async fn complete(&self, request: ChatRequest) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model or deployment being used
    fn model(&self) -> &str;
}
