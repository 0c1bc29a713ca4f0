//! Text generation trait implemented by all model providers

use async_trait::async_trait;

use crate::error::Result;

/// Sampling parameters for one generation call
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Request a streamed response and accumulate it before returning
    pub stream: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 1024,
            stream: false,
        }
    }
}

/// A provider that turns a prompt into text.
///
/// Every pipeline stage goes through this trait, so a single provider
/// can serve several stages with different models and parameters.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the prompt with the given model
    async fn generate(&self, model: &str, prompt: &str, params: GenerationParams) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
