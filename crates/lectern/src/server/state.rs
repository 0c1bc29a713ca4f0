//! Shared application state

use std::sync::Arc;

use crate::config::LecternConfig;
use crate::error::{Error, Result};
use crate::generation::NotesPipeline;
use crate::providers::{gemini, groq, Embedder, GeminiClient, GroqClient, TextGenerator};
use crate::retrieval::NotesAnswerer;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: LecternConfig,
    pipeline: NotesPipeline,
    answerer: NotesAnswerer,
}

impl AppState {
    /// Build the state with the real providers. Missing or empty API
    /// keys fail here, at startup, instead of on the first request.
    pub fn new(config: LecternConfig) -> Result<Self> {
        let groq_key = require_env(groq::GROQ_API_KEY_ENV)?;
        let gemini_key = require_env(gemini::GEMINI_API_KEY_ENV)?;

        let groq_client = Arc::new(GroqClient::new(&config.providers.groq, groq_key)?);
        let gemini_client = Arc::new(GeminiClient::new(&config.providers.gemini, gemini_key)?);

        tracing::info!(
            "Providers ready: {} (notes), {} (markdown + embeddings)",
            groq_client.name(),
            TextGenerator::name(gemini_client.as_ref())
        );

        Ok(Self::with_providers(
            config,
            groq_client,
            gemini_client.clone(),
            gemini_client,
        ))
    }

    /// Build the state around explicit provider implementations. This
    /// is how tests inject mocks.
    pub fn with_providers(
        config: LecternConfig,
        notes_provider: Arc<dyn TextGenerator>,
        markdown_provider: Arc<dyn TextGenerator>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        let pipeline = NotesPipeline::new(
            notes_provider,
            markdown_provider.clone(),
            config.pipeline.clone(),
        );

        let answerer = NotesAnswerer::new(
            markdown_provider,
            embedder,
            config.retrieval.clone(),
            config.pipeline.chat.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                answerer,
            }),
        }
    }

    pub fn config(&self) -> &LecternConfig {
        &self.inner.config
    }

    pub fn pipeline(&self) -> &NotesPipeline {
        &self.inner.pipeline
    }

    pub fn answerer(&self) -> &NotesAnswerer {
        &self.inner.answerer
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("Environment variable {} is not set", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_env_missing() {
        let err = require_env("LECTERN_TEST_UNSET_VARIABLE").unwrap_err();
        assert!(err.to_string().contains("LECTERN_TEST_UNSET_VARIABLE"));
    }

    #[test]
    fn test_require_env_present() {
        std::env::set_var("LECTERN_TEST_PRESENT_VARIABLE", "value");
        assert_eq!(
            require_env("LECTERN_TEST_PRESENT_VARIABLE").unwrap(),
            "value"
        );
    }
}
