//! Configuration for the lecture notes backend

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::providers::GenerationParams;

/// Config file looked up when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "lectern.toml";

/// Frontend origin allowed by default
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LecternConfig {
    pub server: ServerConfig,
    pub pipeline: PipelineConfig,
    pub providers: ProvidersConfig,
    pub retrieval: RetrievalConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origin allowed to call the API with credentials
    pub cors_origin: String,
    /// Maximum upload size in bytes
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Model and sampling settings for one pipeline stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Stream the response and accumulate it server-side
    pub stream: bool,
}

impl StageConfig {
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: self.stream,
        }
    }
}

/// Per-stage settings for the notes pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Short summary of the voice transcript
    pub short_summary: StageConfig,
    /// OCR/layout cleanup of the extracted file text
    pub refine: StageConfig,
    /// Professor-style summary of the refined text
    pub professor: StageConfig,
    /// Final notes combining both summaries
    pub synthesis: StageConfig,
    /// Markdown rendering of the final notes
    pub markdown: StageConfig,
    /// Question answering over retrieved note chunks
    pub chat: StageConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            short_summary: StageConfig {
                model: "openai/gpt-oss-120b".to_string(),
                temperature: 0.5,
                max_tokens: 1024,
                stream: true,
            },
            refine: StageConfig {
                model: "meta-llama/llama-4-maverick-17b-128e-instruct".to_string(),
                temperature: 0.0,
                max_tokens: 2048,
                stream: false,
            },
            professor: StageConfig {
                model: "openai/gpt-oss-120b".to_string(),
                temperature: 0.2,
                max_tokens: 1024,
                stream: false,
            },
            synthesis: StageConfig {
                model: "openai/gpt-oss-120b".to_string(),
                temperature: 0.3,
                max_tokens: 2048,
                stream: false,
            },
            markdown: StageConfig {
                model: "gemini-2.5-flash".to_string(),
                temperature: 0.2,
                max_tokens: 3000,
                stream: false,
            },
            chat: StageConfig {
                model: "gemini-2.5-flash".to_string(),
                temperature: 0.2,
                max_tokens: 1024,
                stream: false,
            },
        }
    }
}

/// Settings for the upstream model providers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub gemini: GeminiConfig,
    pub groq: GroqConfig,
}

/// Google Gemini API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    pub embed_model: String,
    pub embed_dimensions: usize,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            embed_model: "text-embedding-004".to_string(),
            embed_dimensions: 768,
            timeout_secs: 120,
        }
    }
}

/// Groq API settings (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroqConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Settings for chunking and nearest-neighbor search over notes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Chunk window in characters
    pub chunk_size: usize,
    /// Number of chunks retrieved per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            top_k: 3,
        }
    }
}

impl LecternConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Load from the given path, or from `lectern.toml` if present,
    /// or fall back to defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(Path::new(p)),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LecternConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.cors_origin, "http://localhost:3000");
        assert_eq!(config.retrieval.chunk_size, 500);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.providers.gemini.embed_dimensions, 768);
        assert_eq!(config.pipeline.short_summary.model, "openai/gpt-oss-120b");
        assert!(config.pipeline.short_summary.stream);
        assert_eq!(config.pipeline.refine.temperature, 0.0);
        assert_eq!(config.pipeline.markdown.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: LecternConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [retrieval]
            top_k = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0"); // untouched default
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.chunk_size, 500);
        assert_eq!(config.pipeline.synthesis.max_tokens, 2048);
    }

    #[test]
    fn test_stage_override() {
        let config: LecternConfig = toml::from_str(
            r#"
            [pipeline.refine]
            model = "llama-3.3-70b-versatile"
            temperature = 0.1
            max_tokens = 4096
            stream = false
            "#,
        )
        .unwrap();

        assert_eq!(config.pipeline.refine.model, "llama-3.3-70b-versatile");
        assert_eq!(config.pipeline.refine.max_tokens, 4096);
        // other stages keep their defaults
        assert_eq!(config.pipeline.professor.max_tokens, 1024);
    }

    #[test]
    fn test_stage_params() {
        let config = LecternConfig::default();
        let params = config.pipeline.short_summary.params();
        assert_eq!(params.temperature, 0.5);
        assert_eq!(params.max_tokens, 1024);
        assert!(params.stream);
    }
}
