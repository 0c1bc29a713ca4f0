//! Groq client: OpenAI-compatible chat completions with SSE streaming

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use crate::config::GroqConfig;
use crate::error::{Error, Result};

use super::generator::{GenerationParams, TextGenerator};

/// Environment variable holding the Groq API key
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Client for the Groq chat completions API
pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_completion_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

/// Extract the delta text from one SSE line, if it carries any.
///
/// Lines look like `data: {json}`; the terminator is `data: [DONE]`.
/// Anything that is not a well-formed data line is skipped.
fn sse_delta(line: &str) -> Option<String> {
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return None;
    }

    let chunk: StreamChunk = serde_json::from_str(payload).ok()?;
    chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
}

impl GroqClient {
    /// Create a client. Fails immediately when the API key is empty so
    /// a misconfigured deployment dies at startup, not mid-request.
    pub fn new(config: &GroqConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config(format!(
                "Groq API key is empty (set {})",
                GROQ_API_KEY_ENV
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation(format!(
                "Groq API error {}: {}",
                status, body
            )));
        }

        Ok(response)
    }

    async fn generate_blocking(&self, request: &ChatRequest) -> Result<String> {
        let response = self.send(request).await?;
        let response: ChatResponse = response.json().await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(content)
    }

    /// Consume an SSE stream and accumulate the deltas into one string.
    /// The caller gets the complete text; nothing is forwarded chunk by
    /// chunk.
    async fn generate_streamed(&self, request: &ChatRequest) -> Result<String> {
        let response = self.send(request).await?;

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut output = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| Error::generation(format!("Groq stream error: {}", e)))?;
            buffer.extend_from_slice(&chunk);

            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&line);
                if let Some(delta) = sse_delta(line.trim()) {
                    output.push_str(&delta);
                }
            }
        }

        if !buffer.is_empty() {
            let line = String::from_utf8_lossy(&buffer);
            if let Some(delta) = sse_delta(line.trim()) {
                output.push_str(&delta);
            }
        }

        Ok(output)
    }
}

#[async_trait]
impl TextGenerator for GroqClient {
    async fn generate(&self, model: &str, prompt: &str, params: GenerationParams) -> Result<String> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: params.temperature,
            max_completion_tokens: params.max_tokens,
            stream: params.stream,
        };

        if params.stream {
            self.generate_streamed(&request).await
        } else {
            self.generate_blocking(&request).await
        }
    }

    fn name(&self) -> &str {
        "groq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_rejected() {
        let config = GroqConfig::default();
        assert!(GroqClient::new(&config, String::new()).is_err());
        assert!(GroqClient::new(&config, "key".to_string()).is_ok());
    }

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            model: "openai/gpt-oss-120b".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            temperature: 0.5,
            max_completion_tokens: 1024,
            stream: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "openai/gpt-oss-120b");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_completion_tokens"], 1024);
        assert_eq!(json["stream"], true);
    }

    #[test]
    fn test_sse_delta_extracts_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#;
        assert_eq!(sse_delta(line), Some("Hello".to_string()));
    }

    #[test]
    fn test_sse_delta_skips_done_and_noise() {
        assert_eq!(sse_delta("data: [DONE]"), None);
        assert_eq!(sse_delta("data:"), None);
        assert_eq!(sse_delta(": keep-alive comment"), None);
        assert_eq!(sse_delta(""), None);
        assert_eq!(sse_delta("data: not json"), None);
        // role-only first chunk carries no content
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(sse_delta(line), None);
    }

    #[test]
    fn test_sse_delta_accumulation() {
        let lines = [
            r#"data: {"choices":[{"delta":{"content":"The "}}]}"#,
            r#"data: {"choices":[{"delta":{"content":"mitochondria"}}]}"#,
            "data: [DONE]",
        ];
        let text: String = lines.iter().filter_map(|l| sse_delta(l)).collect();
        assert_eq!(text, "The mitochondria");
    }

    #[test]
    fn test_chat_response_parsing() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"answer"}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        assert_eq!(content, "answer");
    }
}
