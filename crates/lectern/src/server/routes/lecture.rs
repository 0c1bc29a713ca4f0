//! Lecture endpoint: turn an upload plus transcript into Markdown notes

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::extraction::{self, FileKind, TextExtractor};
use crate::server::state::AppState;
use crate::text;
use crate::types::MessageResponse;

/// Shape of the `text` field when the frontend sends it JSON-encoded
#[derive(Debug, Deserialize)]
struct TranscriptField {
    #[serde(default)]
    text: String,
}

/// POST /lecture/clean
///
/// Multipart form with a `text` field (the voice transcript) and a
/// `file` field (PDF or PPTX). Responds with the generated Markdown
/// notes in a `{"status": 200, "message": ...}` envelope.
pub async fn clean_lecture(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>> {
    let mut transcript: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_request(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "text" => {
                let value = field.text().await.map_err(|e| {
                    Error::invalid_request(format!("Failed to read text field: {}", e))
                })?;
                transcript = Some(value);
            }
            "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("upload_{}.bin", Uuid::new_v4()));
                let data = field.bytes().await.map_err(|e| {
                    Error::invalid_request(format!("Failed to read file field: {}", e))
                })?;
                file = Some((filename, data.to_vec()));
            }
            other => {
                tracing::debug!("Ignoring unknown multipart field: {}", other);
            }
        }
    }

    let transcript =
        transcript.ok_or_else(|| Error::invalid_request("Missing 'text' field"))?;
    let (filename, data) = file.ok_or_else(|| Error::invalid_request("Missing 'file' field"))?;

    // Reject unsupported formats before anything touches disk or a provider.
    if FileKind::from_filename(&filename).is_none() {
        let extension = std::path::Path::new(&filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        return Err(Error::UnsupportedFileType(extension));
    }

    tracing::info!("Processing lecture upload: {} ({} bytes)", filename, data.len());

    let transcript = parse_transcript_field(&transcript);

    let upload = extraction::save_upload(&filename, &data)?;
    let file_text = TextExtractor::extract(&upload)?;

    let sentences = text::prepare_sentences(&transcript);
    tracing::debug!("Transcript cleaned to {} unique sentences", sentences.len());
    let transcript_text = sentences.join(" ");

    let markdown = state.pipeline().run(&file_text, &transcript_text).await?;

    Ok(Json(MessageResponse::ok(markdown.into_inner())))
}

/// The `text` field may arrive either as the raw transcript or as a
/// JSON object like `{"text": "..."}`. Anything that does not parse as
/// that object is treated as the literal transcript.
fn parse_transcript_field(raw: &str) -> String {
    match serde_json::from_str::<TranscriptField>(raw) {
        Ok(parsed) => parsed.text,
        Err(_) => raw.to_string(),
    }
}
