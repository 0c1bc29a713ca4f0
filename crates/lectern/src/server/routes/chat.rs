//! Chat endpoint: answer questions about previously generated notes

use axum::extract::{Multipart, State};
use axum::Json;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::extraction::{self, TextExtractor};
use crate::server::state::AppState;
use crate::types::MessageResponse;

/// POST /chat-with-notes
///
/// Multipart form with a `file` field (the notes) and a `question`
/// field. The answer comes back in the same `{"status": 200,
/// "message": ...}` envelope as the lecture endpoint; degenerate files
/// produce fixed guidance messages, not errors.
pub async fn chat_with_notes(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>> {
    let mut question: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_request(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "question" => {
                let value = field.text().await.map_err(|e| {
                    Error::invalid_request(format!("Failed to read question field: {}", e))
                })?;
                question = Some(value);
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

    let question =
        question.ok_or_else(|| Error::invalid_request("Missing 'question' field"))?;
    let (filename, data) = file.ok_or_else(|| Error::invalid_request("Missing 'file' field"))?;

    tracing::info!("Answering question over {} ({} bytes)", filename, data.len());

    let upload = extraction::save_upload(&filename, &data)?;
    let notes_text = TextExtractor::extract_notes(&upload)?;

    let answer = state.answerer().answer(&notes_text, &question).await?;

    Ok(Json(MessageResponse::ok(answer)))
}
