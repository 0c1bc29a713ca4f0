//! Error types for the lecture notes backend

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File parsing error for {filename}: {message}")]
    FileParse { filename: String, message: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::FileParse { filename, message } => (
                StatusCode::BAD_REQUEST,
                "parse_error",
                format!("{}: {}", filename, message),
            ),
            Error::UnsupportedFileType(ext) => {
                (StatusCode::BAD_REQUEST, "unsupported_file_type", ext.clone())
            }
            Error::Embedding(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error", msg.clone()),
            Error::Generation(msg) => (StatusCode::SERVICE_UNAVAILABLE, "generation_error", msg.clone()),
            Error::Index(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "index_error", msg.clone()),
            Error::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg.clone()),
            Error::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error", e.to_string()),
            Error::Json(e) => (StatusCode::BAD_REQUEST, "json_error", e.to_string()),
            Error::Http(e) => (StatusCode::BAD_GATEWAY, "http_error", e.to_string()),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone()),
        };

        tracing::error!("Request failed: {} ({})", message, error_type);

        // The frontend matches the unsupported-type body verbatim, so that
        // one stays a flat string instead of the nested envelope.
        let body = match &self {
            Error::UnsupportedFileType(_) => Json(json!({ "error": "Unsupported file type" })),
            _ => Json(json!({
                "error": {
                    "type": error_type,
                    "message": message,
                }
            })),
        };

        (status, body).into_response()
    }
}
