//! API route definitions

pub mod chat;
pub mod lecture;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::server::state::AppState;

/// Lecture processing routes, mounted under `/lecture`
pub fn lecture_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new().route(
        "/clean",
        post(lecture::clean_lecture).layer(DefaultBodyLimit::max(max_upload_size)),
    )
}

/// Chat routes, mounted at the root
pub fn chat_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new().route(
        "/chat-with-notes",
        post(chat::chat_with_notes).layer(DefaultBodyLimit::max(max_upload_size)),
    )
}
