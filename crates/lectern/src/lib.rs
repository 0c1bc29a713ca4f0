//! Lectern: a lecture notes backend
//!
//! Turns an uploaded lecture file (PDF or PPTX) plus a voice transcript
//! into Markdown study notes through a staged generation pipeline, and
//! answers questions about previously generated notes using
//! embedding-based retrieval.
//!
//! The crate is organized around the request flow:
//!
//! - [`extraction`] persists uploads and pulls text out of them
//! - [`text`] cleans transcripts and chunks notes
//! - [`providers`] holds the model provider traits and clients
//! - [`generation`] wires the prompt stages into a pipeline
//! - [`retrieval`] embeds, indexes and answers over note chunks
//! - [`server`] exposes everything over HTTP

pub mod config;
pub mod error;
pub mod extraction;
pub mod generation;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod text;
pub mod types;

pub use config::LecternConfig;
pub use error::{Error, Result};
pub use server::{AppState, LecternServer};
pub use types::MessageResponse;
