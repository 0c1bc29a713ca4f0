//! Model provider abstractions and clients
//!
//! The pipeline talks to providers only through the [`TextGenerator`]
//! and [`Embedder`] traits, so stages can be rewired or mocked without
//! touching the stage logic.

pub mod embedder;
pub mod gemini;
pub mod generator;
pub mod groq;

pub use embedder::Embedder;
pub use gemini::GeminiClient;
pub use generator::{GenerationParams, TextGenerator};
pub use groq::GroqClient;
