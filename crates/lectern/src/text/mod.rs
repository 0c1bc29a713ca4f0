//! Text processing: sentence cleanup for transcripts, chunking for retrieval

pub mod chunker;
pub mod sentences;

pub use chunker::chunk_text;
pub use sentences::{dedupe_sentences, normalize_whitespace, prepare_sentences, split_sentences};
