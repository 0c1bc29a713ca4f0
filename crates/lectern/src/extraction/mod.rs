//! Upload handling and text extraction for lecture files

pub mod parser;
pub mod upload;

pub use parser::{FileKind, TextExtractor};
pub use upload::{save_upload, SavedUpload};
