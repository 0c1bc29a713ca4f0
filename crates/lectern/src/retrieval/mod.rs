//! Chunk retrieval and grounded question answering over notes

pub mod answer;
pub mod index;

pub use answer::NotesAnswerer;
pub use index::FlatIndex;
