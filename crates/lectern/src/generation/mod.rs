//! Prompt templates and the multi-stage notes pipeline

pub mod prompts;
pub mod stages;

pub use stages::{
    LectureNotes, MarkdownNotes, NotesPipeline, ProfessorSummary, RefinedText, VoiceSummary,
};
