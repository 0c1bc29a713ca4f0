//! Typed stage outputs and the notes pipeline
//!
//! Each stage output gets its own type so the stages can only be wired
//! in the order their data dependencies allow. Mixing up, say, the
//! refined text and the voice summary fails to compile instead of
//! producing subtly wrong notes.

use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::providers::TextGenerator;

use super::prompts;

/// File text after OCR/layout cleanup
#[derive(Debug, Clone)]
pub struct RefinedText(String);

/// Short structured summary of the voice transcript
#[derive(Debug, Clone)]
pub struct VoiceSummary(String);

/// Professor-style summary of the refined file text
#[derive(Debug, Clone)]
pub struct ProfessorSummary(String);

/// Final notes combining both summaries
#[derive(Debug, Clone)]
pub struct LectureNotes(String);

/// Final notes rendered as Markdown
#[derive(Debug, Clone)]
pub struct MarkdownNotes(String);

macro_rules! stage_output {
    ($name:ident) => {
        impl $name {
            pub fn new(text: String) -> Self {
                Self(text)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }
    };
}

stage_output!(RefinedText);
stage_output!(VoiceSummary);
stage_output!(ProfessorSummary);
stage_output!(LectureNotes);
stage_output!(MarkdownNotes);

/// Runs the five text-transformation stages over one lecture upload.
///
/// The voice transcript and the extracted file text enter independent
/// stages, which run concurrently; the remaining stages are ordered by
/// their data dependencies:
///
/// ```text
/// transcript ──> short summary ─────────────┐
/// file text ──> refine ──> professor ──> synthesis ──> markdown
/// ```
pub struct NotesPipeline {
    notes_provider: Arc<dyn TextGenerator>,
    markdown_provider: Arc<dyn TextGenerator>,
    config: PipelineConfig,
}

impl NotesPipeline {
    pub fn new(
        notes_provider: Arc<dyn TextGenerator>,
        markdown_provider: Arc<dyn TextGenerator>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            notes_provider,
            markdown_provider,
            config,
        }
    }

    /// Run the full pipeline: (file text, transcript) to Markdown notes.
    pub async fn run(&self, file_text: &str, transcript: &str) -> Result<MarkdownNotes> {
        let (voice, refined) = tokio::try_join!(
            self.short_summary(transcript),
            self.refine(file_text)
        )?;

        let professor = self.professor_summary(&refined).await?;
        let notes = self.synthesize(&professor, &voice).await?;
        self.to_markdown(&notes).await
    }

    /// Summarize the cleaned voice transcript.
    pub async fn short_summary(&self, text: &str) -> Result<VoiceSummary> {
        let stage = &self.config.short_summary;
        tracing::info!(
            "Summarizing transcript with {} ({} chars)",
            stage.model,
            text.len()
        );

        let output = self
            .notes_provider
            .generate(&stage.model, &prompts::short_summary_prompt(text), stage.params())
            .await?;

        Ok(VoiceSummary::new(output.trim().to_string()))
    }

    /// Clean layout noise out of the extracted file text.
    pub async fn refine(&self, raw_text: &str) -> Result<RefinedText> {
        let stage = &self.config.refine;
        tracing::info!(
            "Refining extracted text with {} ({} chars)",
            stage.model,
            raw_text.len()
        );

        let output = self
            .notes_provider
            .generate(&stage.model, &prompts::refine_prompt(raw_text), stage.params())
            .await?;

        Ok(RefinedText::new(output.trim().to_string()))
    }

    /// Summarize the refined text as what the professor taught.
    pub async fn professor_summary(&self, refined: &RefinedText) -> Result<ProfessorSummary> {
        let stage = &self.config.professor;
        tracing::info!("Building professor summary with {}", stage.model);

        let output = self
            .notes_provider
            .generate(
                &stage.model,
                &prompts::professor_summary_prompt(refined.as_str()),
                stage.params(),
            )
            .await?;

        Ok(ProfessorSummary::new(output.trim().to_string()))
    }

    /// Combine the professor summary and the voice summary into final notes.
    pub async fn synthesize(
        &self,
        professor: &ProfessorSummary,
        voice: &VoiceSummary,
    ) -> Result<LectureNotes> {
        let stage = &self.config.synthesis;
        tracing::info!("Synthesizing final notes with {}", stage.model);

        let output = self
            .notes_provider
            .generate(
                &stage.model,
                &prompts::synthesis_prompt(professor.as_str(), voice.as_str()),
                stage.params(),
            )
            .await?;

        Ok(LectureNotes::new(output.trim().to_string()))
    }

    /// Render the final notes as Markdown.
    pub async fn to_markdown(&self, notes: &LectureNotes) -> Result<MarkdownNotes> {
        let stage = &self.config.markdown;
        tracing::info!("Rendering Markdown with {}", stage.model);

        let output = self
            .markdown_provider
            .generate(&stage.model, &prompts::markdown_prompt(notes.as_str()), stage.params())
            .await?;

        Ok(MarkdownNotes::new(output.trim().to_string()))
    }
}
