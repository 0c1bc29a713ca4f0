//! Question answering grounded in uploaded notes

use std::sync::Arc;

use crate::config::{RetrievalConfig, StageConfig};
use crate::error::Result;
use crate::generation::prompts;
use crate::providers::{Embedder, TextGenerator};
use crate::text;

use super::index::FlatIndex;

/// Returned when the uploaded file has no extractable text
pub const NO_TEXT_MESSAGE: &str = "No text content found in the uploaded file. If this is a scanned image PDF, please upload a text-based PDF or provide typed notes.";

/// Returned when chunking produced nothing to index
pub const NO_CHUNKS_MESSAGE: &str = "Could not create chunks from the file. Please try another file.";

/// Returned when embedding the note chunks failed
pub const EMBEDDING_FAILED_MESSAGE: &str = "Embedding failed for the provided file. Please try another file.";

/// Returned when the embedder produced no vectors
pub const NO_EMBEDDINGS_MESSAGE: &str = "No embeddings generated from the notes.";

/// Chunks uploaded notes, retrieves the closest chunks to a question
/// and answers strictly from them.
pub struct NotesAnswerer {
    generator: Arc<dyn TextGenerator>,
    embedder: Arc<dyn Embedder>,
    retrieval: RetrievalConfig,
    chat: StageConfig,
}

impl NotesAnswerer {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        embedder: Arc<dyn Embedder>,
        retrieval: RetrievalConfig,
        chat: StageConfig,
    ) -> Self {
        Self {
            generator,
            embedder,
            retrieval,
            chat,
        }
    }

    /// Answer a question over the uploaded notes.
    ///
    /// Degenerate inputs come back as fixed guidance messages with
    /// success status instead of errors; the student reads them in the
    /// chat window like any other answer.
    pub async fn answer(&self, notes_text: &str, question: &str) -> Result<String> {
        if notes_text.trim().is_empty() {
            return Ok(NO_TEXT_MESSAGE.to_string());
        }

        let chunks = text::chunk_text(notes_text, self.retrieval.chunk_size);
        if chunks.is_empty() {
            return Ok(NO_CHUNKS_MESSAGE.to_string());
        }

        let embeddings = match self.embedder.embed_batch(&chunks).await {
            Ok(embeddings) => embeddings,
            Err(e) => {
                tracing::warn!("Embedding notes failed: {}", e);
                return Ok(EMBEDDING_FAILED_MESSAGE.to_string());
            }
        };
        if embeddings.is_empty() {
            return Ok(NO_EMBEDDINGS_MESSAGE.to_string());
        }

        let mut index = FlatIndex::new(self.embedder.dimensions());
        index.add(embeddings)?;

        let query = self.embedder.embed(question).await?;
        let top_k = self.retrieval.top_k.min(chunks.len());
        let hits = index.search(&query, top_k);

        let context = hits
            .iter()
            .filter_map(|&(i, _)| chunks.get(i).map(|chunk| chunk.as_str()))
            .collect::<Vec<_>>()
            .join(" ");

        tracing::info!(
            "Answering from {} of {} chunks with {}",
            hits.len(),
            chunks.len(),
            self.chat.model
        );

        self.generator
            .generate(
                &self.chat.model,
                &prompts::chat_prompt(&context, question),
                self.chat.params(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::Error;
    use crate::providers::GenerationParams;

    struct StubGenerator {
        last_prompt: Mutex<Option<String>>,
    }

    impl StubGenerator {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(
            &self,
            _model: &str,
            prompt: &str,
            _params: GenerationParams,
        ) -> Result<String> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            Ok("stub answer".to_string())
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct StubEmbedder {
        batch_result: Option<Vec<Vec<f32>>>,
        query: Vec<f32>,
        calls: AtomicUsize,
    }

    impl StubEmbedder {
        fn new(batch_result: Option<Vec<Vec<f32>>>, query: Vec<f32>) -> Arc<Self> {
            Arc::new(Self {
                batch_result,
                query,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.query.clone())
        }

        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.batch_result
                .clone()
                .ok_or_else(|| Error::embedding("stub batch failure"))
        }

        fn dimensions(&self) -> usize {
            1
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn answerer(
        generator: Arc<StubGenerator>,
        embedder: Arc<StubEmbedder>,
        retrieval: RetrievalConfig,
    ) -> NotesAnswerer {
        let chat = crate::config::PipelineConfig::default().chat;
        NotesAnswerer::new(generator, embedder, retrieval, chat)
    }

    #[test]
    fn test_empty_notes_fixed_message() {
        let generator = StubGenerator::new();
        let embedder = StubEmbedder::new(Some(vec![]), vec![0.0]);
        let answerer = answerer(generator, embedder.clone(), RetrievalConfig::default());

        let answer = tokio_test::block_on(answerer.answer("   \n ", "question")).unwrap();
        assert_eq!(answer, NO_TEXT_MESSAGE);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_chunk_size_fixed_message() {
        let generator = StubGenerator::new();
        let embedder = StubEmbedder::new(Some(vec![]), vec![0.0]);
        let retrieval = RetrievalConfig {
            chunk_size: 0,
            top_k: 3,
        };
        let answerer = answerer(generator, embedder.clone(), retrieval);

        let answer = tokio_test::block_on(answerer.answer("some notes", "question")).unwrap();
        assert_eq!(answer, NO_CHUNKS_MESSAGE);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_embedding_failure_fixed_message() {
        let generator = StubGenerator::new();
        let embedder = StubEmbedder::new(None, vec![0.0]);
        let answerer = answerer(generator, embedder, RetrievalConfig::default());

        let answer = tokio_test::block_on(answerer.answer("some notes", "question")).unwrap();
        assert_eq!(answer, EMBEDDING_FAILED_MESSAGE);
    }

    #[test]
    fn test_empty_embeddings_fixed_message() {
        let generator = StubGenerator::new();
        let embedder = StubEmbedder::new(Some(vec![]), vec![0.0]);
        let answerer = answerer(generator, embedder, RetrievalConfig::default());

        let answer = tokio_test::block_on(answerer.answer("some notes", "question")).unwrap();
        assert_eq!(answer, NO_EMBEDDINGS_MESSAGE);
    }

    #[test]
    fn test_answer_builds_context_from_closest_chunks() {
        let generator = StubGenerator::new();
        // chunk embeddings 0.0, 1.0, 2.0; query 1.9 ranks CCCC then BBBB
        let embedder = StubEmbedder::new(
            Some(vec![vec![0.0], vec![1.0], vec![2.0]]),
            vec![1.9],
        );
        let retrieval = RetrievalConfig {
            chunk_size: 4,
            top_k: 2,
        };
        let answerer = answerer(generator.clone(), embedder, retrieval);

        let answer =
            tokio_test::block_on(answerer.answer("AAAABBBBCCCC", "What is ATP?")).unwrap();
        assert_eq!(answer, "stub answer");

        let prompt = generator.last_prompt.lock().unwrap().clone().unwrap();
        assert_eq!(prompt, prompts::chat_prompt("CCCC BBBB", "What is ATP?"));
    }

    #[test]
    fn test_top_k_capped_at_chunk_count() {
        let generator = StubGenerator::new();
        let embedder = StubEmbedder::new(Some(vec![vec![0.0]]), vec![0.0]);
        let answerer = answerer(generator.clone(), embedder, RetrievalConfig::default());

        // one chunk, default top_k of 3
        tokio_test::block_on(answerer.answer("only chunk", "question")).unwrap();

        let prompt = generator.last_prompt.lock().unwrap().clone().unwrap();
        assert_eq!(prompt, prompts::chat_prompt("only chunk", "question"));
    }
}
