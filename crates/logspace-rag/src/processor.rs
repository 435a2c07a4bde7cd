// RAG processor
// Orchestrates: Chunk embedding -> Fresh index -> Query embedding -> Top-k search -> Templated RCA

use std::sync::Arc;
use std::time::Instant;

use logspace_core::{AnalysisResult, RetrievedEvidence};
use thiserror::Error;
use tracing::{debug, info};

use crate::embedding::{Embedder, EmbeddingError};
use crate::index::{IndexError, VectorIndex};
use crate::summary::summarize;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RagError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("top_k must be a positive integer")]
    InvalidTopK,

    #[error("No log chunks to analyze")]
    NoChunks,

    #[error("Embedding backend returned {found} vectors for {expected} inputs")]
    EmbeddingCountMismatch { expected: usize, found: usize },
}

/// Main RAG processor.
///
/// Holds only the process-wide embedding backend; every call to [`analyze`]
/// builds and drops its own index, so concurrent calls share nothing else.
///
/// [`analyze`]: RagProcessor::analyze
#[derive(Clone)]
pub struct RagProcessor {
    embedder: Arc<dyn Embedder>,
}

impl RagProcessor {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Retrieve the `top_k` chunks most similar to `query`, best first
    pub fn retrieve(&self, query: &str, chunks: &[String], top_k: usize) -> Result<Vec<RetrievedEvidence>, RagError> {
        if top_k == 0 {
            return Err(RagError::InvalidTopK);
        }
        if chunks.is_empty() {
            return Err(RagError::NoChunks);
        }

        let chunk_vectors = self.embedder.embed(chunks)?;
        if chunk_vectors.len() != chunks.len() {
            return Err(RagError::EmbeddingCountMismatch {
                expected: chunks.len(),
                found: chunk_vectors.len(),
            });
        }

        let index = VectorIndex::build(&chunk_vectors)?;
        debug!(vectors = index.len(), dim = index.dim(), "Index built");

        let query_vector = self.embedder.embed_one(query)?;
        let hits = index.search(&query_vector, top_k)?;

        Ok(hits
            .into_iter()
            .map(|(score, position)| RetrievedEvidence::new(score, chunks[position].clone()))
            .collect())
    }

    /// Run the whole pipeline and wrap the answer as a single-element result list
    pub fn analyze(&self, query: &str, chunks: &[String], top_k: usize) -> Result<Vec<AnalysisResult>, RagError> {
        let start = Instant::now();
        info!(query = %query, chunks = chunks.len(), top_k, "RAG analysis started");

        let evidence = self.retrieve(query, chunks, top_k)?;
        let answer = summarize(query, &evidence);

        info!(
            evidence = evidence.len(),
            model = %self.model_name(),
            time_ms = start.elapsed().as_millis() as u64,
            "RAG analysis complete"
        );

        Ok(vec![AnalysisResult { answer, evidence }])
    }
}
