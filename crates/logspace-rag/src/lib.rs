// LogSpace RAG - chunk retrieval and RCA synthesis over request-scoped log text

pub mod embedding;
pub mod index;
pub mod processor;
pub mod summary;

pub use embedding::{
    Embedder, EmbeddingError, EmbeddingMode, EmbeddingProvider, EmbeddingSettings, LocalEmbedder, RemoteEmbedder,
};
pub use index::{IndexError, VectorIndex};
pub use processor::{RagError, RagProcessor};
pub use summary::{count_error_mentions, summarize};
