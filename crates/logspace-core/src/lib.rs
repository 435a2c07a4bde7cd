//! Core types for the LogSpace RCA pipeline
//! this crate holds the shared data structures plus the chunker and the log locator.
pub mod chunker;
pub mod locator;

pub use chunker::{chunk_texts, ChunkConfig, ChunkError};
pub use locator::{locate_and_read_logs, locate_logs, LocatedLog};

use serde::{Deserialize, Serialize};
use std::path::Path;

// LOG KIND //

/// Kind of log file, decided by its suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Error,
    Info,
}

impl LogKind {
    /// Classify a file by name, `None` for anything that is not `.error` or `.info`
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(".error") {
            Some(Self::Error)
        } else if name.ends_with(".info") {
            Some(Self::Info)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Error => "error",
            LogKind::Info => "info",
        }
    }
}

// RETRIEVAL RESULTS //

/// One retrieved chunk with its cosine similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedEvidence {
    pub score: f32,
    pub text: String,
}

impl RetrievedEvidence {
    pub fn new(score: f32, text: impl Into<String>) -> Self {
        Self {
            score,
            text: text.into(),
        }
    }
}

/// Terminal output of one analysis: the narrative plus the evidence it cites
/// evidence is ordered by descending score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub answer: String,
    pub evidence: Vec<RetrievedEvidence>,
}
