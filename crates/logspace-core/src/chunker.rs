//! Sliding-window chunker
//!
//! Joins every raw log text of a request with a blank line and cuts the result
//! into fixed-size character windows that overlap their predecessor.
//! Boundaries are character offsets only, no semantic splitting.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator placed between input texts so unrelated files never run together
pub const SEPARATOR: &str = "\n\n";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("invalid chunking parameters: chunk_size={chunk_size}, overlap={overlap} (need chunk_size > 0 and overlap < chunk_size)")]
    InvalidConfig { chunk_size: usize, overlap: usize },
}

/// Window width and overlap, both counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ChunkError> {
        let config = Self {
            chunk_size,
            overlap,
        };
        config.validate()?;
        Ok(config)
    }

    /// overlap >= chunk_size would never advance the window
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.chunk_size == 0 || self.overlap >= self.chunk_size {
            return Err(ChunkError::InvalidConfig {
                chunk_size: self.chunk_size,
                overlap: self.overlap,
            });
        }
        Ok(())
    }

    /// Distance between two consecutive window starts
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

/// Concatenate `texts` and split them into overlapping windows.
///
/// Returns an empty vec when the concatenation is empty, a single chunk when it
/// fits in one window, otherwise one chunk per window start `0, stride, 2*stride, ..`
/// below the text length. Only trailing chunks can be shorter than `chunk_size`.
pub fn chunk_texts(texts: &[String], config: &ChunkConfig) -> Result<Vec<String>, ChunkError> {
    config.validate()?;
    let joined = texts.join(SEPARATOR);
    let chunks = split_windows(&joined, config);

    tracing::debug!(
        inputs = texts.len(),
        chars = joined.chars().count(),
        chunks = chunks.len(),
        "Chunked log text"
    );
    Ok(chunks)
}

fn split_windows(text: &str, config: &ChunkConfig) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    // byte offset of every char, plus a sentinel for the end of the text
    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let len = bounds.len();
    bounds.push(text.len());

    if len <= config.chunk_size {
        return vec![text.to_string()];
    }

    let stride = config.stride();
    let mut chunks = Vec::with_capacity(len / stride + 1);
    let mut start = 0;
    while start < len {
        let end = (start + config.chunk_size).min(len);
        chunks.push(text[bounds[start]..bounds[end]].to_string());
        start += stride;
    }
    chunks
}
