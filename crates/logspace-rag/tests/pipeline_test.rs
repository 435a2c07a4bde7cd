use logspace_core::{chunk_texts, ChunkConfig};
use logspace_rag::{Embedder, EmbeddingError, RagProcessor};
use std::sync::Arc;

// Counts a few marker words; enough to make retrieval order predictable
struct KeywordEmbedder;

const KEYWORDS: [&str; 4] = ["error", "timeout", "heartbeat", "unigy"];

impl Embedder for KeywordEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|t| {
                let lower = t.to_lowercase();
                KEYWORDS
                    .iter()
                    .map(|k| lower.matches(k).count() as f32 + 0.01)
                    .collect()
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "keywords"
    }
}

#[test]
fn test_chunk_then_analyze() {
    let error_log = "2024-01-01 - ERROR - Component=Monitor - Code: E_TIMEOUT - Pulse analytics computation timeout\n".repeat(10);
    let info_log = "2024-01-01 - INFO - Application=Pulse - Heartbeat received\n".repeat(10);
    let config = ChunkConfig::new(300, 50).unwrap();
    let chunks = chunk_texts(&[error_log, info_log], &config).unwrap();
    assert!(chunks.len() > 3);

    let processor = RagProcessor::new(Arc::new(KeywordEmbedder));
    let results = processor.analyze("timeout error", &chunks, 3).unwrap();

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.evidence.len(), 3);
    for pair in result.evidence.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for e in &result.evidence {
        assert!(e.score <= 1.0 + 1e-5);
    }
    // the best hit is an error chunk, not a heartbeat-only one
    assert!(result.evidence[0].text.contains("E_TIMEOUT"));
    assert!(result.answer.starts_with("RCA for: timeout error\n"));
    assert!(result.answer.contains("error occurrences across retrieved fragments."));
}
