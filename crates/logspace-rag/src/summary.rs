// Evidence-grounded RCA narrative
// Deterministic template standing in for a generative model call:
// same evidence in, same text out.

use logspace_core::RetrievedEvidence;

/// Characters of each chunk quoted in the answer
pub const EXCERPT_CHARS: usize = 500;

const NO_ERRORS: &str = "No critical errors detected in the retrieved logs.";
const PROBABLE_CAUSES: &str =
    "Probable causes include component instability or network/API failures; check the evidence below.";
const SUGGESTED_ACTIONS: &str =
    "Suggested actions: Verify configuration, check connectivity, restart affected services.";

/// Case-insensitive count of "error" across every evidence text
pub fn count_error_mentions(evidence: &[RetrievedEvidence]) -> usize {
    evidence
        .iter()
        .map(|e| e.text.to_lowercase().matches("error").count())
        .sum()
}

fn excerpt(text: &str) -> String {
    text.chars()
        .take(EXCERPT_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

/// Build the RCA answer for `query` from the retrieved evidence, in retrieval order
pub fn summarize(query: &str, evidence: &[RetrievedEvidence]) -> String {
    let mut lines = vec![format!("RCA for: {}", query), String::new()];
    lines.push("Summary:".to_string());

    let total_errors = count_error_mentions(evidence);
    if total_errors == 0 {
        lines.push(NO_ERRORS.to_string());
    } else {
        lines.push(format!(
            "Detected {} error occurrences across retrieved fragments.",
            total_errors
        ));
        lines.push(PROBABLE_CAUSES.to_string());
    }

    lines.push(String::new());
    lines.push("Evidence excerpts:".to_string());
    for (i, e) in evidence.iter().enumerate() {
        lines.push(format!("{}. (score: {:.3}) {}...", i + 1, e.score, excerpt(&e.text)));
    }

    lines.push(String::new());
    lines.push(SUGGESTED_ACTIONS.to_string());
    lines.join("\n")
}
