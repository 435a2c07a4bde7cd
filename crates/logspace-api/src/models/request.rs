use serde::Deserialize;

/// Body of `POST /analyze`
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub client: String,
    pub logspace: String, // application name like Unigy
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    // signed so that negative values reach validation instead of failing to parse
    pub top_k: Option<i64>,
    // pasted log text; when present it replaces the folder search
    #[serde(default)]
    pub uploaded_log_text: Option<String>,
}

impl AnalyzeRequest {
    /// Retrieval query: application, version and timestamp, skipping the missing ones
    pub fn query_text(&self) -> String {
        [Some(self.logspace.as_str()), self.version.as_deref(), self.timestamp.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Requested `top_k`, or `default` when omitted. `None` when the value is not positive.
    pub fn effective_top_k(&self, default: usize) -> Option<usize> {
        match self.top_k {
            None => Some(default),
            Some(k) if k > 0 => usize::try_from(k).ok(),
            Some(_) => None,
        }
    }

    /// Uploaded text, if any non-blank text was supplied
    pub fn uploaded_text(&self) -> Option<&str> {
        self.uploaded_log_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}
