// Embedding providers
// text -> fixed-length vector, either with an in-process model or a hosted service

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingError {
    #[error("Failed to load embedding model '{model}': {reason}")]
    ModelLoad { model: String, reason: String },

    #[error("Unknown embedding model: '{0}'. Supported models: all-minilm-l6-v2, bge-small-en-v1.5, bge-base-en-v1.5")]
    UnknownModel(String),

    #[error("Unknown embedding mode: '{0}' (expected 'local' or 'remote')")]
    UnknownMode(String),

    #[error("Remote embedding backend is not implemented")]
    NotImplemented,

    #[error("Embedding failed: {0}")]
    Failed(String),

    #[error("Embedding model lock poisoned")]
    LockPoisoned,
}

/// Anything that turns text into vectors.
///
/// One vector per input, in input order, all of the same dimension for a given
/// instance. Implementations must be safe to call from several request threads.
pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Model identifier, for logs
    fn model_name(&self) -> &str;

    fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Failed("empty embedding response".to_string()))
    }
}

/// Which backend to construct at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMode {
    #[default]
    Local,
    #[serde(alias = "bedrock")]
    Remote,
}

impl FromStr for EmbeddingMode {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(EmbeddingMode::Local),
            "remote" | "bedrock" => Ok(EmbeddingMode::Remote),
            other => Err(EmbeddingError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for EmbeddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingMode::Local => write!(f, "local"),
            EmbeddingMode::Remote => write!(f, "remote"),
        }
    }
}

// Embedding configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub mode: EmbeddingMode,
    pub model: String,
    /// only read by the remote backend
    pub remote_endpoint: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            mode: EmbeddingMode::Local,
            model: "all-minilm-l6-v2".to_string(),
            remote_endpoint: String::new(),
        }
    }
}

fn fastembed_model(name: &str) -> Result<EmbeddingModel, EmbeddingError> {
    match name {
        "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        other => Err(EmbeddingError::UnknownModel(other.to_string())),
    }
}

/// In-process sentence encoder.
///
/// fastembed needs `&mut` access to run inference, so the model sits behind a
/// mutex held only for the duration of one `embed` call.
pub struct LocalEmbedder {
    model: Mutex<TextEmbedding>,
    model_name: String,
}

impl LocalEmbedder {
    /// Load the model, downloading it on first use. Fails fast if it cannot be loaded.
    pub fn new(model_name: &str) -> Result<Self, EmbeddingError> {
        let model = fastembed_model(model_name)?;

        info!(model = model_name, "Loading embedding model...");
        let model = TextEmbedding::try_new(InitOptions::new(model).with_show_download_progress(false))
            .map_err(|e| EmbeddingError::ModelLoad {
                model: model_name.to_string(),
                reason: e.to_string(),
            })?;
        info!(model = model_name, "Model loaded!");

        Ok(Self {
            model: Mutex::new(model),
            model_name: model_name.to_string(),
        })
    }
}

impl Embedder for LocalEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut model = self.model.lock().map_err(|_| EmbeddingError::LockPoisoned)?;
        let embeddings = model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::Failed(e.to_string()))?;

        debug!(count = embeddings.len(), model = %self.model_name, "Embedded texts");
        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Hosted embedding service placeholder.
///
/// Construction succeeds so the process can start, but every call fails with
/// [`EmbeddingError::NotImplemented`]. Callers must treat that as permanent.
#[derive(Debug, Clone)]
pub struct RemoteEmbedder {
    endpoint: String,
    model: String,
}

impl RemoteEmbedder {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Embedder for RemoteEmbedder {
    fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::NotImplemented)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// The embedding backend, chosen once per process
pub enum EmbeddingProvider {
    Local(LocalEmbedder),
    Remote(RemoteEmbedder),
}

impl EmbeddingProvider {
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self, EmbeddingError> {
        match settings.mode {
            EmbeddingMode::Local => Ok(EmbeddingProvider::Local(LocalEmbedder::new(&settings.model)?)),
            EmbeddingMode::Remote => {
                let remote = RemoteEmbedder::new(settings.remote_endpoint.clone(), settings.model.clone());
                info!(endpoint = %remote.endpoint(), "Remote embedding backend selected (not implemented)");
                Ok(EmbeddingProvider::Remote(remote))
            }
        }
    }

    pub fn mode(&self) -> EmbeddingMode {
        match self {
            EmbeddingProvider::Local(_) => EmbeddingMode::Local,
            EmbeddingProvider::Remote(_) => EmbeddingMode::Remote,
        }
    }
}

impl Embedder for EmbeddingProvider {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        match self {
            EmbeddingProvider::Local(local) => local.embed(texts),
            EmbeddingProvider::Remote(remote) => remote.embed(texts),
        }
    }

    fn model_name(&self) -> &str {
        match self {
            EmbeddingProvider::Local(local) => local.model_name(),
            EmbeddingProvider::Remote(remote) => remote.model_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("local".parse::<EmbeddingMode>(), Ok(EmbeddingMode::Local));
        assert_eq!(" Remote ".parse::<EmbeddingMode>(), Ok(EmbeddingMode::Remote));
        assert_eq!("bedrock".parse::<EmbeddingMode>(), Ok(EmbeddingMode::Remote));
        assert_eq!(
            "openai".parse::<EmbeddingMode>(),
            Err(EmbeddingError::UnknownMode("openai".to_string()))
        );
    }

    #[test]
    fn test_remote_always_not_implemented() {
        let settings = EmbeddingSettings {
            mode: EmbeddingMode::Remote,
            model: "titan-embed".to_string(),
            remote_endpoint: "https://embeddings.example.com".to_string(),
        };
        let provider = EmbeddingProvider::from_settings(&settings).unwrap();
        assert_eq!(provider.mode(), EmbeddingMode::Remote);
        assert_eq!(provider.model_name(), "titan-embed");
        match &provider {
            EmbeddingProvider::Remote(remote) => assert_eq!(remote.endpoint(), "https://embeddings.example.com"),
            EmbeddingProvider::Local(_) => panic!("expected the remote backend"),
        }

        let first = provider.embed(&["2024-01-01 ERROR db".to_string()]).unwrap_err();
        let second = provider.embed(&[]).unwrap_err();
        let third = provider.embed_one("query").unwrap_err();
        assert_eq!(first, EmbeddingError::NotImplemented);
        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(first.to_string(), "Remote embedding backend is not implemented");
    }

    #[test]
    fn test_unknown_local_model_fails_before_loading() {
        let settings = EmbeddingSettings {
            model: "gpt-embed-9000".to_string(),
            ..Default::default()
        };
        let err = EmbeddingProvider::from_settings(&settings).err().unwrap();
        assert_eq!(err, EmbeddingError::UnknownModel("gpt-embed-9000".to_string()));
    }
}
