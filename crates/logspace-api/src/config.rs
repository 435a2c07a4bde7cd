//! Server configuration
//!
//! Read once at startup from an optional TOML file, then overridden by
//! environment variables. Read-only for the rest of the process lifetime.

use std::fs;
use std::path::{Path, PathBuf};

use logspace_core::{ChunkConfig, ChunkError};
use logspace_rag::{EmbeddingError, EmbeddingSettings};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "LOGSPACE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "logspace.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Chunking(#[from] ChunkError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("default_top_k must be a positive integer")]
    InvalidTopK,
}

// Main config structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    // address the HTTP server binds to
    pub bind_addr: String,

    // root of the LogSpace tree searched by the locator
    pub logspace_root: PathBuf,

    // index-storage directory, created at startup
    pub index_dir: PathBuf,

    // top_k used when a request omits it
    pub default_top_k: usize,

    // wraps the whole blocking pipeline of one request
    pub analysis_timeout_secs: Option<u64>,

    pub chunking: ChunkConfig,

    pub embedding: EmbeddingSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            logspace_root: PathBuf::from("LogSpace"),
            index_dir: PathBuf::from("data/indices"),
            default_top_k: 5,
            analysis_timeout_secs: None,
            chunking: ChunkConfig {
                chunk_size: 800,
                overlap: 100,
            },
            embedding: EmbeddingSettings::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Environment overrides, looked up through `lookup` so tests need not touch the process env
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(root) = lookup("LOGSPACE_ROOT") {
            self.logspace_root = PathBuf::from(root);
        }
        if let Some(addr) = lookup("LOGSPACE_BIND") {
            self.bind_addr = addr;
        }
        if let Some(dir) = lookup("LOGSPACE_INDEX_DIR") {
            self.index_dir = PathBuf::from(dir);
        }
        if let Some(mode) = lookup("EMBEDDING_MODE") {
            self.embedding.mode = mode.parse()?;
        }
        if let Some(model) = lookup("EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chunking.validate()?;
        if self.default_top_k == 0 {
            return Err(ConfigError::InvalidTopK);
        }
        Ok(())
    }

    /// Load from `LOGSPACE_CONFIG` (or `logspace.toml` when present), apply env overrides, validate
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok();
        let mut config = match explicit {
            Some(path) => load_config(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH)?,
            None => ServerConfig::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }
}

// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServerConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ServerConfig::from_toml_str(&content, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logspace_rag::EmbeddingMode;
    use std::collections::HashMap;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
bind_addr = "127.0.0.1:9000"
logspace_root = "/srv/LogSpace"
default_top_k = 3
analysis_timeout_secs = 30

[chunking]
chunk_size = 500
overlap = 50

[embedding]
mode = "bedrock"
model = "titan-embed-text"
remote_endpoint = "https://bedrock.example.com"
"#;
        let config = ServerConfig::from_toml_str(toml_content, Path::new("test.toml")).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.logspace_root, PathBuf::from("/srv/LogSpace"));
        assert_eq!(config.index_dir, PathBuf::from("data/indices"));
        assert_eq!(config.default_top_k, 3);
        assert_eq!(config.analysis_timeout_secs, Some(30));
        assert_eq!(config.chunking, ChunkConfig { chunk_size: 500, overlap: 50 });
        assert_eq!(config.embedding.mode, EmbeddingMode::Remote);
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ServerConfig::from_toml_str("", Path::new("empty.toml")).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.chunking, ChunkConfig { chunk_size: 800, overlap: 100 });
        assert_eq!(config.embedding.mode, EmbeddingMode::Local);
        assert_eq!(config.embedding.model, "all-minilm-l6-v2");
        assert!(config.analysis_timeout_secs.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = ServerConfig::from_toml_str("[chunking]\nchunk_size = 100\noverlap = 100\n", Path::new("x.toml")).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Chunking(_))));

        let config = ServerConfig::from_toml_str("default_top_k = 0\n", Path::new("x.toml")).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTopK)));

        let err = ServerConfig::from_toml_str("default_top_k = \"five\"\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("LOGSPACE_ROOT", "/data/LogSpace"),
            ("LOGSPACE_BIND", "127.0.0.1:8080"),
            ("EMBEDDING_MODE", "remote"),
            ("EMBEDDING_MODEL", ""),
        ]);
        let mut config = ServerConfig::default();
        config
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.logspace_root, PathBuf::from("/data/LogSpace"));
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.embedding.mode, EmbeddingMode::Remote);
        // blank values are ignored
        assert_eq!(config.embedding.model, "all-minilm-l6-v2");
    }

    #[test]
    fn test_unknown_embedding_mode_is_config_error() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_env_overrides(|key| (key == "EMBEDDING_MODE").then(|| "openai".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Embedding(EmbeddingError::UnknownMode(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config("/definitely/not/here/logspace.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/logspace.toml"));
    }
}
