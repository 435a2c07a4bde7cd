use logspace_rag::RagProcessor;

use crate::config::ServerConfig;

// App state - shared read-only across handlers; nothing here is per request
pub struct AppState {
    pub config: ServerConfig,
    pub processor: RagProcessor,
}

impl AppState {
    pub fn new(config: ServerConfig, processor: RagProcessor) -> Self {
        Self { config, processor }
    }
}
