use axum::{Json, http::StatusCode};
use logspace_core::AnalysisResult;
use logspace_rag::{EmbeddingError, IndexError, RagError};
use serde::{Deserialize, Serialize};

/// JSON error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: u16,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (status, Json(Self {
            error: message.into(),
            code: status.as_u16(),
        }))
    }

    pub fn not_found(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Map a pipeline failure onto an HTTP status
    pub fn from_rag(err: &RagError) -> (StatusCode, Json<Self>) {
        let status = match err {
            RagError::InvalidTopK | RagError::Index(IndexError::InvalidK) => StatusCode::BAD_REQUEST,
            RagError::NoChunks => StatusCode::NOT_FOUND,
            RagError::Embedding(EmbeddingError::NotImplemented) => StatusCode::NOT_IMPLEMENTED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

/// Body of a successful `POST /analyze`
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub client: String,
    pub logspace: String,
    pub results: Vec<AnalysisResult>,
}
