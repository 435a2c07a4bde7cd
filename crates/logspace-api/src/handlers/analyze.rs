use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use logspace_core::{chunk_texts, locate_and_read_logs};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::models::{AnalyzeRequest, AnalyzeResponse, ApiError};
use crate::state::AppState;

pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub async fn analyze_logs(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let start = Instant::now();
    // malformed bodies get the same {error, code} shape as every other failure
    let Json(req) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected analyze request body");
        ApiError::bad_request(rejection.body_text())
    })?;
    info!(
        client = %req.client,
        logspace = %req.logspace,
        version = ?req.version,
        top_k = ?req.top_k,
        uploaded = req.uploaded_text().is_some(),
        "Analyze request"
    );

    let Some(top_k) = req.effective_top_k(state.config.default_top_k) else {
        return Err(ApiError::bad_request("top_k must be a positive integer"));
    };

    // the pipeline is synchronous and CPU bound, keep it off the async workers
    let timeout = state.config.analysis_timeout_secs.map(Duration::from_secs);
    let task = tokio::task::spawn_blocking(move || run_analysis(&state, req, top_k));

    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
            warn!(timeout_secs = limit.as_secs(), "Analysis timed out");
            ApiError::new(StatusCode::GATEWAY_TIMEOUT, "Analysis timed out")
        })?,
        None => task.await,
    };
    let response = joined.map_err(|e| ApiError::internal(format!("Analysis task failed: {}", e)))??;

    let elapsed = start.elapsed().as_millis();
    info!(results = response.results.len(), time_ms = elapsed as u64, "Analyze complete");
    Ok(Json(response))
}

/// Locate (or take the uploaded text), chunk, retrieve and summarize.
///
/// Blocking; called from `spawn_blocking`.
pub fn run_analysis(state: &AppState, req: AnalyzeRequest, top_k: usize) -> ApiResult<AnalyzeResponse> {
    let raw_texts = match req.uploaded_text() {
        Some(text) => vec![text.to_string()],
        None => {
            let texts = locate_and_read_logs(
                &state.config.logspace_root,
                &req.client,
                &req.logspace,
                req.version.as_deref(),
            );
            info!(files = texts.len(), root = %state.config.logspace_root.display(), "Logs located");
            if texts.is_empty() {
                return Err(ApiError::not_found("No logs found for given filters"));
            }
            texts
        }
    };

    let chunks = chunk_texts(&raw_texts, &state.config.chunking)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let query = req.query_text();
    let results = state
        .processor
        .analyze(&query, &chunks, top_k)
        .map_err(|e| {
            warn!(error = %e, "Analysis failed");
            ApiError::from_rag(&e)
        })?;

    Ok(AnalyzeResponse {
        status: "ok".to_string(),
        client: req.client,
        logspace: req.logspace,
        results,
    })
}
