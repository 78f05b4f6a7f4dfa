//! API Handlers
//!
//! The interceptor that fronts every application request, plus the admin
//! endpoints that drive the worker lifecycle.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{GenerationInfo, HealthResponse, StatusResponse, SyncRequest, SyncResponse};
use crate::network::{FetchRequest, Fetcher, HttpFetcher, RequestMode};
use crate::worker::{
    ActivateReport, FetchOutcome, InstallReport, OfflineWorker, WorkerSettings,
};

/// Largest request body the proxy will buffer before forwarding.
pub const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024; // 16 MB

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub worker: Arc<OfflineWorker>,
}

impl AppState {
    /// Creates a new AppState around the given worker.
    pub fn new(worker: OfflineWorker) -> Self {
        Self {
            worker: Arc::new(worker),
        }
    }

    /// Creates a new AppState from configuration, fetching over HTTP.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = WorkerSettings::from_config(config)?;
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(settings.origin.clone()));
        Ok(Self::new(OfflineWorker::new(settings, fetcher)?))
    }
}

/// Fallback handler for every non-admin request.
///
/// Handled requests are answered from the cache, the network or an offline
/// fallback. Passthrough requests are forwarded unchanged; if that forward
/// fails the client gets a 502.
pub async fn intercept_handler(State(state): State<AppState>, request: Request) -> Result<Response> {
    let request = to_fetch_request(&state.worker, request).await?;

    match state.worker.handle_fetch(&request).await {
        FetchOutcome::Respond { response, .. } => Ok(response.into_response()),
        FetchOutcome::Passthrough(_) => {
            let response = state.worker.forward(&request).await?;
            Ok(response.into_response())
        }
    }
}

async fn to_fetch_request(worker: &OfflineWorker, request: Request) -> Result<FetchRequest> {
    let (parts, body) = request.into_parts();

    // Absolute-form targets (`GET https://cdn/... HTTP/1.1`) keep their own
    // origin; origin-form targets belong to the application.
    let url = if parts.uri.scheme().is_some() && parts.uri.authority().is_some() {
        worker.absolute_url(&parts.uri.to_string())?
    } else {
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        worker.resolve(path_and_query)
    };
    let mode = RequestMode::detect(&parts.method, &parts.headers);

    let body = axum::body::to_bytes(body, MAX_REQUEST_BODY_BYTES)
        .await
        .map_err(|e| CacheError::InvalidRequest(format!("Unreadable request body: {}", e)))?;

    Ok(FetchRequest {
        method: parts.method,
        url,
        mode,
        headers: parts.headers,
        body,
    })
}

/// Handler for POST /_worker/install
pub async fn install_handler(State(state): State<AppState>) -> Result<Json<InstallReport>> {
    let report = state.worker.install().await?;
    Ok(Json(report))
}

/// Handler for POST /_worker/activate
pub async fn activate_handler(State(state): State<AppState>) -> Json<ActivateReport> {
    Json(state.worker.activate().await)
}

/// Handler for POST /_worker/sync
pub async fn sync_handler(
    State(state): State<AppState>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<SyncResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let outcome = state.worker.handle_sync(&req.tag).await;
    Ok(Json(SyncResponse::new(req.tag, outcome)))
}

/// Handler for GET /_worker/status
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let worker = &state.worker;
    let generations = {
        let storage = worker.storage().read().await;
        storage.generations().map(GenerationInfo::from).collect()
    };

    Json(StatusResponse {
        cache_name: worker.cache_name().to_string(),
        state: worker.state().await,
        generations,
        stats: worker.stats().snapshot(),
    })
}

/// Handler for GET /_worker/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
