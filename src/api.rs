//! HTTP surface of the analysis service

use crate::analyzer::RepoAnalyzer;
use crate::config::Config;
use crate::error::AnalystError;
use crate::export::{export_report, ExportFormat};
use crate::models::ReportBundle;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

const SERVICE_NAME: &str = "GitHub Repo Analyst";
const INDEX_HTML: &str = include_str!("../templates/index.html");

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
}

impl AppState {
    /// Wraps the process configuration
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Body of `POST /analyze`
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Repository web URL
    #[serde(default)]
    pub repo_url: Option<String>,
}

/// Body of every failed response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason
    pub error: String,
}

/// Body of `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process answers
    pub status: String,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current timestamp
    pub timestamp: DateTime<Utc>,
}

/// JSON error response with the status derived from the error
pub struct ApiError(StatusCode, String);

impl From<AnalystError> for ApiError {
    fn from(err: AnalystError) -> Self {
        let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(ErrorResponse { error: self.1 })).into_response()
    }
}

/// Builds the router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/analyze", post(analyze_repository))
        .route("/export/:format", post(export))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

async fn analyze_repository(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ReportBundle>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError(StatusCode::BAD_REQUEST, e.body_text()))?;
    let repo_url = request
        .repo_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError(StatusCode::BAD_REQUEST, "Please enter a GitHub repository URL".into()))?;

    info!("Analysis requested for {}", repo_url);
    let analyzer = RepoAnalyzer::new(&state.config)?;
    match analyzer.analyze(&repo_url).await {
        Ok(bundle) => Ok(Json(bundle)),
        Err(e) => {
            if e.is_client_error() {
                warn!("Rejected {}: {}", repo_url, e);
            } else {
                error!("Analysis of {} failed: {}", repo_url, e);
            }
            Err(e.into())
        }
    }
}

async fn export(
    State(state): State<AppState>,
    Path(format): Path<String>,
    payload: Result<Json<ReportBundle>, JsonRejection>,
) -> Result<Response, ApiError> {
    let format: ExportFormat = format.parse()?;
    let Json(bundle) = payload.map_err(|e| ApiError(StatusCode::BAD_REQUEST, e.body_text()))?;

    let exported = export_report(&bundle, format, &state.config.export_dir).map_err(|e| {
        error!("Export of {} as {} failed: {}", bundle.repo_info.full_name, format, e);
        ApiError(StatusCode::INTERNAL_SERVER_ERROR, format!("Export failed: {}", e))
    })?;

    let bytes = tokio::fs::read(&exported.path)
        .await
        .map_err(|e| ApiError(StatusCode::INTERNAL_SERVER_ERROR, format!("Export failed: {}", e)))?;
    if let Err(e) = tokio::fs::remove_file(&exported.path).await {
        warn!("Could not remove {}: {}", exported.path.display(), e);
    }

    let disposition = format!("attachment; filename=\"{}\"", exported.download_name);
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
