//! HTTP Route Handlers
//!
//! Thin wrappers over [`JobService`]: submission returns immediately with
//! a job id; clients poll status and fetch the finished document.
//! Job-not-found (404) is distinct from job-not-complete (400).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::ai::SharedBackend;
use crate::github::parse_repo_url;
use crate::jobs::JobService;
use crate::types::{CodeDocsError, JobStatus};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: JobService,
    pub backend: SharedBackend,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/status/{job_id}", get(status))
        .route("/api/documentation/{job_id}", get(documentation))
        .route("/api/download/{job_id}", get(download))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Request / Response Bodies
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    #[serde(default)]
    repo_url: String,
    #[serde(default)]
    context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    job_id: Uuid,
    status: JobStatus,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

fn parse_job_id(raw: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(raw)
        .map_err(|_| error_response(StatusCode::BAD_REQUEST, "Invalid job id"))
}

// =============================================================================
// Handlers
// =============================================================================

async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    match state.service.submit_job(&request.repo_url, request.context) {
        Ok(job_id) => Json(AnalyzeResponse {
            job_id,
            status: JobStatus::Processing,
            message: "Repository analysis started",
        })
        .into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

async fn status(State(state): State<AppState>, Path(job_id): Path<String>) -> Response {
    let job_id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.get_status(&job_id) {
        Ok(view) => Json(view).into_response(),
        Err(CodeDocsError::JobNotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, "Job not found")
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn documentation(State(state): State<AppState>, Path(job_id): Path<String>) -> Response {
    let job_id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.get_result(&job_id) {
        Ok(result) => Json(serde_json::json!({
            "jobId": job_id,
            "markdown": result.document,
            "metadata": result.metadata,
        }))
        .into_response(),
        Err(CodeDocsError::JobNotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, "Job not found")
        }
        Err(CodeDocsError::JobNotReady { status, .. }) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "Documentation not ready",
                "status": status,
            })),
        )
            .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn download(State(state): State<AppState>, Path(job_id): Path<String>) -> Response {
    let job_id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let Ok(result) = state.service.get_result(&job_id) else {
        return error_response(StatusCode::NOT_FOUND, "Documentation not available");
    };

    let filename = state
        .service
        .get_job(&job_id)
        .and_then(|job| parse_repo_url(&job.repo_url).ok())
        .map(|(_, repo)| format!("{}.md", repo))
        .unwrap_or_else(|| "documentation.md".to_string());

    (
        [
            (header::CONTENT_TYPE, "text/markdown".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        result.document,
    )
        .into_response()
}

async fn health(State(state): State<AppState>) -> Response {
    let backend_reachable = state.backend.health_check().await;

    Json(serde_json::json!({
        "status": "ok",
        "service": "codedocs",
        "version": env!("CARGO_PKG_VERSION"),
        "generation": {
            "model": state.backend.model(),
            "reachable": backend_reachable,
        },
    }))
    .into_response()
}
