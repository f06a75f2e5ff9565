//! HTTP Service Layer
//!
//! JSON API over the job service.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/analyze` | Submit a repository URL, returns a job id |
//! | `GET`  | `/api/status/{job_id}` | Poll job status and progress |
//! | `GET`  | `/api/documentation/{job_id}` | Finished document + metadata |
//! | `GET`  | `/api/download/{job_id}` | Document as a markdown attachment |
//! | `GET`  | `/health` | Service and backend health |
//!
//! All origins, methods, and headers are permitted so browser clients can
//! poll directly.

mod routes;

pub use routes::AppState;

use tracing::info;

use crate::config::ServerConfig;
use crate::types::Result;

/// Bind and serve until the process is terminated.
pub async fn run(config: &ServerConfig, state: AppState) -> Result<()> {
    let app = routes::router(state);
    let addr = format!("{}:{}", config.host, config.port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("codedocs listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
