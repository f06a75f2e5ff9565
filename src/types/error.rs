//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Propagation Policy
//!
//! - Input and upstream-fetch errors mark a job failed
//! - Per-file parse failures are logged and absorbed by the extractor
//! - Generation failures are retried, then absorbed by a deterministic
//!   fallback document
//! - Store updates on unknown job ids are logged and ignored

use thiserror::Error;
use uuid::Uuid;

use crate::types::job::JobStatus;

// =============================================================================
// Generation Error
// =============================================================================

/// Attempt-level failure of a single generation call.
///
/// These never escape the orchestrator: every variant is either retried or
/// absorbed by the fallback document.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The stream produced no chunk within the inactivity window
    #[error("stream produced no data within the inactivity window")]
    StreamTimeout,

    /// The stream completed having produced zero bytes
    #[error("stream ended with no data")]
    EmptyStream,

    /// Output shorter than the viability threshold
    #[error("generated text too short ({length} chars)")]
    BelowViability { length: usize },

    /// Request could not be sent or the connection dropped
    #[error("generation request failed: {0}")]
    Request(String),

    /// The generation service returned an error status
    #[error("generation service error ({status}): {message}")]
    Api { status: u16, message: String },
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum CodeDocsError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    /// Malformed repository reference, reported before any job is created
    #[error("{0}")]
    InvalidRepoUrl(String),

    /// Repository or file unreachable or absent upstream
    #[error("GitHub error: {0}")]
    Fetch(String),

    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Job not found: {0}")]
    JobNotFound(Uuid),

    /// Result requested before the job reached a completed state
    #[error("Job {id} not ready: status is {status}")]
    JobNotReady { id: Uuid, status: JobStatus },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CodeDocsError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_display_is_bare_message() {
        let err = CodeDocsError::InvalidRepoUrl("URL is required".to_string());
        assert_eq!(err.to_string(), "URL is required");
    }

    #[test]
    fn test_generation_error_display() {
        assert_eq!(
            GenerationError::BelowViability { length: 250 }.to_string(),
            "generated text too short (250 chars)"
        );
        assert_eq!(
            GenerationError::StreamTimeout.to_string(),
            "stream produced no data within the inactivity window"
        );
    }

    #[test]
    fn test_not_ready_carries_status() {
        let id = Uuid::nil();
        let err = CodeDocsError::JobNotReady {
            id,
            status: JobStatus::Processing,
        };
        assert!(err.to_string().contains("processing"));
    }
}
