//! Text Generation
//!
//! The [`GenerationBackend`] seam over the external generation service,
//! the Ollama implementation, prompt assembly, deterministic fallbacks,
//! and the retry/streaming orchestrator.

mod fallback;
mod ollama;
mod orchestrator;
mod prompt;

pub use ollama::OllamaClient;
pub use orchestrator::{GeneratedDocument, GenerationOrchestrator, GenerationSource};

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::GenerationError;

// =============================================================================
// Sampling Options
// =============================================================================

/// Sampling parameters for one generation call.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub temperature: f32,
    /// Maximum output tokens
    pub num_predict: u32,
    /// Context window, when the call needs a specific one
    pub num_ctx: Option<u32>,
    /// Nucleus sampling parameter
    pub top_p: Option<f32>,
}

impl GenerationOptions {
    /// Long-form README synthesis
    pub fn readme() -> Self {
        Self {
            temperature: 0.4,
            num_predict: 2000,
            num_ctx: Some(3072),
            top_p: None,
        }
    }

    /// Architectural overview
    pub fn overview() -> Self {
        Self {
            temperature: 0.5,
            num_predict: 500,
            num_ctx: None,
            top_p: None,
        }
    }

    /// Install/usage instruction blocks
    pub fn instructions() -> Self {
        Self {
            temperature: 0.3,
            num_predict: 400,
            num_ctx: None,
            top_p: None,
        }
    }

    /// Per-symbol one-line summaries
    pub fn summary() -> Self {
        Self {
            temperature: 0.3,
            num_predict: 200,
            num_ctx: None,
            top_p: None,
        }
    }
}

// =============================================================================
// Generation Backend Seam
// =============================================================================

/// Request/response and request/stream primitives of the external
/// generation service. [`OllamaClient`] is the production implementation;
/// orchestrator tests substitute scripted backends.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Single blocking completion.
    async fn complete(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> std::result::Result<String, GenerationError>;

    /// Incremental completion: accumulates streamed chunks, enforcing the
    /// inactivity window, until the explicit completion signal.
    async fn complete_stream(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> std::result::Result<String, GenerationError>;

    /// Model identifier for logging.
    fn model(&self) -> &str;

    /// Whether the service is reachable and the model is available.
    async fn health_check(&self) -> bool;
}

/// Shared backend handle for concurrent pipeline tasks.
pub type SharedBackend = Arc<dyn GenerationBackend>;
