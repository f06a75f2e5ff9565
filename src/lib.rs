//! codedocs - AI-Powered README Generator
//!
//! Ingests a remote GitHub repository, extracts structural facts
//! (functions, classes, HTTP endpoints) from its files, and drives a
//! local LLM to synthesize a README document, tracking the whole
//! operation as an asynchronous job with stage-based progress.
//!
//! ## Core Components
//!
//! - **Structural extraction**: tree-sitter parsing for the
//!   JavaScript/TypeScript family, line-pattern matching for Python;
//!   per-file failures are isolated and never abort a job
//! - **Job pipeline**: fetch → analyze → generate → format → complete,
//!   with any stage able to fail the job terminally
//! - **Generation protocol**: bounded retries around a streaming call
//!   with an inactivity timeout, degrading to a deterministic fallback
//!   document
//!
//! ## Modules
//!
//! - [`analyzer`]: language detection, fact extraction, aggregation
//! - [`github`]: repository metadata, README, and file fetching
//! - [`ai`]: generation backend, prompts, fallbacks, orchestration
//! - [`jobs`]: job store, pipeline coordinator, service facade
//! - [`server`]: JSON HTTP API
//! - [`config`]: layered configuration

pub mod ai;
pub mod analyzer;
pub mod config;
pub mod constants;
pub mod github;
pub mod jobs;
pub mod server;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{CodeDocsError, GenerationError, Result};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use jobs::{InMemoryJobStore, JobService, JobStore, PipelineCoordinator};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    GeneratedDocument, GenerationBackend, GenerationOrchestrator, GenerationSource, OllamaClient,
    SharedBackend,
};

// =============================================================================
// Analyzer Re-exports
// =============================================================================

pub use analyzer::{AnalysisAggregator, Language, detect_language, extract};

// =============================================================================
// GitHub Re-exports
// =============================================================================

pub use github::{GitHubClient, RepoInfo, RepositoryHost, parse_repo_url, validate_repo_url};
