//! Generation Orchestrator
//!
//! Sequences calls to the generation backend. The long-form README call
//! runs the bounded-retry streaming protocol: up to the configured number
//! of attempts, a fixed backoff between them, and a minimum-length
//! viability check on each result. Secondary operations are single-attempt.
//! Every operation degrades to a deterministic fallback and never raises
//! to its caller.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use super::{GenerationOptions, SharedBackend, fallback, prompt};
use crate::config::GenerationConfig;
use crate::constants::generation as defaults;
use crate::github::RepoInfo;
use crate::types::{AnalysisResult, FileRecord, GenerationError};

// =============================================================================
// Result Type
// =============================================================================

/// Where a generated document came from, so callers and tests can tell
/// genuine model output apart from templated degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub content: String,
    pub source: GenerationSource,
}

impl GeneratedDocument {
    fn generated(content: String) -> Self {
        Self {
            content,
            source: GenerationSource::Generated,
        }
    }

    fn fallback(content: String) -> Self {
        Self {
            content,
            source: GenerationSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == GenerationSource::Fallback
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

pub struct GenerationOrchestrator {
    backend: SharedBackend,
    max_attempts: u32,
    retry_backoff: Duration,
    min_viable_chars: usize,
}

impl GenerationOrchestrator {
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,
            max_attempts: defaults::MAX_ATTEMPTS,
            retry_backoff: Duration::from_secs(defaults::RETRY_BACKOFF_SECS),
            min_viable_chars: defaults::MIN_VIABLE_CHARS,
        }
    }

    pub fn from_config(backend: SharedBackend, config: &GenerationConfig) -> Self {
        Self {
            backend,
            max_attempts: config.max_attempts,
            retry_backoff: Duration::from_secs(config.retry_backoff_secs),
            min_viable_chars: config.min_viable_chars,
        }
    }

    /// Synthesize the full README. Streams with bounded retries; after the
    /// final failed attempt the deterministic fallback document is
    /// returned. This method cannot fail.
    pub async fn generate_readme(
        &self,
        repo: &RepoInfo,
        files: &[FileRecord],
        existing_readme: Option<&str>,
        analysis: &AnalysisResult,
        user_context: Option<&str>,
    ) -> GeneratedDocument {
        let prompt = prompt::readme_prompt(repo, files, existing_readme, analysis, user_context);
        let options = GenerationOptions::readme();

        for attempt in 1..=self.max_attempts {
            info!(
                "README generation attempt {}/{} ({} prompt chars)",
                attempt,
                self.max_attempts,
                prompt.len()
            );

            match self.backend.complete_stream(&prompt, &options).await {
                Ok(text) => {
                    let length = text.chars().count();
                    if length > self.min_viable_chars {
                        info!("README generated: {} chars", length);
                        return GeneratedDocument::generated(text);
                    }
                    warn!(
                        "Attempt {} failed: {}",
                        attempt,
                        GenerationError::BelowViability { length }
                    );
                }
                Err(e) => warn!("Attempt {} failed: {}", attempt, e),
            }

            if attempt < self.max_attempts {
                sleep(self.retry_backoff).await;
            }
        }

        info!("All generation attempts failed, using fallback document");
        GeneratedDocument::fallback(fallback::readme(repo, existing_readme, analysis, files))
    }

    /// Architectural overview, single attempt.
    pub async fn generate_overview(
        &self,
        repo: &RepoInfo,
        analysis: &AnalysisResult,
        existing_readme: Option<&str>,
        user_context: Option<&str>,
    ) -> GeneratedDocument {
        let prompt = prompt::overview_prompt(repo, analysis, existing_readme, user_context);
        self.single_attempt(&prompt, GenerationOptions::overview(), || {
            fallback::overview(repo, existing_readme)
        })
        .await
    }

    /// Installation instructions, single attempt.
    pub async fn generate_install_instructions(
        &self,
        repo: &RepoInfo,
        files: &[FileRecord],
        existing_readme: Option<&str>,
    ) -> GeneratedDocument {
        let prompt = prompt::install_prompt(repo, files, existing_readme);
        self.single_attempt(&prompt, GenerationOptions::instructions(), || {
            fallback::install(repo.language.as_deref())
        })
        .await
    }

    /// Usage instructions, single attempt.
    pub async fn generate_usage_instructions(
        &self,
        repo: &RepoInfo,
        files: &[FileRecord],
        analysis: &AnalysisResult,
    ) -> GeneratedDocument {
        let prompt = prompt::usage_prompt(repo, files, analysis);
        self.single_attempt(&prompt, GenerationOptions::instructions(), fallback::usage)
            .await
    }

    /// One-line summary for a single function or class, single attempt.
    pub async fn generate_summary(&self, code: &str, kind: &str, name: &str) -> GeneratedDocument {
        let prompt = prompt::summary_prompt(code, kind, name);
        self.single_attempt(&prompt, GenerationOptions::summary(), || {
            fallback::summary(kind, name)
        })
        .await
    }

    async fn single_attempt<F>(
        &self,
        prompt: &str,
        options: GenerationOptions,
        fallback_fn: F,
    ) -> GeneratedDocument
    where
        F: FnOnce() -> String,
    {
        match self.backend.complete(prompt, &options).await {
            Ok(text) if !text.trim().is_empty() => GeneratedDocument::generated(text),
            Ok(_) => {
                warn!("Generation returned empty text, using fallback");
                GeneratedDocument::fallback(fallback_fn())
            }
            Err(e) => {
                warn!("Generation failed: {}, using fallback", e);
                GeneratedDocument::fallback(fallback_fn())
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
