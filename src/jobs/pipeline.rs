//! Pipeline Coordinator
//!
//! Drives one job end-to-end: fetch → analyze → generate → format →
//! complete. Each stage boundary performs one store update; a stage-local
//! failure performs one `failed` update and ends the run. There are no
//! retries across stages — retries live inside the generation orchestrator
//! only.

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::ai::GenerationOrchestrator;
use crate::analyzer::{AnalysisAggregator, extract};
use crate::github::{RepositoryHost, parse_repo_url};
use crate::jobs::store::{JobStore, JobUpdate};
use crate::types::{
    CodeDocsError, JobMetadata, JobProgress, JobResult, PipelineStage, Result,
};

pub struct PipelineCoordinator {
    store: Arc<dyn JobStore>,
    host: Arc<dyn RepositoryHost>,
    orchestrator: Arc<GenerationOrchestrator>,
}

impl PipelineCoordinator {
    pub fn new(
        store: Arc<dyn JobStore>,
        host: Arc<dyn RepositoryHost>,
        orchestrator: Arc<GenerationOrchestrator>,
    ) -> Self {
        Self {
            store,
            host,
            orchestrator,
        }
    }

    /// Run the job to a terminal state. Any stage failure is converted
    /// into a single `failed` update; this method itself never errors.
    pub async fn run(&self, job_id: Uuid, repo_url: &str, user_context: Option<String>) {
        if let Err(e) = self.execute(job_id, repo_url, user_context).await {
            error!("Job {} failed: {}", job_id, e);
            self.store.update(&job_id, JobUpdate::failed(e.to_string()));
        }
    }

    async fn execute(
        &self,
        job_id: Uuid,
        repo_url: &str,
        user_context: Option<String>,
    ) -> Result<()> {
        // Stage 1: fetch repository data
        self.advance(job_id, PipelineStage::Fetching);

        let (owner, repo_name) = parse_repo_url(repo_url)?;
        info!("Repository: {}/{}", owner, repo_name);

        let repo = self.host.repository_info(&owner, &repo_name).await?;
        info!("Repository info fetched: {}", repo.full_name);

        let readme = self.host.readme(&owner, &repo_name).await;
        match &readme {
            Some(text) => info!("README fetched ({} characters)", text.len()),
            None => info!("No existing README - will generate from scratch"),
        }

        let files = self
            .host
            .files(&owner, &repo_name, &repo.default_branch)
            .await?;
        info!("Found {} files", files.len());

        // A repository with nothing analyzable is a fetch-stage failure,
        // not a degenerate success
        if files.is_empty() {
            return Err(CodeDocsError::Fetch(
                "No supported code files found in repository.".to_string(),
            ));
        }

        // Stage 2: analyze code structure, one file at a time
        self.advance(job_id, PipelineStage::Analyzing);

        let mut aggregator = AnalysisAggregator::new();
        for file in &files {
            self.store.update(
                &job_id,
                JobUpdate::progress(JobProgress::at_file(PipelineStage::Analyzing, &file.path)),
            );
            aggregator.absorb(extract(&file.content, &file.path, file.language));
        }

        let counts = aggregator.counts();
        info!(
            "Code analysis complete: {} functions, {} classes, {} endpoints",
            counts.functions, counts.classes, counts.endpoints
        );
        let analysis = aggregator.finish();

        // Stage 3: generate the README (internally retried, never fails)
        self.advance(job_id, PipelineStage::Generating);

        let generated = self
            .orchestrator
            .generate_readme(
                &repo,
                &files,
                readme.as_deref(),
                &analysis,
                user_context.as_deref(),
            )
            .await;
        info!(
            "README generation complete: {} chars (fallback: {})",
            generated.content.len(),
            generated.is_fallback()
        );

        // Stage 4: assemble the final document and metadata
        self.advance(job_id, PipelineStage::Formatting);

        let document = generated.content.trim().to_string();
        let metadata = JobMetadata {
            files_analyzed: files.len(),
            functions_found: analysis.functions.len(),
            classes_found: analysis.classes.len(),
            endpoints_found: analysis.endpoints.len(),
            had_existing_document: readme.is_some(),
        };

        // Stage 5: terminal completed update
        self.store.update(
            &job_id,
            JobUpdate::completed(
                PipelineStage::Completed.into(),
                JobResult { document, metadata },
            ),
        );
        info!("Job {} completed successfully", job_id);

        Ok(())
    }

    fn advance(&self, job_id: Uuid, stage: PipelineStage) {
        self.store
            .update(&job_id, JobUpdate::progress(stage.into()));
    }
}

// =============================================================================
// Tests
// =============================================================================
