//! Job Service
//!
//! The facade the HTTP layer (and the one-shot CLI) talks to: submit a
//! job and poll it. Submission validates the URL synchronously, creates
//! the job record, and spawns the pipeline as an independent task — the
//! contract is fire-and-forget with poll-based status retrieval.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::github::validate_repo_url;
use crate::jobs::pipeline::PipelineCoordinator;
use crate::jobs::store::JobStore;
use crate::types::{
    CodeDocsError, Job, JobProgress, JobResult, JobStatus, Result,
};

/// Poll response for one job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusView {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub progress: JobProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn JobStore>,
    coordinator: Arc<PipelineCoordinator>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>, coordinator: Arc<PipelineCoordinator>) -> Self {
        Self { store, coordinator }
    }

    /// Validate the URL, create the job, and kick off the pipeline.
    /// Returns as soon as the job record exists; callers poll for state.
    pub fn submit_job(&self, repo_url: &str, user_context: Option<String>) -> Result<Uuid> {
        validate_repo_url(repo_url)?;

        let job_id = Uuid::new_v4();
        info!("Analyzing repository: {} (job {})", repo_url, job_id);

        self.store
            .create(Job::new(job_id, repo_url, user_context.clone()));

        let coordinator = self.coordinator.clone();
        let url = repo_url.to_string();
        tokio::spawn(async move {
            coordinator.run(job_id, &url, user_context).await;
        });

        Ok(job_id)
    }

    /// Current status snapshot. Job-not-found is a distinct outcome.
    pub fn get_status(&self, job_id: &Uuid) -> Result<JobStatusView> {
        let job = self
            .store
            .get(job_id)
            .ok_or(CodeDocsError::JobNotFound(*job_id))?;

        Ok(JobStatusView {
            job_id: job.id,
            status: job.status,
            progress: job.progress,
            error: job.error,
        })
    }

    /// Final document and metadata. Valid only once the job completed;
    /// a still-running or failed job is reported as not ready.
    pub fn get_result(&self, job_id: &Uuid) -> Result<JobResult> {
        let job = self
            .store
            .get(job_id)
            .ok_or(CodeDocsError::JobNotFound(*job_id))?;

        match (job.status, job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result),
            (status, _) => Err(CodeDocsError::JobNotReady {
                id: *job_id,
                status,
            }),
        }
    }

    /// The job record itself (for download filenames and the CLI).
    pub fn get_job(&self, job_id: &Uuid) -> Option<Job> {
        self.store.get(job_id)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::ai::{GenerationBackend, GenerationOptions, GenerationOrchestrator};
    use crate::github::{RepoInfo, RepositoryHost};
    use crate::jobs::store::InMemoryJobStore;
    use crate::types::{FileRecord, GenerationError};

    struct EmptyHost;

    #[async_trait]
    impl RepositoryHost for EmptyHost {
        async fn repository_info(&self, _owner: &str, _repo: &str) -> Result<RepoInfo> {
            Ok(RepoInfo {
                name: "demo".to_string(),
                full_name: "user/demo".to_string(),
                description: None,
                language: None,
                stars: 0,
                default_branch: "main".to_string(),
            })
        }

        async fn readme(&self, _owner: &str, _repo: &str) -> Option<String> {
            None
        }

        async fn files(
            &self,
            _owner: &str,
            _repo: &str,
            _branch: &str,
        ) -> Result<Vec<FileRecord>> {
            Ok(Vec::new())
        }
    }

    struct NoopBackend;

    #[async_trait]
    impl GenerationBackend for NoopBackend {
        async fn complete(
            &self,
            _prompt: &str,
            _options: &GenerationOptions,
        ) -> std::result::Result<String, GenerationError> {
            Err(GenerationError::EmptyStream)
        }

        async fn complete_stream(
            &self,
            _prompt: &str,
            _options: &GenerationOptions,
        ) -> std::result::Result<String, GenerationError> {
            Err(GenerationError::EmptyStream)
        }

        fn model(&self) -> &str {
            "noop"
        }

        async fn health_check(&self) -> bool {
            false
        }
    }

    fn service() -> JobService {
        let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
        let coordinator = Arc::new(PipelineCoordinator::new(
            store.clone(),
            Arc::new(EmptyHost),
            Arc::new(GenerationOrchestrator::new(Arc::new(NoopBackend))),
        ));
        JobService::new(store, coordinator)
    }

    #[tokio::test]
    async fn test_invalid_url_rejected_before_job_creation() {
        let service = service();
        let err = service.submit_job("not-a-url", None).unwrap_err();
        assert!(matches!(err, CodeDocsError::InvalidRepoUrl(_)));
    }

    #[tokio::test]
    async fn test_submit_returns_immediately_with_processing_job() {
        let service = service();
        let id = service
            .submit_job("https://github.com/user/demo", Some("note".to_string()))
            .unwrap();

        let status = service.get_status(&id).expect("status");
        assert_eq!(status.job_id, id);
        // The pipeline task may not have run yet; either way the job exists
        assert!(matches!(
            status.status,
            JobStatus::Processing | JobStatus::Failed
        ));
    }

    #[tokio::test]
    async fn test_status_of_unknown_job_is_not_found() {
        let service = service();
        let err = service.get_status(&Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, CodeDocsError::JobNotFound(_)));
    }

    #[tokio::test]
    async fn test_result_distinguishes_not_found_from_not_ready() {
        let service = service();

        let err = service.get_result(&Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, CodeDocsError::JobNotFound(_)));

        let id = service
            .submit_job("https://github.com/user/demo", None)
            .unwrap();
        // EmptyHost yields zero files, so the job fails; a failed job is
        // not-ready, not not-found
        let err = loop {
            match service.get_result(&id) {
                Err(CodeDocsError::JobNotReady { status, .. })
                    if status == JobStatus::Failed =>
                {
                    break CodeDocsError::JobNotReady { id, status };
                }
                Err(CodeDocsError::JobNotReady { .. }) => {
                    tokio::task::yield_now().await;
                }
                other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
            }
        };
        assert!(matches!(err, CodeDocsError::JobNotReady { .. }));
    }
}
