//! Job Store
//!
//! Process-wide keyed job state behind an injected trait so another
//! implementation can swap in persistent storage without touching the
//! coordinator. The in-memory map is the default and test implementation.
//!
//! Concurrency contract: each job id is write-owned by exactly one pipeline
//! task, which mutates in strictly sequential stage order; no field-level
//! locking is needed beyond the map's own sharding.

use dashmap::DashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::types::{Job, JobProgress, JobResult, JobStatus};

// =============================================================================
// Partial Update
// =============================================================================

/// Fields to shallow-merge into a stored job. Unset fields keep their
/// current values; `updated_at` is always refreshed.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub progress: Option<JobProgress>,
    pub result: Option<JobResult>,
    pub error: Option<String>,
}

impl JobUpdate {
    pub fn progress(progress: JobProgress) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }

    pub fn completed(progress: JobProgress, result: JobResult) -> Self {
        Self {
            status: Some(JobStatus::Completed),
            progress: Some(progress),
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

// =============================================================================
// Store Trait
// =============================================================================

pub trait JobStore: Send + Sync {
    fn create(&self, job: Job);

    fn get(&self, id: &Uuid) -> Option<Job>;

    /// Shallow-merge `update` into the stored job. A missing id is a
    /// logged no-op, never a hard error; so is an update against a
    /// terminal job.
    fn update(&self, id: &Uuid, update: JobUpdate);

    fn delete(&self, id: &Uuid) -> bool;

    fn list_all(&self) -> Vec<Job>;
}

// =============================================================================
// In-Memory Implementation
// =============================================================================

#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: DashMap<Uuid, Job>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobStore for InMemoryJobStore {
    fn create(&self, job: Job) {
        info!("Job created: {} ({} in memory)", job.id, self.jobs.len() + 1);
        self.jobs.insert(job.id, job);
    }

    fn get(&self, id: &Uuid) -> Option<Job> {
        let job = self.jobs.get(id).map(|entry| entry.value().clone());
        if job.is_none() {
            warn!("Job not found: {}", id);
        }
        job
    }

    fn update(&self, id: &Uuid, update: JobUpdate) {
        let Some(mut job) = self.jobs.get_mut(id) else {
            warn!("Cannot update - job not found: {}", id);
            return;
        };

        if job.status.is_terminal() {
            debug!("Ignoring update to terminal job {}", id);
            return;
        }

        if let Some(status) = update.status {
            job.status = status;
        }
        if let Some(progress) = update.progress {
            job.progress = progress;
        }
        if let Some(result) = update.result {
            job.result = Some(result);
        }
        if let Some(error) = update.error {
            job.error = Some(error);
        }
        job.updated_at = chrono::Utc::now();

        debug!("Job updated: {} - status: {}", id, job.status);
    }

    fn delete(&self, id: &Uuid) -> bool {
        let deleted = self.jobs.remove(id).is_some();
        info!("Job deleted: {} - success: {}", id, deleted);
        deleted
    }

    fn list_all(&self) -> Vec<Job> {
        self.jobs.iter().map(|entry| entry.value().clone()).collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JobMetadata, PipelineStage};

    fn store_with_job() -> (InMemoryJobStore, Uuid) {
        let store = InMemoryJobStore::new();
        let id = Uuid::new_v4();
        store.create(Job::new(id, "https://github.com/a/b", None));
        (store, id)
    }

    #[test]
    fn test_create_then_get() {
        let (store, id) = store_with_job();
        let job = store.get(&id).expect("job");
        assert_eq!(job.id, id);
        assert_eq!(job.status, JobStatus::Processing);
    }

    #[test]
    fn test_update_on_absent_id_is_noop() {
        let store = InMemoryJobStore::new();
        let absent = Uuid::new_v4();

        store.update(&absent, JobUpdate::failed("boom"));

        assert!(store.get(&absent).is_none());
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn test_update_merges_and_refreshes_timestamp() {
        let (store, id) = store_with_job();
        let before = store.get(&id).unwrap();

        store.update(&id, JobUpdate::progress(PipelineStage::Analyzing.into()));

        let after = store.get(&id).unwrap();
        assert_eq!(after.progress.stage, "Analyzing Code Structure");
        // Untouched fields survive the merge
        assert_eq!(after.status, JobStatus::Processing);
        assert_eq!(after.repo_url, before.repo_url);
        assert!(after.updated_at >= before.updated_at);
    }

    #[test]
    fn test_terminal_job_is_immutable() {
        let (store, id) = store_with_job();
        store.update(&id, JobUpdate::failed("fetch exploded"));

        store.update(
            &id,
            JobUpdate::completed(
                PipelineStage::Completed.into(),
                JobResult {
                    document: "# doc".to_string(),
                    metadata: JobMetadata {
                        files_analyzed: 0,
                        functions_found: 0,
                        classes_found: 0,
                        endpoints_found: 0,
                        had_existing_document: false,
                    },
                },
            ),
        );

        let job = store.get(&id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("fetch exploded"));
        assert!(job.result.is_none());
    }

    #[test]
    fn test_repeated_get_of_terminal_job_is_identical() {
        let (store, id) = store_with_job();
        store.update(&id, JobUpdate::failed("done"));

        let first = store.get(&id).unwrap();
        let second = store.get(&id).unwrap();
        assert_eq!(first.status, second.status);
        assert_eq!(first.updated_at, second.updated_at);
        assert_eq!(first.error, second.error);
    }

    #[test]
    fn test_delete() {
        let (store, id) = store_with_job();
        assert!(store.delete(&id));
        assert!(!store.delete(&id));
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn test_list_all() {
        let store = InMemoryJobStore::new();
        for _ in 0..3 {
            store.create(Job::new(Uuid::new_v4(), "https://github.com/a/b", None));
        }
        assert_eq!(store.list_all().len(), 3);
    }
}
