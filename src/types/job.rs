//! Job Lifecycle Types
//!
//! A job tracks one repository-to-README run: created in `processing`,
//! advanced through ordered pipeline stages, terminal once `completed`
//! or `failed`. Serialized field names follow the JSON API surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Status & Stages
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Terminal jobs accept no further mutation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Ordered pipeline stages. Progression is strictly forward; any stage may
/// transition to failed on an unrecoverable error from its own work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Created,
    Fetching,
    Analyzing,
    Generating,
    Formatting,
    Completed,
}

impl PipelineStage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "Cloning Repository",
            Self::Fetching => "Fetching Files",
            Self::Analyzing => "Analyzing Code Structure",
            Self::Generating => "Generating README",
            Self::Formatting => "Formatting Markdown",
            Self::Completed => "Completed",
        }
    }

    pub fn percentage(&self) -> u8 {
        match self {
            Self::Created => 10,
            Self::Fetching => 25,
            Self::Analyzing => 50,
            Self::Generating => 80,
            Self::Formatting => 95,
            Self::Completed => 100,
        }
    }
}

// =============================================================================
// Progress & Result
// =============================================================================

/// Snapshot of where a job currently is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProgress {
    pub stage: String,
    pub percentage: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_file: Option<String>,
}

impl From<PipelineStage> for JobProgress {
    fn from(stage: PipelineStage) -> Self {
        Self {
            stage: stage.label().to_string(),
            percentage: stage.percentage(),
            current_file: None,
        }
    }
}

impl JobProgress {
    /// Progress at a stage with per-file attribution.
    pub fn at_file(stage: PipelineStage, file: impl Into<String>) -> Self {
        Self {
            stage: stage.label().to_string(),
            percentage: stage.percentage(),
            current_file: Some(file.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetadata {
    pub files_analyzed: usize,
    pub functions_found: usize,
    pub classes_found: usize,
    pub endpoints_found: usize,
    pub had_existing_document: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub document: String,
    pub metadata: JobMetadata,
}

// =============================================================================
// Job
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub repo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_context: Option<String>,
    pub status: JobStatus,
    pub progress: JobProgress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// Fresh job in `processing` at the initial stage.
    pub fn new(id: Uuid, repo_url: impl Into<String>, user_context: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            repo_url: repo_url.into(),
            user_context,
            status: JobStatus::Processing,
            progress: PipelineStage::Created.into(),
            created_at: now,
            updated_at: now,
            result: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminality() {
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_stage_order_is_monotonic() {
        assert!(PipelineStage::Created < PipelineStage::Fetching);
        assert!(PipelineStage::Fetching < PipelineStage::Analyzing);
        assert!(PipelineStage::Analyzing < PipelineStage::Generating);
        assert!(PipelineStage::Generating < PipelineStage::Formatting);
        assert!(PipelineStage::Formatting < PipelineStage::Completed);
    }

    #[test]
    fn test_stage_percentages() {
        assert_eq!(PipelineStage::Created.percentage(), 10);
        assert_eq!(PipelineStage::Fetching.percentage(), 25);
        assert_eq!(PipelineStage::Completed.percentage(), 100);
    }

    #[test]
    fn test_new_job_starts_processing() {
        let job = Job::new(Uuid::new_v4(), "https://github.com/a/b", None);
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.progress.stage, "Cloning Repository");
        assert_eq!(job.progress.percentage, 10);
        assert!(job.result.is_none());
        assert!(job.error.is_none());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Processing).unwrap(),
            "\"processing\""
        );
    }
}
