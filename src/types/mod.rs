//! Core Domain Types
//!
//! Structural fact records, job lifecycle types, and the unified error type.

pub mod error;
pub mod facts;
pub mod job;

pub use error::{CodeDocsError, GenerationError, Result};
pub use facts::{
    AnalysisResult, ClassFact, EndpointFact, FileFacts, FileRecord, FunctionFact, HttpMethod,
};
pub use job::{Job, JobMetadata, JobProgress, JobResult, JobStatus, PipelineStage};
