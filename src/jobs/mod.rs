//! Job Pipeline
//!
//! The job store, the stage-driven pipeline coordinator, and the service
//! facade exposed to the HTTP layer.

pub mod pipeline;
pub mod service;
pub mod store;

pub use pipeline::PipelineCoordinator;
pub use service::{JobService, JobStatusView};
pub use store::{InMemoryJobStore, JobStore, JobUpdate};
