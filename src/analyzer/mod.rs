//! Code Analysis
//!
//! Language detection, per-file structural extraction, and repository-wide
//! aggregation.

pub mod aggregate;
pub mod extractor;
pub mod language;

pub use aggregate::{AnalysisAggregator, FactCounts};
pub use extractor::extract;
pub use language::{Language, detect_language};
