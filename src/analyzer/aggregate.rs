//! Analysis Aggregator
//!
//! Merges per-file fact records into one repository-wide result set.
//! Concatenation preserves file-list order; same-named entities from
//! different files are never deduplicated or merged.

use crate::types::{AnalysisResult, FileFacts};

/// Running counts for progress reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactCounts {
    pub functions: usize,
    pub classes: usize,
    pub endpoints: usize,
}

#[derive(Debug, Default)]
pub struct AnalysisAggregator {
    result: AnalysisResult,
}

impl AnalysisAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one file's facts. Append order is discovery order.
    pub fn absorb(&mut self, facts: FileFacts) {
        self.result.functions.extend(facts.functions);
        self.result.classes.extend(facts.classes);
        self.result.endpoints.extend(facts.endpoints);
        self.result.imports.extend(facts.imports);
    }

    pub fn counts(&self) -> FactCounts {
        FactCounts {
            functions: self.result.functions.len(),
            classes: self.result.classes.len(),
            endpoints: self.result.endpoints.len(),
        }
    }

    pub fn finish(self) -> AnalysisResult {
        self.result
    }
}
