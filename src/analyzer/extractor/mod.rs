//! Structural Extractor
//!
//! Language-dispatched fact extraction with per-file failure isolation.
//! True parsing is used only where a suitable grammar exists (the
//! JavaScript/TypeScript family); Python falls back to bounded-effort
//! line-pattern matching. Other languages contribute no facts.

mod javascript;
mod python;

use tracing::warn;

use crate::analyzer::language::Language;
use crate::types::FileFacts;

/// Extract structural facts from one file. Never raises to the caller:
/// a parse failure yields an empty fact record and a log line, preserving
/// repository-wide analysis despite individual malformed files.
pub fn extract(content: &str, path: &str, language: Language) -> FileFacts {
    let outcome = match language {
        Language::JavaScript | Language::TypeScript => javascript::extract(content, path),
        Language::Python => python::extract(content, path),
        _ => return FileFacts::default(),
    };

    match outcome {
        Ok(facts) => facts,
        Err(e) => {
            warn!("Failed to analyze {}: {}", path, e);
            FileFacts::default()
        }
    }
}
