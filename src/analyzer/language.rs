//! Language Detection
//!
//! Single source of truth for mapping file paths to language tags.
//! Pure function of the final extension segment; unknown extensions map
//! to `Language::Unknown`. No side effects, no failure mode.

use serde::{Deserialize, Serialize};

/// Semantic language tag for a fetched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
    Go,
    Rust,
    Ruby,
    Unknown,
}

impl Language {
    /// Detect the language from a file path's final extension segment.
    pub fn from_path(path: &str) -> Self {
        let ext = path.rsplit('.').next().unwrap_or("");
        match ext {
            "js" | "jsx" => Self::JavaScript,
            "ts" | "tsx" => Self::TypeScript,
            "py" => Self::Python,
            "java" => Self::Java,
            "go" => Self::Go,
            "rs" => Self::Rust,
            "rb" => Self::Ruby,
            _ => Self::Unknown,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Python => "Python",
            Self::Java => "Java",
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::Ruby => "Ruby",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether a structural extraction strategy exists for this tag.
    /// The JavaScript/TypeScript family gets true parsing; Python gets
    /// line-pattern matching; everything else contributes no facts.
    pub fn has_extractor(&self) -> bool {
        matches!(
            self,
            Self::JavaScript | Self::TypeScript | Self::Python
        )
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Convenience wrapper over [`Language::from_path`].
pub fn detect_language(path: &str) -> Language {
    Language::from_path(path)
}
