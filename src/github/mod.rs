//! GitHub Repository Access
//!
//! URL parsing and validation, repository metadata, and the
//! [`RepositoryHost`] seam the pipeline fetches through. Filtering rules
//! (extension allow-list, path exclude-list, file-count and blob-size
//! bounds) live in this collaborator, not in the analysis core.

mod client;

pub use client::GitHubClient;

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{CodeDocsError, FileRecord, Result};

// =============================================================================
// Repository Metadata
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoInfo {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub default_branch: String,
}

// =============================================================================
// URL Parsing & Validation
// =============================================================================

static REPO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?github\.com/[\w-]+/[\w.-]+/?$").expect("repo url pattern")
});

static OWNER_REPO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"github\.com/([^/]+)/([^/]+)").expect("owner/repo pattern"));

/// Validate a user-supplied repository URL. Runs synchronously before any
/// job is created; the message is surfaced to the caller as-is.
pub fn validate_repo_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(CodeDocsError::InvalidRepoUrl("URL is required".to_string()));
    }
    if !REPO_URL_RE.is_match(url) {
        return Err(CodeDocsError::InvalidRepoUrl(
            "Please enter a valid GitHub repository URL (e.g., https://github.com/username/repo)"
                .to_string(),
        ));
    }
    Ok(())
}

/// Extract `(owner, repo)` from a GitHub URL, stripping any `.git` suffix.
pub fn parse_repo_url(url: &str) -> Result<(String, String)> {
    let caps = OWNER_REPO_RE
        .captures(url)
        .ok_or_else(|| CodeDocsError::InvalidRepoUrl("Invalid GitHub URL".to_string()))?;

    let owner = caps[1].to_string();
    let repo = caps[2].trim_end_matches('/').trim_end_matches(".git").to_string();
    Ok((owner, repo))
}

// =============================================================================
// Repository Host Seam
// =============================================================================

/// Source-host operations the pipeline consumes. [`GitHubClient`] is the
/// production implementation; tests substitute their own.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Repository metadata, or a fetch error with a caller-facing message.
    async fn repository_info(&self, owner: &str, repo: &str) -> Result<RepoInfo>;

    /// Existing top-level README text. Absence is not an error.
    async fn readme(&self, owner: &str, repo: &str) -> Option<String>;

    /// The filtered, size/count-bounded file list in tree order.
    async fn files(&self, owner: &str, repo: &str, default_branch: &str)
    -> Result<Vec<FileRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_plain_repo_urls() {
        assert!(validate_repo_url("https://github.com/rust-lang/rust").is_ok());
        assert!(validate_repo_url("http://www.github.com/a/b").is_ok());
        assert!(validate_repo_url("https://github.com/user/repo.name/").is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        assert!(validate_repo_url("").is_err());
        assert!(validate_repo_url("github.com/a/b").is_err());
        assert!(validate_repo_url("https://gitlab.com/a/b").is_err());
        assert!(validate_repo_url("https://github.com/only-owner").is_err());
        assert!(validate_repo_url("https://github.com/a/b/tree/main").is_err());
    }

    #[test]
    fn test_parse_owner_repo() {
        let (owner, repo) = parse_repo_url("https://github.com/rust-lang/rust").unwrap();
        assert_eq!(owner, "rust-lang");
        assert_eq!(repo, "rust");
    }

    #[test]
    fn test_parse_strips_git_suffix() {
        let (_, repo) = parse_repo_url("https://github.com/user/project.git").unwrap();
        assert_eq!(repo, "project");
    }

    #[test]
    fn test_parse_rejects_non_github() {
        assert!(parse_repo_url("https://example.com/a/b").is_err());
    }
}
