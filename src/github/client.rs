//! GitHub REST Client
//!
//! Fetches repository metadata, the raw README, and the recursive tree
//! with per-blob content. Requests carry a User-Agent (required by the
//! GitHub API) and an optional token.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{RepoInfo, RepositoryHost};
use crate::analyzer::language::detect_language;
use crate::config::GithubConfig;
use crate::constants::{fetch, network};
use crate::types::{CodeDocsError, FileRecord, Result};

const ACCEPT_JSON: &str = "application/vnd.github.v3+json";
const ACCEPT_RAW: &str = "application/vnd.github.v3.raw";

pub struct GitHubClient {
    api_base: String,
    token: Option<SecretString>,
    max_files: usize,
    max_file_size: u64,
    client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("codedocs/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(network::DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(network::CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| CodeDocsError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone().map(SecretString::from),
            max_files: config.max_files,
            max_file_size: config.max_file_size,
            client,
        })
    }

    fn request(&self, url: &str, accept: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.get(url).header("Accept", accept);
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("token {}", token.expose_secret()));
        }
        req
    }

    async fn fetch_blob(&self, owner: &str, repo: &str, sha: &str) -> Result<String> {
        let url = format!("{}/repos/{}/{}/git/blobs/{}", self.api_base, owner, repo, sha);
        let blob: BlobResponse = self
            .request(&url, ACCEPT_JSON)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| CodeDocsError::Fetch(format!("Failed to fetch blob: {}", e)))?
            .json()
            .await?;

        // Blob content arrives base64-encoded with embedded newlines
        let compact: String = blob.content.split_whitespace().collect();
        let bytes = BASE64
            .decode(compact)
            .map_err(|e| CodeDocsError::Fetch(format!("Invalid blob encoding: {}", e)))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    async fn repository_info(&self, owner: &str, repo: &str) -> Result<RepoInfo> {
        let url = format!("{}/repos/{}/{}", self.api_base, owner, repo);
        let response = self.request(&url, ACCEPT_JSON).send().await?;

        match response.status().as_u16() {
            404 => {
                return Err(CodeDocsError::Fetch(format!(
                    "Repository \"{}/{}\" not found. Please check the URL.",
                    owner, repo
                )));
            }
            403 => {
                return Err(CodeDocsError::Fetch(
                    "Access forbidden. The repository might be private or rate limit exceeded."
                        .to_string(),
                ));
            }
            status if status >= 400 => {
                return Err(CodeDocsError::Fetch(format!(
                    "Failed to fetch repository: HTTP {}",
                    status
                )));
            }
            _ => {}
        }

        let body: RepoResponse = response.json().await?;
        Ok(RepoInfo {
            name: body.name,
            full_name: body.full_name,
            description: body.description,
            language: body.language,
            stars: body.stargazers_count,
            default_branch: body.default_branch,
        })
    }

    async fn readme(&self, owner: &str, repo: &str) -> Option<String> {
        let url = format!("{}/repos/{}/{}/readme", self.api_base, owner, repo);
        let response = self.request(&url, ACCEPT_RAW).send().await.ok()?;

        if !response.status().is_success() {
            warn!("No README found for {}/{}", owner, repo);
            return None;
        }
        response.text().await.ok()
    }

    async fn files(
        &self,
        owner: &str,
        repo: &str,
        default_branch: &str,
    ) -> Result<Vec<FileRecord>> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, owner, repo, default_branch
        );
        let tree: TreeResponse = self
            .request(&url, ACCEPT_JSON)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| CodeDocsError::Fetch(format!("Failed to fetch repository tree: {}", e)))?
            .json()
            .await?;

        let mut files = Vec::new();

        for item in &tree.tree {
            if item.kind != "blob" {
                continue;
            }
            if fetch::EXCLUDE_PATTERNS
                .iter()
                .any(|p| item.path.contains(p))
            {
                continue;
            }
            let eligible = fetch::SUPPORTED_EXTENSIONS
                .iter()
                .any(|ext| item.path.ends_with(&format!(".{}", ext)));
            if !eligible {
                continue;
            }
            let size = item.size.unwrap_or(0);
            if size > self.max_file_size {
                debug!("Skipping oversized file {} ({} bytes)", item.path, size);
                continue;
            }
            if files.len() >= self.max_files {
                warn!("Reached max files limit ({})", self.max_files);
                break;
            }

            match self.fetch_blob(owner, repo, &item.sha).await {
                Ok(content) => files.push(FileRecord {
                    language: detect_language(&item.path),
                    path: item.path.clone(),
                    content,
                    size,
                }),
                Err(e) => warn!("Failed to fetch {}: {}", item.path, e),
            }
        }

        info!("Fetched {} files from {}/{}", files.len(), owner, repo);
        Ok(files)
    }
}

// Response types

#[derive(Debug, Deserialize)]
struct BlobResponse {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    full_name: String,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeItem>,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    sha: String,
    #[serde(default)]
    size: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_from_default_config() {
        let client = GitHubClient::new(&GithubConfig::default()).expect("client");
        assert_eq!(client.api_base, "https://api.github.com");
        assert_eq!(client.max_files, fetch::MAX_FILES);
        assert!(client.token.is_none());
    }

    #[test]
    fn test_tree_item_deserializes() {
        let json = r#"{"path": "src/app.js", "type": "blob", "sha": "abc123", "size": 42}"#;
        let item: TreeItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.path, "src/app.js");
        assert_eq!(item.kind, "blob");
        assert_eq!(item.size, Some(42));
    }
}
