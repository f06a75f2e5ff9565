//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/codedocs/) and project (.codedocs/) level
//! configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{fetch, generation, network};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// GitHub API access settings
    pub github: GithubConfig,

    /// Generation backend settings
    pub generation: GenerationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            github: GithubConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `CodeDocsError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if self.server.port == 0 {
            return Err(crate::types::CodeDocsError::Config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(crate::types::CodeDocsError::Config(format!(
                "generation.temperature must be between 0.0 and 2.0, got {}",
                self.generation.temperature
            )));
        }

        if self.generation.max_attempts == 0 {
            return Err(crate::types::CodeDocsError::Config(
                "generation.max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.generation.request_timeout_secs == 0 {
            return Err(crate::types::CodeDocsError::Config(
                "generation.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.github.max_files == 0 {
            return Err(crate::types::CodeDocsError::Config(
                "github.max_files must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

// =============================================================================
// GitHub Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// API base URL (overridable for GitHub Enterprise)
    pub api_base: String,

    /// Personal access token. Never serialized to output.
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Maximum files fetched per repository
    pub max_files: usize,

    /// Per-blob size ceiling in bytes
    pub max_file_size: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            token: None,
            max_files: fetch::MAX_FILES,
            max_file_size: fetch::MAX_FILE_SIZE,
        }
    }
}

// =============================================================================
// Generation Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Ollama endpoint
    pub api_base: String,

    /// Model identifier
    pub model: String,

    /// Default sampling temperature (per-operation presets override this)
    pub temperature: f32,

    /// Timeout for non-streaming requests (seconds)
    pub request_timeout_secs: u64,

    /// Stream inactivity window (seconds)
    pub stream_idle_timeout_secs: u64,

    /// Attempts for the long-form README call
    pub max_attempts: u32,

    /// Fixed backoff between attempts (seconds)
    pub retry_backoff_secs: u64,

    /// Minimum accepted length of generated text
    pub min_viable_chars: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:11434".to_string(),
            model: "llama3:8b".to_string(),
            temperature: 0.4,
            request_timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            stream_idle_timeout_secs: generation::STREAM_IDLE_TIMEOUT_SECS,
            max_attempts: generation::MAX_ATTEMPTS,
            retry_backoff_secs: generation::RETRY_BACKOFF_SECS,
            min_viable_chars: generation::MIN_VIABLE_CHARS,
        }
    }
}
