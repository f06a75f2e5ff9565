//! Ollama Generation Backend
//!
//! Request/response and request/stream access to a locally-running Ollama
//! instance. The streaming path consumes newline-delimited JSON chunks and
//! enforces the inactivity window: an attempt fails if no chunk arrives
//! within the configured idle timeout.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{GenerationBackend, GenerationOptions};
use crate::config::GenerationConfig;
use crate::constants::network;
use crate::types::{CodeDocsError, GenerationError, Result};

pub struct OllamaClient {
    api_base: String,
    model: String,
    request_timeout: Duration,
    stream_idle_timeout: Duration,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let api_base = Self::validate_endpoint(&config.api_base)?;

        // No client-wide timeout: streaming responses outlive any fixed
        // total bound and are governed by the inactivity window instead.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(network::CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| CodeDocsError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base,
            model: config.model.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            stream_idle_timeout: Duration::from_secs(config.stream_idle_timeout_secs),
            client,
        })
    }

    /// Only http/https endpoints are accepted; non-localhost hosts get a
    /// warning since the backend is expected to run alongside the service.
    fn validate_endpoint(endpoint: &str) -> Result<String> {
        let url = url::Url::parse(endpoint).map_err(|e| {
            CodeDocsError::Config(format!("Invalid Ollama endpoint URL '{}': {}", endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(CodeDocsError::Config(format!(
                "Ollama endpoint must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        if let Some(host) = url.host_str()
            && !matches!(host, "localhost" | "127.0.0.1" | "::1")
        {
            warn!(
                "Ollama endpoint is not localhost: {}. Ensure this is intentional.",
                host
            );
        }

        let mut result = url.to_string();
        if result.ends_with('/') {
            result.pop();
        }
        Ok(result)
    }

    fn build_request(&self, prompt: &str, options: &GenerationOptions, stream: bool) -> OllamaRequest {
        OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream,
            options: OllamaOptions {
                temperature: options.temperature,
                num_predict: options.num_predict,
                num_ctx: options.num_ctx,
                top_p: options.top_p,
            },
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_connect() {
            GenerationError::Request(format!(
                "Failed to connect to Ollama at {}. Is Ollama running? Start with: ollama serve",
                self.api_base
            ))
        } else {
            GenerationError::Request(format!("Ollama request failed: {}", e))
        }
    }
}

#[async_trait]
impl GenerationBackend for OllamaClient {
    async fn complete(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> std::result::Result<String, GenerationError> {
        debug!(
            "Requesting completion (model: {}, {} prompt chars)",
            self.model,
            prompt.len()
        );

        let url = format!("{}/api/generate", self.api_base);
        let request = self.build_request(prompt, options, false);

        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, message });
        }

        let body: OllamaResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Request(format!("Failed to parse response: {}", e)))?;

        Ok(body.response.trim().to_string())
    }

    async fn complete_stream(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> std::result::Result<String, GenerationError> {
        debug!(
            "Requesting streamed completion (model: {}, {} prompt chars)",
            self.model,
            prompt.len()
        );

        let url = format!("{}/api/generate", self.api_base);
        let request = self.build_request(prompt, options, true);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, message });
        }

        let mut stream = Box::pin(response.bytes_stream());
        let mut accumulated = String::new();
        let mut buffer = String::new();

        loop {
            // Await the next chunk or the inactivity window, whichever first
            let next = tokio::time::timeout(self.stream_idle_timeout, stream.next()).await;
            match next {
                Err(_) => {
                    warn!(
                        "No data received for {} seconds",
                        self.stream_idle_timeout.as_secs()
                    );
                    return Err(GenerationError::StreamTimeout);
                }
                Ok(None) => break,
                Ok(Some(Err(e))) => {
                    return Err(GenerationError::Request(format!("Stream error: {}", e)));
                }
                Ok(Some(Ok(chunk))) => {
                    buffer.push_str(&String::from_utf8_lossy(&chunk));
                    while let Some(pos) = buffer.find('\n') {
                        let line: String = buffer.drain(..=pos).collect();
                        if let Some(done) = consume_chunk_line(line.trim(), &mut accumulated) {
                            if done {
                                return finish_stream(accumulated);
                            }
                        }
                    }
                }
            }
        }

        // Natural end without an explicit done signal: keep whatever arrived
        if !buffer.trim().is_empty() {
            consume_chunk_line(buffer.trim(), &mut accumulated);
        }
        finish_stream(accumulated)
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.api_base);

        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                if let Ok(tags) = resp.json::<OllamaTagsResponse>().await {
                    let available = tags.models.iter().any(|m| {
                        m.name == self.model
                            || m.name.starts_with(&self.model.replace(":latest", ""))
                    });
                    if !available {
                        warn!(
                            "Ollama is running but model '{}' not found. Pull with: ollama pull {}",
                            self.model, self.model
                        );
                    }
                    available
                } else {
                    info!("Ollama is available");
                    true
                }
            }
            Ok(resp) => {
                warn!("Ollama API check failed: {}", resp.status());
                false
            }
            Err(e) => {
                warn!("Ollama not available: {}. Start with: ollama serve", e);
                false
            }
        }
    }
}

/// Parse one newline-delimited JSON chunk, appending any text to the
/// accumulator. Returns Some(done-flag) for well-formed chunks; malformed
/// lines are skipped.
fn consume_chunk_line(line: &str, accumulated: &mut String) -> Option<bool> {
    if line.is_empty() {
        return None;
    }
    let chunk: StreamChunk = serde_json::from_str(line).ok()?;
    if let Some(text) = chunk.response {
        accumulated.push_str(&text);
    }
    Some(chunk.done.unwrap_or(false))
}

/// A completed stream that produced zero bytes is a failed attempt.
fn finish_stream(accumulated: String) -> std::result::Result<String, GenerationError> {
    let text = accumulated.trim().to_string();
    if text.is_empty() {
        Err(GenerationError::EmptyStream)
    } else {
        debug!("Stream complete: {} chars", text.len());
        Ok(text)
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_ctx: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    done: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_endpoint_schemes() {
        assert!(OllamaClient::validate_endpoint("http://localhost:11434").is_ok());
        assert!(OllamaClient::validate_endpoint("https://localhost:11434").is_ok());
        assert!(OllamaClient::validate_endpoint("ftp://localhost:11434").is_err());
        assert!(OllamaClient::validate_endpoint("not a url").is_err());
    }

    #[test]
    fn test_validate_endpoint_strips_trailing_slash() {
        let cleaned = OllamaClient::validate_endpoint("http://localhost:11434/").unwrap();
        assert_eq!(cleaned, "http://localhost:11434");
    }

    #[test]
    fn test_consume_chunk_line_accumulates() {
        let mut acc = String::new();
        let done = consume_chunk_line(r#"{"response": "Hello ", "done": false}"#, &mut acc);
        assert_eq!(done, Some(false));
        let done = consume_chunk_line(r#"{"response": "world", "done": true}"#, &mut acc);
        assert_eq!(done, Some(true));
        assert_eq!(acc, "Hello world");
    }

    #[test]
    fn test_consume_chunk_line_skips_garbage() {
        let mut acc = String::new();
        assert_eq!(consume_chunk_line("not json", &mut acc), None);
        assert_eq!(consume_chunk_line("", &mut acc), None);
        assert!(acc.is_empty());
    }

    #[test]
    fn test_finish_stream_rejects_empty() {
        assert!(matches!(
            finish_stream(String::new()),
            Err(GenerationError::EmptyStream)
        ));
        assert!(matches!(
            finish_stream("   \n".to_string()),
            Err(GenerationError::EmptyStream)
        ));
        assert_eq!(finish_stream("text".to_string()).unwrap(), "text");
    }

    #[test]
    fn test_default_config_client() {
        let client = OllamaClient::new(&GenerationConfig::default()).expect("client");
        assert_eq!(client.api_base, "http://localhost:11434");
        assert_eq!(client.model(), "llama3:8b");
    }
}
