//! OpenAI embedding provider adapter.
//!
//! Issues one `/v1/embeddings` request per text and returns the vector in
//! the first element of the response's `data` array. Compatible with any
//! OpenAI-compatible embedding API reachable at `base_url`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::errors::{ConfigError, EmbeddingError};
use crate::domain::models::EmbeddingConfig;
use crate::domain::ports::EmbeddingProvider;

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Output dimension of `text-embedding-ada-002`.
pub const ADA_002_DIMENSION: usize = 1536;

/// OpenAI embedding provider.
///
/// The credential is resolved once at construction and never rotated.
/// `reqwest::Client` is internally reference counted, so clones share one
/// connection pool.
#[derive(Clone)]
pub struct OpenAiEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, ConfigError> {
        let api_key = resolve_api_key(config)?;

        if config.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if config.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn resolve_api_key(config: &EmbeddingConfig) -> Result<String, ConfigError> {
    config
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty()))
        .ok_or(ConfigError::MissingApiKey)
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip_all, fields(model = %self.model, chars = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingError> {
        let request_body = EmbeddingsRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmbeddingError::new(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(EmbeddingError::new(format!("provider returned {status}: {body}")));
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::new(format!("malformed response: {e}")))?;

        let embedding = result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::new("response contained no embedding data"))?;

        debug!(dimension = embedding.len(), "embedding received");
        Ok(embedding)
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}
