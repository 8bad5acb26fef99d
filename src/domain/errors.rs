//! Domain errors for the record enricher.

use std::path::PathBuf;

use thiserror::Error;

/// A single embedding call failed.
///
/// Transport errors, authentication failures, rate limits and malformed
/// provider responses all collapse into this one kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("embedding failed: {message}")]
pub struct EmbeddingError {
    message: String,
}

impl EmbeddingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Provider or transport detail for this failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Why a single record could not be enriched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("record has no string field `{field}`")]
    MissingField { field: String },
}

/// Stage-level failure for a whole batch.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// Raised when any record of a fail-fast batch fails; carries the first
    /// failure to settle.
    #[error("batch enrichment failed at record {index}")]
    BatchEnrichmentFailed {
        index: usize,
        #[source]
        source: RecordError,
    },
}

impl EnrichmentError {
    /// Position in the input batch of the record that triggered the failure.
    pub const fn index(&self) -> usize {
        match self {
            Self::BatchEnrichmentFailed { index, .. } => *index,
        }
    }

    pub const fn record_error(&self) -> &RecordError {
        match self {
            Self::BatchEnrichmentFailed { source, .. } => source,
        }
    }
}

/// Configuration errors, raised at load or client-construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Embedding API key not set. Set OPENAI_API_KEY or configure embedding.api_key")]
    MissingApiKey,

    #[error("Embedding model cannot be empty")]
    EmptyModel,

    #[error("Embedding base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid max_concurrency: {0}. Must be at least 1")]
    InvalidMaxConcurrency(usize),

    #[error("Field name `{0}` cannot be empty")]
    EmptyFieldName(&'static str),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Pipeline references unknown resource `{0}`")]
    UnknownResource(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Errors raised by record sources and destinations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Unknown stream: {0}")]
    UnknownStream(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from one end-to-end pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),
}
