use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure for the record enricher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Embedding provider configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Enrichment stage configuration
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Source stream and destination collection for a pipeline run
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Named connector resources
    #[serde(default = "default_resources")]
    pub resources: HashMap<String, ResourceConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            enrichment: EnrichmentConfig::default(),
            pipeline: PipelineConfig::default(),
            resources: default_resources(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_resources() -> HashMap<String, ResourceConfig> {
    [default_source(), default_destination()]
        .into_iter()
        .map(|name| {
            let path = PathBuf::from(".record-enricher/data").join(&name);
            (name, ResourceConfig::Jsonl { path })
        })
        .collect()
}

/// Embedding provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Bearer credential. Falls back to `OPENAI_API_KEY` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the embeddings API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Embedding model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Transport timeout per request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "text-embedding-ada-002".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// What the stage does when some records fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Any failed record fails the whole batch; nothing is returned.
    #[default]
    FailFast,
    /// Failed records are dropped and reported next to the survivors.
    Partial,
}

/// Enrichment stage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EnrichmentConfig {
    /// Attribute holding the text to embed
    #[serde(default = "default_source_field")]
    pub source_field: String,

    /// Attribute that receives the embedding vector
    #[serde(default = "default_target_field")]
    pub target_field: String,

    /// Batch failure policy
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Upper bound on in-flight embedding calls; unbounded when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
}

fn default_source_field() -> String {
    "shipping_address".to_string()
}

fn default_target_field() -> String {
    "embedding".to_string()
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            source_field: default_source_field(),
            target_field: default_target_field(),
            failure_policy: FailurePolicy::default(),
            max_concurrency: None,
        }
    }
}

/// Pipeline wiring: where records come from and where they go
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Resource name of the record source
    #[serde(default = "default_source")]
    pub source: String,

    /// Stream read from the source
    #[serde(default = "default_stream")]
    pub stream: String,

    /// Resource name of the record destination
    #[serde(default = "default_destination")]
    pub destination: String,

    /// Collection written on the destination
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_source() -> String {
    "pg_db".to_string()
}

fn default_stream() -> String {
    "data".to_string()
}

fn default_destination() -> String {
    "destination_name".to_string()
}

fn default_collection() -> String {
    "collection_archive".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            stream: default_stream(),
            destination: default_destination(),
            collection: default_collection(),
        }
    }
}

/// A named connector resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceConfig {
    /// Directory of `<stream>.jsonl` files
    Jsonl { path: PathBuf },
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Log file rotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for log files; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Rotation of the log file
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}
