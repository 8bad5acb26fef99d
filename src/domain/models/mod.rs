//! Domain models.

pub mod config;
pub mod record;

pub use config::{
    Config, EmbeddingConfig, EnrichmentConfig, FailurePolicy, LogFormat, LoggingConfig,
    PipelineConfig, ResourceConfig, RotationPolicy,
};
pub use record::{Batch, Record};
