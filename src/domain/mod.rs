//! Domain layer for the record enricher
//!
//! This module contains the record model, configuration models, error types
//! and the port traits implemented by adapters.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{
    ConfigError, ConnectorError, EmbeddingError, EnrichmentError, PipelineError, RecordError,
};
