//! Record Enricher - embedding enrichment stage for change-data pipelines
//!
//! Takes batches of streamed database-change records, embeds a text field of
//! every record through an external embedding provider, and forwards the
//! enriched batch to a destination collection.
//!
//! # Architecture
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - **Domain Layer** (`domain`): records, configuration models, errors and port traits
//! - **Service Layer** (`services`): the enrichment stage and the pipeline runner
//! - **Adapters** (`adapters`): embedding providers and record connectors
//! - **Infrastructure Layer** (`infrastructure`): configuration loading and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use record_enricher::{EnrichmentStage, FixedEmbeddingProvider, Record};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = Arc::new(FixedEmbeddingProvider::new(vec![0.1, 0.2]));
//!     let stage = EnrichmentStage::with_defaults(provider);
//!
//!     let mut record = Record::new();
//!     record.set("shipping_address", "221B Baker St");
//!
//!     let enriched = stage.enrich(vec![record]).await?;
//!     assert!(enriched[0].get("embedding").is_some());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::connectors::{ConnectorRegistry, InMemoryConnector, JsonLinesConnector};
pub use adapters::embeddings::{FixedEmbeddingProvider, MockEmbeddingProvider, OpenAiEmbeddingProvider};
pub use domain::errors::{
    ConfigError, ConnectorError, EmbeddingError, EnrichmentError, PipelineError, RecordError,
};
pub use domain::models::{
    Batch, Config, EmbeddingConfig, EnrichmentConfig, FailurePolicy, LoggingConfig,
    PipelineConfig, Record, ResourceConfig,
};
pub use domain::ports::{EmbeddingProvider, RecordDestination, RecordSource};
pub use infrastructure::config::ConfigLoader;
pub use services::{EnrichmentOutcome, EnrichmentStage, PipelineReport, PipelineRunner, RecordFailure};
