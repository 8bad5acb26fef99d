//! Record source and destination ports.
//!
//! The enrichment stage never touches these; the pipeline runner reads a
//! batch from a source, hands it to the stage, and passes the result on.

use async_trait::async_trait;

use crate::domain::errors::ConnectorError;
use crate::domain::models::Batch;

/// Supplies records from a named stream.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Read every record currently in `stream`, in stream order.
    async fn records(&self, stream: &str) -> Result<Batch, ConnectorError>;
}

/// Accepts enriched records into a named collection.
#[async_trait]
pub trait RecordDestination: Send + Sync {
    /// Takes ownership of the batch.
    async fn write(&self, batch: Batch, collection: &str) -> Result<(), ConnectorError>;
}
