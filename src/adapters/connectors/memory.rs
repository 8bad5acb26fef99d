//! In-memory connector.
//!
//! Serves pre-seeded streams and captures written collections. Useful for
//! tests and for embedding the stage in a host that already holds records.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::ConnectorError;
use crate::domain::models::Batch;
use crate::domain::ports::{RecordDestination, RecordSource};

#[derive(Debug, Default)]
pub struct InMemoryConnector {
    streams: RwLock<HashMap<String, Batch>>,
    collections: RwLock<HashMap<String, Batch>>,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stream at construction time.
    #[must_use]
    pub fn with_stream(mut self, stream: impl Into<String>, batch: Batch) -> Self {
        self.streams.get_mut().insert(stream.into(), batch);
        self
    }

    pub async fn insert_stream(&self, stream: impl Into<String>, batch: Batch) {
        self.streams.write().await.insert(stream.into(), batch);
    }

    /// Everything written to `collection` so far, in write order.
    pub async fn written(&self, collection: &str) -> Batch {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordSource for InMemoryConnector {
    async fn records(&self, stream: &str) -> Result<Batch, ConnectorError> {
        self.streams
            .read()
            .await
            .get(stream)
            .cloned()
            .ok_or_else(|| ConnectorError::UnknownStream(stream.to_string()))
    }
}

#[async_trait]
impl RecordDestination for InMemoryConnector {
    async fn write(&self, batch: Batch, collection: &str) -> Result<(), ConnectorError> {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .extend(batch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Record;

    fn record(address: &str) -> Record {
        let mut record = Record::new();
        record.set("shipping_address", address);
        record
    }

    #[tokio::test]
    async fn test_seeded_stream_is_readable() {
        let connector = InMemoryConnector::new().with_stream("data", vec![record("a"), record("b")]);
        let batch = connector.records("data").await.unwrap();
        assert_eq!(batch, vec![record("a"), record("b")]);
    }

    #[tokio::test]
    async fn test_unknown_stream() {
        let connector = InMemoryConnector::new();
        let err = connector.records("data").await.unwrap_err();
        assert!(matches!(err, ConnectorError::UnknownStream(name) if name == "data"));
    }

    #[tokio::test]
    async fn test_writes_accumulate_per_collection() {
        let connector = InMemoryConnector::new();
        connector.write(vec![record("a")], "archive").await.unwrap();
        connector.write(vec![record("b")], "archive").await.unwrap();
        connector.write(vec![record("c")], "other").await.unwrap();

        assert_eq!(connector.written("archive").await, vec![record("a"), record("b")]);
        assert_eq!(connector.written("other").await, vec![record("c")]);
        assert!(connector.written("missing").await.is_empty());
    }
}
