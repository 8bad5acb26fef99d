//! JSON-lines filesystem connector.
//!
//! A resource is a directory. Stream `data` is read from `data.jsonl`, and
//! collection `archive` is appended to `archive.jsonl`. One JSON object per
//! line; blank lines are skipped.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::domain::errors::ConnectorError;
use crate::domain::models::{Batch, Record};
use crate::domain::ports::{RecordDestination, RecordSource};

const EXTENSION: &str = "jsonl";

/// Directory-backed source and destination.
#[derive(Debug, Clone)]
pub struct JsonLinesConnector {
    root: PathBuf,
}

impl JsonLinesConnector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a stream or collection.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{EXTENSION}"))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ConnectorError + '_ {
    move |source| ConnectorError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Parse JSON-lines text into a batch; line numbers in errors are 1-based.
pub fn parse_batch(contents: &str) -> Result<Batch, ConnectorError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let value: serde_json::Value =
                serde_json::from_str(line).map_err(|e| ConnectorError::InvalidRecord {
                    line: i + 1,
                    message: e.to_string(),
                })?;
            Record::try_from(value).map_err(|_| ConnectorError::InvalidRecord {
                line: i + 1,
                message: "expected a JSON object".to_string(),
            })
        })
        .collect()
}

#[async_trait]
impl RecordSource for JsonLinesConnector {
    async fn records(&self, stream: &str) -> Result<Batch, ConnectorError> {
        let path = self.path_for(stream);
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(io_error(&path))?;

        let batch = parse_batch(&contents)?;
        debug!(path = %path.display(), records = batch.len(), "read stream");
        Ok(batch)
    }
}

#[async_trait]
impl RecordDestination for JsonLinesConnector {
    async fn write(&self, batch: Batch, collection: &str) -> Result<(), ConnectorError> {
        if batch.is_empty() {
            debug!(collection, "nothing to write");
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(io_error(&self.root))?;

        let mut buffer = String::new();
        for record in &batch {
            buffer.push_str(&serde_json::to_string(record)?);
            buffer.push('\n');
        }

        let path = self.path_for(collection);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(io_error(&path))?;
        file.write_all(buffer.as_bytes())
            .await
            .map_err(io_error(&path))?;
        file.flush().await.map_err(io_error(&path))?;

        info!(path = %path.display(), records = batch.len(), "wrote collection");
        Ok(())
    }
}
