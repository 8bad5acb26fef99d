//! Pipeline runner.
//!
//! Reads one batch from the configured source stream, runs it through the
//! enrichment stage, and writes the result to the configured destination
//! collection. The destination is only touched after the stage succeeds, so a
//! failed fail-fast batch is never written anywhere.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::adapters::connectors::ConnectorRegistry;
use crate::domain::errors::PipelineError;
use crate::domain::models::PipelineConfig;

use super::enrichment_stage::{EnrichmentStage, RecordFailure};

/// Summary of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub source: String,
    pub stream: String,
    pub destination: String,
    pub collection: String,
    pub records_read: usize,
    pub records_written: usize,
    pub failures: Vec<RecordFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Wires a source, the enrichment stage and a destination together.
pub struct PipelineRunner {
    registry: ConnectorRegistry,
    stage: EnrichmentStage,
    config: PipelineConfig,
}

impl PipelineRunner {
    pub const fn new(
        registry: ConnectorRegistry,
        stage: EnrichmentStage,
        config: PipelineConfig,
    ) -> Self {
        Self {
            registry,
            stage,
            config,
        }
    }

    pub const fn stage(&self) -> &EnrichmentStage {
        &self.stage
    }

    /// Run the pipeline once.
    pub async fn run(&self) -> Result<PipelineReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "pipeline_run",
            %run_id,
            source = %self.config.source,
            destination = %self.config.destination
        );
        self.run_once(run_id).instrument(span).await
    }

    async fn run_once(&self, run_id: Uuid) -> Result<PipelineReport, PipelineError> {
        let config = &self.config;
        let started_at = Utc::now();

        let source = self.registry.source(&config.source)?;
        let batch = source.records(&config.stream).await?;
        let records_read = batch.len();
        info!(stream = %config.stream, records_read, "batch received");

        let outcome = self.stage.process(batch).await?;
        let records_written = outcome.records.len();

        let destination = self.registry.destination(&config.destination)?;
        destination.write(outcome.records, &config.collection).await?;

        let finished_at = Utc::now();
        info!(
            collection = %config.collection,
            records_written,
            failed = outcome.failures.len(),
            "pipeline run complete"
        );

        Ok(PipelineReport {
            run_id,
            source: config.source.clone(),
            stream: config.stream.clone(),
            destination: config.destination.clone(),
            collection: config.collection.clone(),
            records_read,
            records_written,
            failures: outcome.failures,
            started_at,
            finished_at,
        })
    }
}
