//! Implementation of the `record-enricher run` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::adapters::connectors::ConnectorRegistry;
use crate::adapters::embeddings::openai::ADA_002_DIMENSION;
use crate::adapters::embeddings::{FixedEmbeddingProvider, OpenAiEmbeddingProvider};
use crate::cli::output::{output, CommandOutput};
use crate::domain::ports::EmbeddingProvider;
use crate::infrastructure::logging::LoggerImpl;
use crate::services::{EnrichmentStage, PipelineReport, PipelineRunner};

use super::load_config;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Configuration file (defaults to .record-enricher/config.yaml)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Attach zero vectors instead of calling the embedding provider
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub success: bool,
    pub dry_run: bool,
    pub provider: &'static str,
    #[serde(flatten)]
    pub report: PipelineReport,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let mut lines = vec![format!(
            "{} {}/{} -> {}/{} ({})",
            console::style("Enriched").green().bold(),
            report.source,
            report.stream,
            report.destination,
            report.collection,
            self.provider,
        )];
        lines.push(format!("  records read:    {}", report.records_read));
        lines.push(format!("  records written: {}", report.records_written));
        if !report.failures.is_empty() {
            lines.push(format!(
                "  {} {}",
                console::style("records failed:").yellow(),
                report.failures.len()
            ));
            for failure in &report.failures {
                lines.push(format!("    - #{}: {}", failure.index, failure.error));
            }
        }
        if self.dry_run {
            lines.push("  (dry run: zero vectors attached)".to_string());
        }
        lines.join("\n")
    }
}

pub async fn execute(args: RunArgs, json_mode: bool) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let _logger = LoggerImpl::init(&config.logging)?;

    let provider: Arc<dyn EmbeddingProvider> = if args.dry_run {
        Arc::new(FixedEmbeddingProvider::zeros(ADA_002_DIMENSION))
    } else {
        Arc::new(
            OpenAiEmbeddingProvider::new(&config.embedding)
                .context("Failed to construct embedding client")?,
        )
    };

    let stage = EnrichmentStage::new(provider, config.enrichment.clone());
    let runner = PipelineRunner::new(
        ConnectorRegistry::from_resources(&config.resources),
        stage,
        config.pipeline.clone(),
    );

    let report = runner.run().await.context("Pipeline run failed")?;

    let output_data = RunOutput {
        success: true,
        dry_run: args.dry_run,
        provider: runner.stage().provider_name(),
        report,
    };
    output(&output_data, json_mode);
    Ok(())
}
