//! Implementation of the `record-enricher embed` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::adapters::embeddings::OpenAiEmbeddingProvider;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::ports::EmbeddingProvider;
use crate::infrastructure::logging::LoggerImpl;

use super::load_config;

#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Text to embed
    pub text: String,

    /// Configuration file (defaults to .record-enricher/config.yaml)
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct EmbedOutput {
    pub model: String,
    pub text: String,
    pub dimension: usize,
    pub embedding: Vec<f64>,
}

impl CommandOutput for EmbedOutput {
    fn to_human(&self) -> String {
        let preview: Vec<String> = self.embedding.iter().take(4).map(|v| format!("{v:.4}")).collect();
        format!(
            "{} \"{}\" with {}\n  dimension: {}\n  head:      [{}, ...]",
            console::style("Embedded").green().bold(),
            truncate(&self.text, 48),
            self.model,
            self.dimension,
            preview.join(", ")
        )
    }
}

pub async fn execute(args: EmbedArgs, json_mode: bool) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let _logger = LoggerImpl::init(&config.logging)?;

    let provider = OpenAiEmbeddingProvider::new(&config.embedding)
        .context("Failed to construct embedding client")?;
    let embedding = provider.embed(&args.text).await.context("Embedding request failed")?;

    let output_data = EmbedOutput {
        model: provider.model().to_string(),
        text: args.text,
        dimension: embedding.len(),
        embedding,
    };
    output(&output_data, json_mode);
    Ok(())
}
