//! Service layer: the enrichment stage and the pipeline that drives it.

pub mod enrichment_stage;
pub mod pipeline;

pub use enrichment_stage::{EnrichmentOutcome, EnrichmentStage, RecordFailure};
pub use pipeline::{PipelineReport, PipelineRunner};
