//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - EmbeddingProvider: text to vector
//! - RecordSource: read a named stream as a batch
//! - RecordDestination: write a batch to a named collection

pub mod connectors;
pub mod embedding;

pub use connectors::{RecordDestination, RecordSource};
pub use embedding::EmbeddingProvider;
