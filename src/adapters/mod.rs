//! Adapters for external systems.

pub mod connectors;
pub mod embeddings;
