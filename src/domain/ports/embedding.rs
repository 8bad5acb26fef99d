//! Embedding provider port.
//!
//! Converts one text into one dense vector. Implementations issue exactly one
//! request per call and do not cache, retry, or check dimensionality.

use async_trait::async_trait;

use crate::domain::errors::EmbeddingError;

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "openai", "fixed").
    fn name(&self) -> &'static str;

    /// Generate an embedding for a single text.
    ///
    /// Empty text is passed to the provider unchanged.
    async fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingError>;
}
