//! Fixed-vector embedding provider.
//!
//! Returns the same vector for every input without any network traffic.
//! Backs `run --dry-run`, where the pipeline wiring is exercised but no
//! provider credential is needed.

use async_trait::async_trait;

use crate::domain::errors::EmbeddingError;
use crate::domain::ports::EmbeddingProvider;

/// Embedding provider that answers every request with one fixed vector.
#[derive(Debug, Clone, Default)]
pub struct FixedEmbeddingProvider {
    vector: Vec<f64>,
}

impl FixedEmbeddingProvider {
    pub fn new(vector: Vec<f64>) -> Self {
        Self { vector }
    }

    /// Zero vector of the given dimension.
    pub fn zeros(dimension: usize) -> Self {
        Self::new(vec![0.0; dimension])
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

#[async_trait]
impl EmbeddingProvider for FixedEmbeddingProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f64>, EmbeddingError> {
        Ok(self.vector.clone())
    }
}
