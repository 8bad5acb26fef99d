//! Embedding provider adapters.

pub mod fixed;
pub mod mock;
pub mod openai;

pub use fixed::FixedEmbeddingProvider;
pub use mock::MockEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;
