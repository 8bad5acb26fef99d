//! Record source and destination adapters.

pub mod jsonl;
pub mod memory;
pub mod registry;

pub use jsonl::JsonLinesConnector;
pub use memory::InMemoryConnector;
pub use registry::ConnectorRegistry;
