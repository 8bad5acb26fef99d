//! Connector registry.
//!
//! Resolves resource names (as used in the pipeline configuration) to record
//! sources and destinations.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::errors::ConnectorError;
use crate::domain::models::ResourceConfig;
use crate::domain::ports::{RecordDestination, RecordSource};

use super::jsonl::JsonLinesConnector;

/// Registry of named connectors.
#[derive(Default, Clone)]
pub struct ConnectorRegistry {
    sources: HashMap<String, Arc<dyn RecordSource>>,
    destinations: HashMap<String, Arc<dyn RecordDestination>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build connectors for every configured resource.
    pub fn from_resources(resources: &HashMap<String, ResourceConfig>) -> Self {
        let mut registry = Self::new();
        for (name, resource) in resources {
            match resource {
                ResourceConfig::Jsonl { path } => {
                    registry.register(name.clone(), Arc::new(JsonLinesConnector::new(path)));
                }
            }
        }
        registry
    }

    pub fn register_source(&mut self, name: impl Into<String>, source: Arc<dyn RecordSource>) {
        self.sources.insert(name.into(), source);
    }

    pub fn register_destination(
        &mut self,
        name: impl Into<String>,
        destination: Arc<dyn RecordDestination>,
    ) {
        self.destinations.insert(name.into(), destination);
    }

    /// Register a connector that acts as both source and destination.
    pub fn register<C>(&mut self, name: impl Into<String>, connector: Arc<C>)
    where
        C: RecordSource + RecordDestination + 'static,
    {
        let name = name.into();
        self.sources.insert(name.clone(), connector.clone());
        self.destinations.insert(name, connector);
    }

    pub fn source(&self, name: &str) -> Result<Arc<dyn RecordSource>, ConnectorError> {
        self.sources
            .get(name)
            .cloned()
            .ok_or_else(|| ConnectorError::UnknownResource(name.to_string()))
    }

    pub fn destination(&self, name: &str) -> Result<Arc<dyn RecordDestination>, ConnectorError> {
        self.destinations
            .get(name)
            .cloned()
            .ok_or_else(|| ConnectorError::UnknownResource(name.to_string()))
    }
}
