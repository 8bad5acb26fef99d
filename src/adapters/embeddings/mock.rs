//! Scriptable embedding provider for tests and benchmarks.
//!
//! Answers deterministically, can be told to fail for specific texts, can
//! simulate per-call latency, and keeps counters of calls and concurrency.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::EmbeddingError;
use crate::domain::ports::EmbeddingProvider;

/// Mock embedding provider.
///
/// Without a fixed vector, every element of the returned vector equals the
/// character count of the input, so results can be matched back to texts.
#[derive(Debug, Default)]
pub struct MockEmbeddingProvider {
    dimension: usize,
    fixed: Option<Vec<f64>>,
    latency: Duration,
    latency_overrides: HashMap<String, Duration>,
    failing: HashSet<String>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl MockEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ..Default::default()
        }
    }

    /// Return `vector` for every successful call.
    #[must_use]
    pub fn with_vector(mut self, vector: Vec<f64>) -> Self {
        self.dimension = vector.len();
        self.fixed = Some(vector);
        self
    }

    /// Sleep this long inside every call.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Sleep `latency` instead of the default for calls with this exact text.
    #[must_use]
    pub fn with_latency_for(mut self, text: impl Into<String>, latency: Duration) -> Self {
        self.latency_overrides.insert(text.into(), latency);
        self
    }

    /// Fail every call whose input equals `text`.
    #[must_use]
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.failing.insert(text.into());
        self
    }

    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of `embed` calls issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were in flight at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Inputs in the order the calls were issued.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    #[allow(clippy::cast_precision_loss)]
    fn vector_for(&self, text: &str) -> Vec<f64> {
        self.fixed
            .clone()
            .unwrap_or_else(|| vec![text.chars().count() as f64; self.dimension])
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(text.to_string());
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let latency = self
            .latency_overrides
            .get(text)
            .copied()
            .unwrap_or(self.latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(text) {
            return Err(EmbeddingError::new(format!("mock failure for {text:?}")));
        }
        Ok(self.vector_for(text))
    }
}
