//! Embedding enrichment stage.
//!
//! Fans out one embedding call per record of a batch, attaches each result to
//! its own record, and hands the batch back in input order once every call
//! has settled.
//!
//! All per-record futures are polled by the calling task; nothing is spawned.
//! Each future holds an exclusive `&mut Record` for exactly one position of
//! the batch, so results cannot land on the wrong record and the returned
//! order is the input order by construction.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{EnrichmentError, RecordError};
use crate::domain::models::{Batch, EnrichmentConfig, FailurePolicy, Record};
use crate::domain::ports::EmbeddingProvider;

/// A record that could not be enriched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    /// Position in the input batch.
    pub index: usize,
    /// Why the record failed; serialized as its message.
    #[serde(serialize_with = "serialize_display")]
    pub error: RecordError,
}

fn serialize_display<S: serde::Serializer>(error: &RecordError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

/// Result of running a batch through the stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentOutcome {
    /// Enriched records, in input order.
    pub records: Batch,
    /// Records left out of `records`, sorted by index.
    pub failures: Vec<RecordFailure>,
}

impl EnrichmentOutcome {
    /// Outcome with every record enriched.
    pub const fn complete(records: Batch) -> Self {
        Self {
            records,
            failures: Vec::new(),
        }
    }

    /// Whether no record failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Settlement of one record's call: its index and whether it succeeded.
type Settled = (usize, Result<(), RecordError>);

/// Enrichment stage with an injected embedding provider.
pub struct EnrichmentStage {
    provider: Arc<dyn EmbeddingProvider>,
    config: EnrichmentConfig,
}

impl EnrichmentStage {
    /// Create a stage over `provider` with the given field names and policy.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: EnrichmentConfig) -> Self {
        Self { provider, config }
    }

    /// Stage reading `shipping_address` and writing `embedding`, fail-fast.
    pub fn with_defaults(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::new(provider, EnrichmentConfig::default())
    }

    /// Provider name for diagnostics.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Configuration the stage was built with.
    pub const fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Enrich every record, all or nothing.
    ///
    /// Fails with [`EnrichmentError::BatchEnrichmentFailed`] if any record
    /// fails, reporting the first failure to settle. Calls still in flight
    /// when that failure settles run to completion before this returns; the
    /// batch is consumed either way.
    #[instrument(
        name = "enrich_batch",
        skip_all,
        fields(batch_size = batch.len(), provider = self.provider.name())
    )]
    pub async fn enrich(&self, mut batch: Batch) -> Result<Batch, EnrichmentError> {
        let started = Instant::now();
        let settled = self.settle_all(&mut batch).await;

        let failed = settled.iter().filter(|(_, result)| result.is_err()).count();
        log_summary(batch.len(), failed, started);

        let first_failure = settled
            .into_iter()
            .find_map(|(index, result)| result.err().map(|source| (index, source)));

        match first_failure {
            Some((index, source)) => Err(EnrichmentError::BatchEnrichmentFailed { index, source }),
            None => Ok(batch),
        }
    }

    /// Enrich every record, keeping the ones that succeed.
    ///
    /// Failed records are removed from the batch and reported by index; the
    /// surviving records keep their relative order.
    #[instrument(
        name = "enrich_batch_partial",
        skip_all,
        fields(batch_size = batch.len(), provider = self.provider.name())
    )]
    pub async fn enrich_partial(&self, mut batch: Batch) -> EnrichmentOutcome {
        let started = Instant::now();
        let settled = self.settle_all(&mut batch).await;

        let mut failures: Vec<RecordFailure> = settled
            .into_iter()
            .filter_map(|(index, result)| result.err().map(|error| RecordFailure { index, error }))
            .collect();
        failures.sort_by_key(|failure| failure.index);
        log_summary(batch.len(), failures.len(), started);

        let records = batch
            .into_iter()
            .enumerate()
            .filter(|(index, _)| {
                failures
                    .binary_search_by_key(index, |failure| failure.index)
                    .is_err()
            })
            .map(|(_, record)| record)
            .collect();

        EnrichmentOutcome { records, failures }
    }

    /// Enrich according to the configured [`FailurePolicy`].
    pub async fn process(&self, batch: Batch) -> Result<EnrichmentOutcome, EnrichmentError> {
        match self.config.failure_policy {
            FailurePolicy::FailFast => self.enrich(batch).await.map(EnrichmentOutcome::complete),
            FailurePolicy::Partial => Ok(self.enrich_partial(batch).await),
        }
    }

    /// Run every record's call and wait for all of them, in settle order.
    async fn settle_all(&self, batch: &mut [Record]) -> Vec<Settled> {
        if batch.is_empty() {
            return Vec::new();
        }

        let limit = self.config.max_concurrency.unwrap_or(batch.len()).max(1);

        stream::iter(batch.iter_mut().enumerate())
            .map(|(index, record)| async move { (index, self.enrich_record(index, record).await) })
            .buffer_unordered(limit)
            .collect()
            .await
    }

    async fn enrich_record(&self, index: usize, record: &mut Record) -> Result<(), RecordError> {
        let field = &self.config.source_field;
        let Some(text) = record.get_str(field) else {
            warn!(index, field = %field, "record has no text to embed");
            return Err(RecordError::MissingField {
                field: field.clone(),
            });
        };

        let result = self.provider.embed(text).await;
        match result {
            Ok(vector) => {
                record.set_embedding(&self.config.target_field, &vector);
                debug!(index, dimension = vector.len(), "record enriched");
                Ok(())
            }
            Err(err) => {
                warn!(index, error = %err, "record enrichment failed");
                Err(err.into())
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn log_summary(batch_size: usize, failed: usize, started: Instant) {
    info!(
        batch_size,
        enriched = batch_size - failed,
        failed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch enrichment settled"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::embeddings::{FixedEmbeddingProvider, MockEmbeddingProvider};
    use serde_json::json;
    use std::time::Duration;

    fn record(address: &str) -> Record {
        Record::try_from(json!({ "shipping_address": address })).unwrap()
    }

    fn stage_with(provider: MockEmbeddingProvider) -> (EnrichmentStage, Arc<MockEmbeddingProvider>) {
        let provider = Arc::new(provider);
        (EnrichmentStage::with_defaults(provider.clone()), provider)
    }

    #[tokio::test]
    async fn test_two_addresses_scenario() {
        let stage = EnrichmentStage::with_defaults(Arc::new(FixedEmbeddingProvider::new(vec![0.1, 0.2])));

        let enriched = stage
            .enrich(vec![record("221B Baker St"), record("42 Wallaby Way")])
            .await
            .unwrap();

        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0].get_str("shipping_address"), Some("221B Baker St"));
        assert_eq!(enriched[0].embedding("embedding"), Some(vec![0.1, 0.2]));
        assert_eq!(enriched[1].get_str("shipping_address"), Some("42 Wallaby Way"));
        assert_eq!(enriched[1].embedding("embedding"), Some(vec![0.1, 0.2]));
        // Attached exactly as the provider returned it
        assert_eq!(enriched[0].get("embedding"), Some(&json!([0.1, 0.2])));
        assert_eq!(enriched[1].get("embedding"), Some(&json!([0.1, 0.2])));
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_calls() {
        let (stage, provider) = stage_with(MockEmbeddingProvider::new(4));
        let enriched = stage.enrich(Vec::new()).await.unwrap();
        assert!(enriched.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_each_record_gets_its_own_result() {
        let (stage, provider) = stage_with(MockEmbeddingProvider::new(2));
        let addresses = ["a", "bbb", "cc", "a"];
        let batch = addresses.iter().map(|a| record(a)).collect();

        let enriched = stage.enrich(batch).await.unwrap();

        for (record, address) in enriched.iter().zip(addresses) {
            assert_eq!(record.get_str("shipping_address"), Some(address));
            #[allow(clippy::cast_precision_loss)]
            let expected = address.len() as f64;
            assert_eq!(record.embedding("embedding"), Some(vec![expected; 2]));
        }
        // Identical texts are still embedded independently
        assert_eq!(provider.calls(), 4);
    }

    #[tokio::test]
    async fn test_one_failure_fails_whole_batch() {
        let (stage, provider) = stage_with(MockEmbeddingProvider::new(3).failing_on("bad"));
        let batch = vec![record("ok-1"), record("bad"), record("ok-2")];

        let err = stage.enrich(batch).await.unwrap_err();

        assert_eq!(err.index(), 1);
        match err.record_error() {
            RecordError::Embedding(inner) => assert!(inner.message().contains("bad")),
            other => panic!("Expected embedding failure, got {other:?}"),
        }
        // No cancellation: every call was still issued
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_first_settled_failure_is_reported() {
        let provider = MockEmbeddingProvider::new(1)
            .failing_on("slow")
            .failing_on("fast")
            .with_latency_for("slow", Duration::from_millis(80))
            .with_latency_for("fast", Duration::from_millis(5));
        let (stage, _) = stage_with(provider);

        let err = stage
            .enrich(vec![record("slow"), record("fine"), record("fast")])
            .await
            .unwrap_err();

        assert_eq!(err.index(), 2);
    }

    #[tokio::test]
    async fn test_missing_field_fails_without_a_call() {
        let (stage, provider) = stage_with(MockEmbeddingProvider::new(3));
        let batch = vec![
            record("221B Baker St"),
            Record::try_from(json!({"shipping_address": null, "id": 9})).unwrap(),
        ];

        let err = stage.enrich(batch).await.unwrap_err();

        assert_eq!(err.index(), 1);
        assert_eq!(
            err.record_error(),
            &RecordError::MissingField {
                field: "shipping_address".to_string()
            }
        );
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_reinvocation_overwrites_embedding() {
        let stage = EnrichmentStage::with_defaults(Arc::new(FixedEmbeddingProvider::new(vec![0.5; 4])));
        let batch = vec![Record::try_from(json!({
            "id": 1,
            "shipping_address": "42 Wallaby Way",
            "customer": {"name": "P. Sherman"}
        }))
        .unwrap()];

        let once = stage.enrich(batch).await.unwrap();
        let twice = stage.enrich(once.clone()).await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice[0].len(), 4);
        assert_eq!(twice[0].get("customer"), Some(&json!({"name": "P. Sherman"})));
        assert_eq!(twice[0].embedding("embedding").map(|v| v.len()), Some(4));
    }

    #[tokio::test]
    async fn test_custom_field_names() {
        let config = EnrichmentConfig {
            source_field: "description".to_string(),
            target_field: "description_vector".to_string(),
            ..Default::default()
        };
        let stage = EnrichmentStage::new(Arc::new(FixedEmbeddingProvider::new(vec![1.0])), config);
        let batch = vec![Record::try_from(json!({"description": "blue mug"})).unwrap()];

        let enriched = stage.enrich(batch).await.unwrap();

        assert_eq!(enriched[0].embedding("description_vector"), Some(vec![1.0]));
        assert!(!enriched[0].contains_key("embedding"));
    }

    #[tokio::test]
    async fn test_unbounded_fan_out() {
        let (stage, provider) = stage_with(
            MockEmbeddingProvider::new(2).with_latency(Duration::from_millis(100)),
        );
        let batch: Batch = (0..10).map(|i| record(&format!("{i} Main St"))).collect();

        let started = Instant::now();
        let enriched = stage.enrich(batch).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(enriched.len(), 10);
        assert_eq!(provider.peak_in_flight(), 10);
        assert!(
            elapsed < Duration::from_millis(500),
            "10 calls of 100ms took {elapsed:?}; expected them to overlap"
        );
    }

    #[tokio::test]
    async fn test_bounded_fan_out() {
        let provider = Arc::new(MockEmbeddingProvider::new(2).with_latency(Duration::from_millis(10)));
        let config = EnrichmentConfig {
            max_concurrency: Some(3),
            ..Default::default()
        };
        let stage = EnrichmentStage::new(provider.clone(), config);
        let batch: Batch = (0..12).map(|i| record(&format!("{i} Elm St"))).collect();

        let enriched = stage.enrich(batch).await.unwrap();

        assert_eq!(enriched.len(), 12);
        assert_eq!(provider.calls(), 12);
        assert!(provider.peak_in_flight() <= 3);
        for (i, record) in enriched.iter().enumerate() {
            let expected = format!("{i} Elm St");
            assert_eq!(record.get_str("shipping_address"), Some(expected.as_str()));
        }
    }

    #[tokio::test]
    async fn test_partial_keeps_survivors_in_order() {
        let (stage, _) = stage_with(MockEmbeddingProvider::new(2).failing_on("b").failing_on("d"));
        let batch = ["a", "b", "c", "d", "e"].iter().map(|a| record(a)).collect();

        let outcome = stage.enrich_partial(batch).await;

        let survivors: Vec<_> = outcome
            .records
            .iter()
            .map(|r| r.get_str("shipping_address").unwrap().to_string())
            .collect();
        assert_eq!(survivors, vec!["a", "c", "e"]);
        assert!(outcome.records.iter().all(|r| r.contains_key("embedding")));

        let failed: Vec<_> = outcome.failures.iter().map(|f| f.index).collect();
        assert_eq!(failed, vec![1, 3]);
        assert!(!outcome.is_complete());
    }

    #[tokio::test]
    async fn test_process_follows_policy() {
        let provider = Arc::new(MockEmbeddingProvider::new(2).failing_on("bad"));
        let batch = || vec![record("good"), record("bad")];

        let fail_fast = EnrichmentStage::new(provider.clone(), EnrichmentConfig::default());
        assert!(fail_fast.process(batch()).await.is_err());

        let partial = EnrichmentStage::new(
            provider,
            EnrichmentConfig {
                failure_policy: FailurePolicy::Partial,
                ..Default::default()
            },
        );
        let outcome = partial.process(batch()).await.unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].index, 1);
    }

    #[test]
    fn test_record_failure_serializes_message() {
        let failure = RecordFailure {
            index: 2,
            error: RecordError::MissingField {
                field: "shipping_address".to_string(),
            },
        };
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(
            value,
            json!({"index": 2, "error": "record has no string field `shipping_address`"})
        );
    }
}
