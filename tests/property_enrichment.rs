//! Property-based tests for enrichment stage invariants
//!
//! 1. Order and length: output[i] is input[i] plus its embedding
//! 2. Pass-through: every non-target field survives unchanged
//! 3. Partial split: survivors + failures == input, failures sorted by index

use std::sync::Arc;

use proptest::prelude::*;
use record_enricher::{
    EnrichmentConfig, EnrichmentStage, FailurePolicy, MockEmbeddingProvider, Record,
};

mod common;

fn address_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 ,.#-]{0,40}").expect("Valid regex")
}

fn batch_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(address_strategy(), 0..24)
}

fn batch_of(addresses: &[String]) -> Vec<Record> {
    addresses
        .iter()
        .enumerate()
        .map(|(i, address)| {
            let mut record = common::address_record(address);
            record.set("position", i);
            record
        })
        .collect()
}

proptest! {
    #[test]
    fn proptest_enrich_preserves_order_and_length(
        addresses in batch_strategy(),
        limit in prop::option::of(1usize..6),
    ) {
        let config = EnrichmentConfig { max_concurrency: limit, ..Default::default() };
        let provider = Arc::new(MockEmbeddingProvider::new(2));
        let stage = EnrichmentStage::new(provider.clone(), config);

        let enriched = tokio_test::block_on(stage.enrich(batch_of(&addresses))).unwrap();

        prop_assert_eq!(enriched.len(), addresses.len());
        prop_assert_eq!(provider.calls(), addresses.len());
        for (i, (record, address)) in enriched.iter().zip(&addresses).enumerate() {
            prop_assert_eq!(record.get("position"), Some(&serde_json::json!(i)));
            prop_assert_eq!(record.get_str("shipping_address"), Some(address.as_str()));
            let expected = address.chars().count() as f64;
            prop_assert_eq!(record.embedding("embedding"), Some(vec![expected; 2]));
        }
    }

    #[test]
    fn proptest_partial_split_accounts_for_every_record(
        addresses in batch_strategy(),
        poison in address_strategy(),
    ) {
        let config = EnrichmentConfig {
            failure_policy: FailurePolicy::Partial,
            ..Default::default()
        };
        let provider = Arc::new(MockEmbeddingProvider::new(1).failing_on(poison.clone()));
        let stage = EnrichmentStage::new(provider, config);

        let outcome = tokio_test::block_on(stage.enrich_partial(batch_of(&addresses)));

        let expected_failures: Vec<usize> = addresses
            .iter()
            .enumerate()
            .filter(|(_, a)| **a == poison)
            .map(|(i, _)| i)
            .collect();
        let failed: Vec<usize> = outcome.failures.iter().map(|f| f.index).collect();

        prop_assert_eq!(&failed, &expected_failures);
        prop_assert_eq!(outcome.records.len() + failed.len(), addresses.len());
        prop_assert_eq!(outcome.is_complete(), expected_failures.is_empty());

        // Survivors keep their relative input order
        let positions: Vec<u64> = outcome
            .records
            .iter()
            .filter_map(|r| r.get("position").and_then(serde_json::Value::as_u64))
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
