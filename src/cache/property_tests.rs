//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check key derivation and facade behaviour over generated inputs.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{json, Value};

use crate::backend::MemoryBackend;
use crate::cache::{derive_key, Artifact, Category, ResultCache};
use crate::config::CacheSettings;

// == Strategies ==
fn category_strategy() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::RemoteResource),
        Just(Category::BulkUpload),
        Just(Category::SingleItem),
    ]
}

/// Generates content already in normalized form (lowercase, no outer whitespace)
fn normalized_content_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9:/._,-]{0,64}"
}

/// Whitespace padding that normalization strips
fn padding_strategy() -> impl Strategy<Value = String> {
    "[ \t\n]{0,4}"
}

/// Generates a structured result with nested sequences and mappings
fn result_strategy() -> impl Strategy<Value = Value> {
    (
        0u32..10_000,
        0u32..10_000,
        prop::collection::vec(("[a-z ]{0,20}", any::<bool>()), 0..8),
    )
        .prop_map(|(total, valid, items)| {
            json!({
                "total": total,
                "valid": valid,
                "items": items
                    .into_iter()
                    .map(|(text, ok)| json!({"text": text, "is_requirement": ok}))
                    .collect::<Vec<_>>(),
            })
        })
}

fn memory_cache() -> ResultCache {
    tokio_test::block_on(ResultCache::with_backend(
        Arc::new(MemoryBackend::new()),
        CacheSettings::default(),
    ))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Same content and category always derive the same key
    #[test]
    fn prop_key_determinism(content in ".{0,128}", category in category_strategy()) {
        prop_assert_eq!(derive_key(&content, category), derive_key(&content, category));
    }

    // Case and surrounding whitespace never change the key
    #[test]
    fn prop_normalization_invariance(
        content in normalized_content_strategy(),
        left in padding_strategy(),
        right in padding_strategy(),
        category in category_strategy()
    ) {
        let noisy = format!("{}{}{}", left, content.to_uppercase(), right);
        prop_assert_eq!(derive_key(&noisy, category), derive_key(&content, category));
    }

    // Namespaces keep categories apart even on identical content
    #[test]
    fn prop_category_isolation_of_keys(
        content in ".{0,64}",
        a in category_strategy(),
        b in category_strategy()
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(derive_key(&content, a), derive_key(&content, b));
    }

    // Every key is "<namespace>:<64 lowercase hex chars>"
    #[test]
    fn prop_key_shape(content in ".{0,64}", category in category_strategy()) {
        let key = derive_key(&content, category);
        let expected_prefix = format!("{}:", category.namespace());
        prop_assert!(key.starts_with(&expected_prefix));

        let digest = &key[expected_prefix.len()..];
        prop_assert_eq!(digest.len(), 64);
        prop_assert!(digest.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // A lookup after a store returns the same result and artifact,
    // and a different category still misses
    #[test]
    fn prop_store_lookup_roundtrip(
        content in normalized_content_strategy(),
        category in category_strategy(),
        other in category_strategy(),
        result in result_strategy(),
        artifact in prop::collection::vec(any::<u8>(), 0..512)
    ) {
        let cache = memory_cache();
        let artifact = Artifact::new(artifact);

        tokio_test::block_on(async {
            cache.store(&content, category, &result, &artifact).await.unwrap();

            let entry = cache
                .lookup::<Value>(&content.to_uppercase(), category)
                .await
                .unwrap()
                .expect("stored entry should be found");
            assert_eq!(entry.result, result);
            assert_eq!(entry.artifact, artifact);

            if other != category {
                assert!(cache.lookup::<Value>(&content, other).await.unwrap().is_none());
            }
        });
    }

    // A second store fully replaces the first
    #[test]
    fn prop_last_writer_wins(
        content in normalized_content_strategy(),
        first in result_strategy(),
        second in result_strategy()
    ) {
        let cache = memory_cache();

        tokio_test::block_on(async {
            let category = Category::SingleItem;
            let (one, two) = (Artifact::new(b"one".to_vec()), Artifact::new(b"two".to_vec()));
            cache.store(&content, category, &first, &one).await.unwrap();
            cache.store(&content, category, &second, &two).await.unwrap();

            let entry = cache.lookup::<Value>(&content, category).await.unwrap().unwrap();
            assert_eq!(entry.result, second);
            assert_eq!(entry.artifact.as_bytes(), b"two");
        });
    }
}
