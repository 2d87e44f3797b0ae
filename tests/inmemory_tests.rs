//! Property tests for the in-memory vector store.

use std::collections::HashMap;

use contract_rag::{Filter, InMemoryVectorStore, MetaValue, Record, VectorStore};
use proptest::prelude::*;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

/// Generate a record with a normalized embedding.
fn arb_record(dim: usize) -> impl Strategy<Value = Record> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(id, text, embedding)| Record { id, text, embedding, metadata: HashMap::new() },
    )
}

/// *For any* set of records, querying SHALL return hits ordered by
/// ascending cosine distance, bounded by the limit, and two identical
/// queries against an unchanged store SHALL return identical results.
mod prop_query_ordering_and_idempotence {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn hits_ordered_bounded_and_repeatable(
            records in proptest::collection::vec(arb_record(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            limit in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (first, second, unique_count) = rt.block_on(async {
                let store = InMemoryVectorStore::new();

                // Deduplicate by id; upsert overwrites duplicates.
                let mut deduped: HashMap<String, Record> = HashMap::new();
                for record in &records {
                    deduped.entry(record.id.clone()).or_insert_with(|| record.clone());
                }
                let unique: Vec<Record> = deduped.into_values().collect();
                let count = unique.len();

                store.upsert("contracts", &unique).await.unwrap();
                let first = store.query("contracts", &query, limit, None, false).await.unwrap();
                let second = store.query("contracts", &query, limit, None, false).await.unwrap();
                (first, second, count)
            });

            prop_assert!(first.len() <= limit);
            prop_assert!(first.len() <= unique_count);

            for window in first.windows(2) {
                prop_assert!(
                    window[0].distance <= window[1].distance,
                    "hits not in ascending distance order: {} > {}",
                    window[0].distance,
                    window[1].distance,
                );
            }

            prop_assert_eq!(first.len(), second.len());
            for (a, b) in first.iter().zip(&second) {
                prop_assert_eq!(&a.id, &b.id);
                prop_assert_eq!(a.distance, b.distance);
            }
        }
    }
}

fn record(id: &str, embedding: Vec<f32>, category: &str) -> Record {
    let mut metadata = HashMap::new();
    metadata.insert("category".to_string(), MetaValue::from(category));
    Record { id: id.to_string(), text: format!("text of {id}"), embedding, metadata }
}

#[tokio::test]
async fn query_respects_metadata_filter() {
    let store = InMemoryVectorStore::new();
    store
        .upsert(
            "contracts",
            &[
                record("lease_1", vec![1.0, 0.0], "lease"),
                record("sale_1", vec![1.0, 0.0], "sale"),
                record("lease_2", vec![0.0, 1.0], "lease"),
            ],
        )
        .await
        .unwrap();

    let filter = Filter::new().eq("category", "lease");
    let hits = store.query("contracts", &[1.0, 0.0], 10, Some(&filter), false).await.unwrap();

    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["lease_1", "lease_2"]);

    let filter = Filter::new().any_of("category", ["sale", "loan"]);
    let hits = store.query("contracts", &[1.0, 0.0], 10, Some(&filter), false).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "sale_1");
}

#[tokio::test]
async fn query_on_absent_collection_is_empty() {
    let store = InMemoryVectorStore::new();
    let hits = store.query("laws", &[1.0, 0.0], 5, None, false).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn embeddings_returned_only_when_requested() {
    let store = InMemoryVectorStore::new();
    store.upsert("contracts", &[record("c1", vec![1.0, 0.0], "lease")]).await.unwrap();

    let hits = store.query("contracts", &[1.0, 0.0], 1, None, false).await.unwrap();
    assert!(hits[0].embedding.is_none());

    let hits = store.query("contracts", &[1.0, 0.0], 1, None, true).await.unwrap();
    assert_eq!(hits[0].embedding.as_deref(), Some(&[1.0, 0.0][..]));
}

#[tokio::test]
async fn upsert_overwrites_and_delete_removes() {
    let store = InMemoryVectorStore::new();
    store.upsert("laws", &[record("law_1", vec![1.0, 0.0], "civil")]).await.unwrap();
    store.upsert("laws", &[record("law_1", vec![0.0, 1.0], "civil")]).await.unwrap();
    assert_eq!(store.len("laws").await, 1);

    let hits = store.query("laws", &[0.0, 1.0], 1, None, false).await.unwrap();
    assert!(hits[0].distance < 1e-6);

    store.delete("laws", &["law_1"]).await.unwrap();
    assert_eq!(store.len("laws").await, 0);
}
