//! In-memory vector store using cosine distance.
//!
//! [`InMemoryVectorStore`] is a zero-dependency reference backend suitable
//! for development and testing. It evaluates metadata filters in process
//! and produces fully deterministic result ordering: hits are sorted by
//! ascending distance with ties broken by record id (collections iterate in
//! id order, and the sort is stable).

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{QueryHit, Record};
use crate::error::Result;
use crate::filter::Filter;
use crate::vectorstore::VectorStore;

/// An in-memory vector store using cosine distance for search.
///
/// Collections are nested `BTreeMap`s: collection name → record id → record,
/// created lazily on first upsert. All operations are async-safe via
/// `tokio::sync::RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<BTreeMap<String, BTreeMap<String, Record>>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, BTreeMap::len)
    }

    /// Fetch a stored record by id.
    pub async fn get(&self, collection: &str, id: &str) -> Option<Record> {
        let collections = self.collections.read().await;
        collections.get(collection).and_then(|store| store.get(id)).cloned()
    }
}

/// Cosine distance between two vectors: `1 - cosine_similarity`, in `[0, 2]`.
///
/// Returns 1.0 (orthogonal) if either vector has zero magnitude.
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, collection: &str, records: &[Record]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections.entry(collection.to_string()).or_default();
        for record in records {
            store.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(store) = collections.get_mut(collection) {
            for id in ids {
                store.remove(*id);
            }
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        limit: usize,
        filter: Option<&Filter>,
        include_embeddings: bool,
    ) -> Result<Vec<QueryHit>> {
        let collections = self.collections.read().await;
        let Some(store) = collections.get(collection) else {
            // Lazily-created collections: querying an absent one is empty, not an error.
            return Ok(Vec::new());
        };

        let mut hits: Vec<QueryHit> = store
            .values()
            .filter(|record| filter.is_none_or(|f| f.matches(&record.metadata)))
            .map(|record| QueryHit {
                id: record.id.clone(),
                text: record.text.clone(),
                metadata: record.metadata.clone(),
                distance: cosine_distance(&record.embedding, embedding),
                embedding: include_embeddings.then(|| record.embedding.clone()),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(limit);
        Ok(hits)
    }
}
