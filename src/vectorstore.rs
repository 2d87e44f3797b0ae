//! Vector store trait: named collections with filtered similarity queries.

use async_trait::async_trait;

use crate::document::{QueryHit, Record};
use crate::error::Result;
use crate::filter::Filter;

/// Collection holding whole contract template records.
pub const COLLECTION_CONTRACTS: &str = "contracts";
/// Collection holding legal regulation records.
pub const COLLECTION_LAWS: &str = "laws";
/// Collection holding fine-grained template segment records.
pub const COLLECTION_SEGMENTS: &str = "segments";

/// The three collections the retrieval engine operates on.
pub const KNOWN_COLLECTIONS: [&str; 3] =
    [COLLECTION_CONTRACTS, COLLECTION_LAWS, COLLECTION_SEGMENTS];

/// A storage backend for vector embeddings with filtered similarity search.
///
/// Implementations manage named, independently-indexed collections of
/// [`Record`]s. Collections are created lazily; upserting or querying a
/// collection brings it into existence. Queries return hits ordered by
/// ascending cosine distance. Concurrent upserts and queries are the
/// backend's responsibility to serialize or safely interleave.
///
/// # Example
///
/// ```rust,ignore
/// use contract_rag::{InMemoryVectorStore, VectorStore, COLLECTION_LAWS};
///
/// let store = InMemoryVectorStore::new();
/// store.upsert(COLLECTION_LAWS, &records).await?;
/// let hits = store.query(COLLECTION_LAWS, &embedding, 10, None, false).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Upsert records into a collection, creating it if needed.
    /// Records must have embeddings set.
    async fn upsert(&self, collection: &str, records: &[Record]) -> Result<()>;

    /// Delete records by their ids from a collection.
    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()>;

    /// Return the `limit` nearest records to `embedding`, restricted to
    /// records matching `filter` when one is given.
    ///
    /// Hits are ordered by ascending distance; stored embeddings are
    /// included only when `include_embeddings` is set.
    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        limit: usize,
        filter: Option<&Filter>,
        include_embeddings: bool,
    ) -> Result<Vec<QueryHit>>;
}
