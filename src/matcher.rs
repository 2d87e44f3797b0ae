//! Retrieval orchestrator: filtered similarity queries and dual matching.
//!
//! The read path. [`Matcher::similarity_query`] runs one filtered
//! nearest-neighbor search against a named collection and converts store
//! distances into similarity scores. [`Matcher::dual_match`] fans out to
//! all three collections and assembles the composite [`MatchBundle`] that
//! grounds contract generation.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{error, info};

use crate::config::RetrievalConfig;
use crate::document::{MatchBundle, MetaValue, ScoredMatch};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::filter::Filter;
use crate::vectorstore::{
    COLLECTION_CONTRACTS, COLLECTION_LAWS, COLLECTION_SEGMENTS, KNOWN_COLLECTIONS, VectorStore,
};

/// Hard cap on any single query's result set.
const MAX_QUERY_RESULTS: usize = 100;

/// How many alternative contracts a bundle carries at most.
const MAX_ALTERNATIVES: usize = 3;

/// Read-only retrieval over the three collections.
///
/// Holds long-lived handles to the embedder and store; all operations are
/// idempotent for a fixed corpus and query.
///
/// # Example
///
/// ```rust,ignore
/// use contract_rag::{Filter, Matcher, RetrievalConfig};
///
/// let matcher = Matcher::new(RetrievalConfig::default(), embedder, store);
/// let filter = Filter::new().eq("category", "lease");
/// let bundle = matcher.dual_match("房屋租赁合同", Some(filter)).await?;
/// ```
pub struct Matcher {
    config: RetrievalConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl Matcher {
    /// Create a matcher over the given embedder and store handles.
    pub fn new(
        config: RetrievalConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self { config, embedder, store }
    }

    /// Return a reference to the matcher configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Run one similarity search against a named collection.
    ///
    /// The query text is embedded once, the collection queried for the top
    /// `limit` (capped at 100) nearest records under `filters`, and each
    /// hit's distance converted to `similarity = 1 - distance`. Results
    /// come back in store order (ascending distance). Stored embeddings are
    /// attached for contract hits; segment hits carry their owning
    /// `template_id` read from metadata.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyInput`] for an empty or whitespace-only query,
    ///   raised before any external call.
    /// - [`RagError::UnknownCollection`] when `collection` is not one of
    ///   `contracts`, `laws`, `segments`.
    /// - Embedder and store errors propagate unchanged.
    pub async fn similarity_query(
        &self,
        collection: &str,
        query: &str,
        filters: Option<&Filter>,
        limit: usize,
    ) -> Result<Vec<ScoredMatch>> {
        if query.trim().is_empty() {
            return Err(RagError::EmptyInput("query text".to_string()));
        }
        if !KNOWN_COLLECTIONS.contains(&collection) {
            return Err(RagError::UnknownCollection(collection.to_string()));
        }

        let embedding = self.embedder.embed(query).await.map_err(|e| {
            error!(error = %e, "query embedding failed");
            e
        })?;

        let include_embeddings = collection == COLLECTION_CONTRACTS;
        let hits = self
            .store
            .query(
                collection,
                &embedding,
                limit.min(MAX_QUERY_RESULTS),
                filters,
                include_embeddings,
            )
            .await
            .map_err(|e| {
                error!(collection, error = %e, "vector store query failed");
                e
            })?;

        let matches = hits
            .into_iter()
            .map(|hit| {
                let template_id = match hit.metadata.get("template_id") {
                    Some(MetaValue::Str(id)) if collection == COLLECTION_SEGMENTS => {
                        Some(id.clone())
                    }
                    _ => None,
                };
                ScoredMatch {
                    id: hit.id,
                    content: hit.text,
                    metadata: hit.metadata,
                    similarity: 1.0 - hit.distance,
                    embedding: hit.embedding,
                    template_id,
                }
            })
            .collect();

        Ok(matches)
    }

    /// Match a query against templates, regulations, and segments at once.
    ///
    /// The three streams run concurrently and are post-processed
    /// independently: templates are ranked by similarity, regulations are
    /// dropped below the configured threshold before ranking, and segments
    /// are ranked with their owning template attached. Streams with no
    /// results yield empty bundle fields rather than an error.
    ///
    /// # Errors
    ///
    /// Same as [`similarity_query`](Matcher::similarity_query): malformed
    /// input or dependency failure; never an empty corpus.
    pub async fn dual_match(&self, query: &str, filters: Option<Filter>) -> Result<MatchBundle> {
        let (contracts, laws, segments) = tokio::join!(
            self.similarity_query(
                COLLECTION_CONTRACTS,
                query,
                filters.as_ref(),
                self.config.max_contract_results,
            ),
            self.similarity_query(
                COLLECTION_LAWS,
                query,
                filters.as_ref(),
                self.config.max_law_results,
            ),
            self.similarity_query(
                COLLECTION_SEGMENTS,
                query,
                filters.as_ref(),
                self.config.max_segment_results,
            ),
        );

        let mut contracts = contracts?;
        let mut laws = laws?;
        let mut segments = segments?;

        sort_by_similarity(&mut contracts);

        // Irrelevant regulations are common false positives; drop them
        // before ranking rather than merely ranking them last.
        laws.retain(|law| law.similarity >= self.config.similarity_threshold);
        sort_by_similarity(&mut laws);

        sort_by_similarity(&mut segments);

        let mut contracts = contracts.into_iter();
        let best_contract = contracts.next();
        let alternative_contracts: Vec<ScoredMatch> = contracts.take(MAX_ALTERNATIVES).collect();

        info!(
            best = best_contract.as_ref().map(|c| c.id.as_str()).unwrap_or("<none>"),
            laws = laws.len(),
            segments = segments.len(),
            "dual match completed"
        );

        Ok(MatchBundle {
            best_contract,
            alternative_contracts,
            relevant_laws: laws,
            relevant_segments: segments,
            query: query.to_string(),
            filters,
        })
    }
}

/// Stable descending sort by similarity; ties keep store order.
fn sort_by_similarity(matches: &mut [ScoredMatch]) {
    matches.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));
}
