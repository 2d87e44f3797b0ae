//! Qdrant vector store backend.
//!
//! Provides [`QdrantVectorStore`] which implements [`VectorStore`] using
//! the [qdrant-client](https://docs.rs/qdrant-client) crate over gRPC.
//! Collections are created lazily on upsert with cosine distance, and
//! querying one that does not exist yet returns no hits. Record metadata is
//! stored as payload under `metadata`, and metadata filters translate to
//! Qdrant `must` conditions.
//!
//! Record ids are mapped to stable UUID v5 point ids (Qdrant only accepts
//! UUIDs or integers); the original id travels in the payload. This backend
//! does not return stored embeddings, regardless of `include_embeddings`.
//!
//! # Example
//!
//! ```rust,ignore
//! use contract_rag::qdrant::QdrantVectorStore;
//!
//! let store = QdrantVectorStore::new("http://localhost:6334")?;
//! store.upsert("laws", &records).await?;
//! let hits = store.query("laws", &embedding, 10, Some(&filter), false).await?;
//! ```

use async_trait::async_trait;
use qdrant_client::qdrant::condition::ConditionOneOf;
use qdrant_client::qdrant::r#match::MatchValue;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, FieldCondition,
    Filter as QdrantFilter, Match, PointStruct, PointsIdsList, RepeatedIntegers, RepeatedStrings,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::debug;
use uuid::Uuid;

use crate::document::{Metadata, MetaValue, QueryHit, Record};
use crate::error::{RagError, Result};
use crate::filter::{Condition as FilterCondition, Filter};
use crate::vectorstore::VectorStore;

/// A [`VectorStore`] backed by [Qdrant](https://qdrant.tech/).
pub struct QdrantVectorStore {
    client: Qdrant,
}

impl QdrantVectorStore {
    /// Create a new Qdrant vector store connecting to the given URL.
    pub fn new(url: &str) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(Self::map_err)?;
        Ok(Self { client })
    }

    /// Create a new Qdrant vector store from an existing client.
    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    fn map_err(e: qdrant_client::QdrantError) -> RagError {
        RagError::VectorStoreError { backend: "qdrant".to_string(), message: e.to_string() }
    }

    /// Deterministic UUID v5 point id for a record id.
    fn point_id(id: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes()).to_string()
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        let collections = self.client.list_collections().await.map_err(Self::map_err)?;
        Ok(collections.collections.iter().any(|c| c.name == name))
    }

    /// Create the collection if it does not exist yet.
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        if self.collection_exists(name).await? {
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(collection = name, dimensions, "created qdrant collection");
        Ok(())
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn upsert(&self, collection: &str, records: &[Record]) -> Result<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        self.ensure_collection(collection, first.embedding.len()).await?;

        let points: Vec<PointStruct> = records
            .iter()
            .map(|record| {
                let mut payload_map = serde_json::Map::new();
                payload_map.insert("id".to_string(), serde_json::Value::String(record.id.clone()));
                payload_map
                    .insert("text".to_string(), serde_json::Value::String(record.text.clone()));
                payload_map.insert(
                    "metadata".to_string(),
                    serde_json::to_value(&record.metadata).unwrap_or_default(),
                );

                let payload =
                    Payload::try_from(serde_json::Value::Object(payload_map)).unwrap_or_default();

                PointStruct::new(Self::point_id(&record.id), record.embedding.clone(), payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(Self::map_err)?;

        debug!(collection, count = records.len(), "upserted records to qdrant");
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[&str]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let point_ids: Vec<qdrant_client::qdrant::PointId> =
            ids.iter().map(|id| Self::point_id(id).into()).collect();

        self.client
            .delete_points(
                DeletePointsBuilder::new(collection)
                    .points(PointsIdsList { ids: point_ids })
                    .wait(true),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(collection, count = ids.len(), "deleted points from qdrant");
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        limit: usize,
        filter: Option<&Filter>,
        _include_embeddings: bool,
    ) -> Result<Vec<QueryHit>> {
        // Collections are created lazily on upsert; one that has never been
        // written to has no matches.
        if !self.collection_exists(collection).await? {
            return Ok(Vec::new());
        }

        let mut builder =
            SearchPointsBuilder::new(collection, embedding.to_vec(), limit as u64)
                .with_payload(true)
                .with_vectors(false);
        if let Some(f) = filter.filter(|f| !f.is_empty()) {
            builder = builder.filter(to_qdrant_filter(f));
        }

        let response = self.client.search_points(builder).await.map_err(Self::map_err)?;

        let hits = response
            .result
            .into_iter()
            .map(|scored| {
                let payload = scored.payload;
                let id = payload.get("id").and_then(extract_string).unwrap_or_default();
                let text = payload.get("text").and_then(extract_string).unwrap_or_default();
                let metadata: Metadata = payload
                    .get("metadata")
                    .map(value_to_json)
                    .and_then(|json| serde_json::from_value(json).ok())
                    .unwrap_or_default();

                QueryHit {
                    id,
                    text,
                    metadata,
                    // Qdrant reports cosine similarity for cosine collections.
                    distance: 1.0 - scored.score,
                    embedding: None,
                }
            })
            .collect();

        Ok(hits)
    }
}

/// Extract a string from a Qdrant payload value.
fn extract_string(value: &QdrantValue) -> Option<String> {
    match &value.kind {
        Some(Kind::StringValue(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Convert a Qdrant payload value into JSON.
fn value_to_json(value: &QdrantValue) -> serde_json::Value {
    match &value.kind {
        Some(Kind::StringValue(s)) => serde_json::Value::String(s.clone()),
        Some(Kind::IntegerValue(i)) => serde_json::Value::Number((*i).into()),
        Some(Kind::DoubleValue(f)) => serde_json::json!(f),
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(*b),
        Some(Kind::StructValue(s)) => serde_json::Value::Object(
            s.fields.iter().map(|(k, v)| (k.clone(), value_to_json(v))).collect(),
        ),
        Some(Kind::ListValue(l)) => {
            serde_json::Value::Array(l.values.iter().map(value_to_json).collect())
        }
        Some(Kind::NullValue(_)) | None => serde_json::Value::Null,
    }
}

/// Translate a [`Filter`] into a Qdrant filter: one `must` condition per
/// key, matching against the nested `metadata` payload.
///
/// Equality maps to keyword/integer/boolean matches; membership maps to
/// keyword-set or integer-set matches. Float and list values have no Qdrant
/// match form and their conditions are skipped (a documented limitation of
/// this backend).
fn to_qdrant_filter(filter: &Filter) -> QdrantFilter {
    let mut must: Vec<Condition> = Vec::new();

    for (key, condition) in filter.conditions() {
        let match_value = match condition {
            FilterCondition::Eq(value) => scalar_match(value),
            FilterCondition::In(values) => membership_match(values),
        };

        if let Some(match_value) = match_value {
            must.push(Condition {
                condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
                    key: format!("metadata.{key}"),
                    r#match: Some(Match { match_value: Some(match_value) }),
                    ..Default::default()
                })),
            });
        }
    }

    QdrantFilter { must, ..Default::default() }
}

fn scalar_match(value: &MetaValue) -> Option<MatchValue> {
    match value {
        MetaValue::Str(s) => Some(MatchValue::Keyword(s.clone())),
        MetaValue::Int(i) => Some(MatchValue::Integer(*i)),
        MetaValue::Bool(b) => Some(MatchValue::Boolean(*b)),
        MetaValue::Float(_) | MetaValue::List(_) => None,
    }
}

fn membership_match(values: &[MetaValue]) -> Option<MatchValue> {
    let strings: Vec<String> = values
        .iter()
        .filter_map(|v| match v {
            MetaValue::Str(s) => Some(s.clone()),
            _ => None,
        })
        .collect();
    if !strings.is_empty() {
        return Some(MatchValue::Keywords(RepeatedStrings { strings }));
    }

    let integers: Vec<i64> = values
        .iter()
        .filter_map(|v| match v {
            MetaValue::Int(i) => Some(*i),
            _ => None,
        })
        .collect();
    if !integers.is_empty() {
        return Some(MatchValue::Integers(RepeatedIntegers { integers }));
    }

    None
}
