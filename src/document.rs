//! Data types for documents, records, matches, and the match bundle.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::filter::Filter;

/// A metadata value: a scalar or a list of scalars.
///
/// Metadata is an open mapping; keeping values in a tagged union (rather
/// than raw JSON) lets filter translation stay exhaustive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetaValue {
    /// A string value.
    Str(String),
    /// An integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A list of scalar values (one nesting level only).
    List(Vec<MetaValue>),
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Str(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Str(s)
    }
}

impl From<i64> for MetaValue {
    fn from(i: i64) -> Self {
        MetaValue::Int(i)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

/// Open metadata mapping attached to documents and records.
pub type Metadata = HashMap<String, MetaValue>;

/// A source document submitted for ingestion.
///
/// The `id` is optional; when absent the pipeline generates a UUID v4.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Externally supplied identifier, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The full text content.
    pub text: String,
    /// Key-value metadata (category, jurisdiction, date, ...).
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a document with no preset id.
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self { id: None, text: text.into(), metadata }
    }
}

/// The persisted unit in a collection: a template, regulation, or segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Unique identifier within its collection.
    pub id: String,
    /// The stored text.
    pub text: String,
    /// The embedding vector for `text`.
    pub embedding: Vec<f32>,
    /// Key-value metadata.
    pub metadata: Metadata,
}

/// A raw nearest-neighbor hit as returned by a [`VectorStore`](crate::VectorStore).
///
/// Hits come back ordered by ascending `distance` (cosine distance in `[0, 2]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryHit {
    /// Record identifier.
    pub id: String,
    /// The stored text.
    pub text: String,
    /// The record's metadata.
    pub metadata: Metadata,
    /// Cosine distance between the query and the record embedding.
    pub distance: f32,
    /// The stored embedding, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

/// A matched record with its similarity score, one per query hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMatch {
    /// Record identifier.
    pub id: String,
    /// The stored text.
    pub content: String,
    /// The record's metadata.
    pub metadata: Metadata,
    /// Similarity derived as `1 - distance`; roughly `[0, 1]` for
    /// normalized embeddings under cosine distance.
    pub similarity: f32,
    /// The stored embedding, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Owning template id, populated for segment matches only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

/// The composite result of matching one query against all three collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchBundle {
    /// The highest-ranked contract template, if any matched.
    pub best_contract: Option<ScoredMatch>,
    /// Templates ranked 2-4, never containing `best_contract`'s id.
    pub alternative_contracts: Vec<ScoredMatch>,
    /// Regulations at or above the similarity threshold, sorted
    /// non-increasing by similarity.
    pub relevant_laws: Vec<ScoredMatch>,
    /// Fine-grained segment matches, sorted by similarity, each carrying
    /// its owning `template_id`.
    pub relevant_segments: Vec<ScoredMatch>,
    /// The query text, echoed for traceability.
    pub query: String,
    /// The filters applied, echoed for traceability.
    pub filters: Option<Filter>,
}

/// What `register_template` hands back for caller verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReceipt {
    /// The template's id (supplied or generated).
    pub template_id: String,
    /// Ordered segment record ids, `{template_id}_seg_{0..N-1}`.
    pub segment_ids: Vec<String>,
    /// Number of segments produced.
    pub segment_count: usize,
    /// Dimensionality of the stored embeddings.
    pub embedding_dim: usize,
}
