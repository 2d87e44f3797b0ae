//! Ingestion pipeline: registering contract templates and regulations.
//!
//! The write path. Templates are smart-segmented, every segment embedded in
//! one batched call and stored in the segment collection, and the template
//! itself stored with the element-wise mean of its segment vectors.
//! Regulations are embedded and stored whole.

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::config::RetrievalConfig;
use crate::document::{Document, IngestReceipt, MetaValue, Record};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::segmenter::Segmenter;
use crate::vectorstore::{COLLECTION_CONTRACTS, COLLECTION_LAWS, COLLECTION_SEGMENTS, VectorStore};

/// Orchestrates segmentation, embedding, and storage on the write path.
///
/// Holds long-lived handles to the embedder and store; construct once and
/// share. Registration is not transactional: a failure after segment
/// upserts leaves orphaned segments, surfaced as [`RagError::Inconsistent`].
///
/// # Example
///
/// ```rust,ignore
/// use contract_rag::{Document, IngestPipeline, RetrievalConfig};
///
/// let pipeline = IngestPipeline::new(RetrievalConfig::default(), embedder, store);
/// let receipt = pipeline.register_template(&document).await?;
/// println!("{} segments stored", receipt.segment_count);
/// ```
pub struct IngestPipeline {
    segmenter: Segmenter,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl IngestPipeline {
    /// Create a pipeline over the given embedder and store handles.
    pub fn new(
        config: RetrievalConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        let segmenter = Segmenter::new(
            config.segment_min_length,
            config.segment_max_length,
            config.segment_overlap,
        );
        Self { segmenter, embedder, store }
    }

    /// Register a contract template: segment, embed, and store.
    ///
    /// Segment records get ids `{template_id}_seg_{i}` and carry the
    /// template's metadata plus `template_id`, `segment_index`, and
    /// `segment_count`. The template's own embedding is the mean of its
    /// segment vectors; if segmentation yields no chunks the full content
    /// is embedded directly.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyInput`] when the document text is empty.
    /// - [`RagError::Inconsistent`] when the template upsert fails after
    ///   segments were already stored (orphaned segments remain).
    /// - Embedder and store errors propagate unchanged otherwise.
    pub async fn register_template(&self, document: &Document) -> Result<IngestReceipt> {
        if document.text.trim().is_empty() {
            return Err(RagError::EmptyInput("template content".to_string()));
        }

        let template_id = document.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());

        let segments = self.segmenter.smart_segment(&document.text);
        let texts: Vec<&str> = segments.iter().map(String::as_str).collect();
        let segment_embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
            error!(template_id = %template_id, error = %e, "embedding failed during registration");
            e
        })?;

        let segment_count = segments.len();
        let mut segment_ids = Vec::with_capacity(segment_count);
        let mut segment_records = Vec::with_capacity(segment_count);

        for (i, (text, embedding)) in segments.iter().zip(&segment_embeddings).enumerate() {
            let segment_id = format!("{template_id}_seg_{i}");
            let mut metadata = document.metadata.clone();
            metadata.insert("template_id".to_string(), MetaValue::Str(template_id.clone()));
            metadata.insert("segment_index".to_string(), MetaValue::Int(i as i64));
            metadata.insert("segment_count".to_string(), MetaValue::Int(segment_count as i64));

            segment_records.push(Record {
                id: segment_id.clone(),
                text: text.clone(),
                embedding: embedding.clone(),
                metadata,
            });
            segment_ids.push(segment_id);
        }

        self.store.upsert(COLLECTION_SEGMENTS, &segment_records).await.map_err(|e| {
            error!(template_id = %template_id, error = %e, "segment upsert failed");
            e
        })?;

        let template_embedding = if segment_embeddings.is_empty() {
            // No chunk reached min_length; embed the whole content instead.
            self.embedder.embed(&document.text).await?
        } else {
            mean_embedding(&segment_embeddings)
        };
        let embedding_dim = template_embedding.len();

        let template_record = Record {
            id: template_id.clone(),
            text: document.text.clone(),
            embedding: template_embedding,
            metadata: document.metadata.clone(),
        };

        self.store.upsert(COLLECTION_CONTRACTS, &[template_record]).await.map_err(|e| {
            error!(template_id = %template_id, error = %e, "template upsert failed");
            RagError::Inconsistent {
                template_id: template_id.clone(),
                stored_segments: segment_count,
                message: e.to_string(),
            }
        })?;

        info!(template_id = %template_id, segment_count, "registered contract template");

        Ok(IngestReceipt { template_id, segment_ids, segment_count, embedding_dim })
    }

    /// Register a legal regulation: single embedding, single upsert.
    ///
    /// Returns the regulation's id (supplied or generated).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyInput`] for empty text; embedder and store
    /// errors propagate unchanged.
    pub async fn register_regulation(&self, document: &Document) -> Result<String> {
        if document.text.trim().is_empty() {
            return Err(RagError::EmptyInput("regulation content".to_string()));
        }

        let regulation_id = document.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        let embedding = self.embedder.embed(&document.text).await?;

        let record = Record {
            id: regulation_id.clone(),
            text: document.text.clone(),
            embedding,
            metadata: document.metadata.clone(),
        };
        self.store.upsert(COLLECTION_LAWS, &[record]).await.map_err(|e| {
            error!(regulation_id = %regulation_id, error = %e, "regulation upsert failed");
            e
        })?;

        info!(regulation_id = %regulation_id, "registered regulation");
        Ok(regulation_id)
    }
}

/// Element-wise arithmetic mean of a non-empty set of equal-length vectors.
fn mean_embedding(embeddings: &[Vec<f32>]) -> Vec<f32> {
    let dim = embeddings[0].len();
    let mut mean = vec![0.0f32; dim];
    for embedding in embeddings {
        for (acc, value) in mean.iter_mut().zip(embedding) {
            *acc += value;
        }
    }
    let count = embeddings.len() as f32;
    for value in &mut mean {
        *value /= count;
    }
    mean
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_embedding_averages_elementwise() {
        let mean = mean_embedding(&[vec![1.0, 0.0, 3.0], vec![3.0, 2.0, 1.0]]);
        assert_eq!(mean, vec![2.0, 1.0, 2.0]);
    }
}
