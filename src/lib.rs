//! Retrieval engine for LLM-grounded contract generation.
//!
//! `contract-rag` retrieves relevant contract templates, legal regulations,
//! and fine-grained clause segments for a natural-language query. It covers
//! the two halves of the retrieval core:
//!
//! - **Segmentation** — [`Segmenter`] splits legal text into semantically
//!   coherent, length-bounded chunks, preferring structural boundaries
//!   (章/节/条/款) and falling back to a sliding window.
//! - **Matching** — [`Matcher`] runs filtered similarity searches over three
//!   independent collections (`contracts`, `laws`, `segments`) and fuses
//!   the streams into a [`MatchBundle`].
//!
//! The write path is [`IngestPipeline`], which registers templates (whole
//! document plus one vector per segment) and regulations. Embedding and
//! storage are injected behind the [`EmbeddingProvider`] and [`VectorStore`]
//! traits; [`InMemoryVectorStore`] is a deterministic reference backend, and
//! the `qdrant` feature enables a production backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use contract_rag::{
//!     Document, Filter, IngestPipeline, InMemoryVectorStore, Matcher, RetrievalConfig,
//! };
//!
//! let config = RetrievalConfig::default();
//! let store = Arc::new(InMemoryVectorStore::new());
//! let pipeline = IngestPipeline::new(config.clone(), embedder.clone(), store.clone());
//! pipeline.register_template(&template).await?;
//!
//! let matcher = Matcher::new(config, embedder, store);
//! let bundle = matcher
//!     .dual_match("房屋租赁合同", Some(Filter::new().eq("category", "lease")))
//!     .await?;
//! ```

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod inmemory;
pub mod matcher;
pub mod segmenter;
pub mod vectorstore;

#[cfg(feature = "qdrant")]
pub mod qdrant;

pub use config::{RetrievalConfig, RetrievalConfigBuilder};
pub use document::{
    Document, IngestReceipt, MatchBundle, MetaValue, Metadata, QueryHit, Record, ScoredMatch,
};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use filter::{Condition, Filter};
pub use ingest::IngestPipeline;
pub use inmemory::InMemoryVectorStore;
pub use matcher::Matcher;
pub use segmenter::Segmenter;
pub use vectorstore::{
    COLLECTION_CONTRACTS, COLLECTION_LAWS, COLLECTION_SEGMENTS, KNOWN_COLLECTIONS, VectorStore,
};

#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorStore;
