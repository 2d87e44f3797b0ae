//! Shared test fixtures: a deterministic embedding provider.

use async_trait::async_trait;
use contract_rag::{EmbeddingProvider, Result};

pub const DIM: usize = 64;

/// Deterministic bag-of-characters embedder.
///
/// Each character contributes to one dimension (code point modulo `DIM`);
/// the vector is L2-normalized. Texts sharing characters embed close
/// together, which is enough to exercise ranking and thresholding without
/// a real model.
#[derive(Debug, Default)]
pub struct CharBagEmbedder;

#[async_trait]
impl EmbeddingProvider for CharBagEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0.0f32; DIM];
        for ch in text.chars() {
            v[(ch as u32 as usize) % DIM] += 1.0;
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}
