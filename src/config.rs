//! Configuration for ingestion and retrieval.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters shared by the ingestion pipeline and matcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Minimum segment length in characters; shorter structural chunks are dropped.
    pub segment_min_length: usize,
    /// Maximum segment length in characters.
    pub segment_max_length: usize,
    /// Overlap between consecutive window chunks in characters.
    pub segment_overlap: usize,
    /// Result limit for the contract template stream.
    pub max_contract_results: usize,
    /// Result limit for the regulation stream.
    pub max_law_results: usize,
    /// Result limit for the segment stream.
    pub max_segment_results: usize,
    /// Minimum similarity for a regulation to be considered relevant.
    pub similarity_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            segment_min_length: 50,
            segment_max_length: 500,
            segment_overlap: 50,
            max_contract_results: 5,
            max_law_results: 10,
            max_segment_results: 10,
            similarity_threshold: 0.5,
        }
    }
}

impl RetrievalConfig {
    /// Create a new builder for constructing a [`RetrievalConfig`].
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RetrievalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Set the minimum segment length in characters.
    pub fn segment_min_length(mut self, length: usize) -> Self {
        self.config.segment_min_length = length;
        self
    }

    /// Set the maximum segment length in characters.
    pub fn segment_max_length(mut self, length: usize) -> Self {
        self.config.segment_max_length = length;
        self
    }

    /// Set the overlap between consecutive window chunks in characters.
    pub fn segment_overlap(mut self, overlap: usize) -> Self {
        self.config.segment_overlap = overlap;
        self
    }

    /// Set the result limit for the contract template stream.
    pub fn max_contract_results(mut self, limit: usize) -> Self {
        self.config.max_contract_results = limit;
        self
    }

    /// Set the result limit for the regulation stream.
    pub fn max_law_results(mut self, limit: usize) -> Self {
        self.config.max_law_results = limit;
        self
    }

    /// Set the result limit for the segment stream.
    pub fn max_segment_results(mut self, limit: usize) -> Self {
        self.config.max_segment_results = limit;
        self
    }

    /// Set the minimum similarity for relevant regulations.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Build the [`RetrievalConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `segment_min_length == 0` or `segment_min_length >= segment_max_length`
    /// - `segment_overlap >= segment_max_length`
    /// - any result limit is zero
    /// - `similarity_threshold` is not finite
    pub fn build(self) -> Result<RetrievalConfig> {
        let c = &self.config;
        if c.segment_min_length == 0 {
            return Err(RagError::ConfigError(
                "segment_min_length must be greater than zero".to_string(),
            ));
        }
        if c.segment_min_length >= c.segment_max_length {
            return Err(RagError::ConfigError(format!(
                "segment_min_length ({}) must be less than segment_max_length ({})",
                c.segment_min_length, c.segment_max_length
            )));
        }
        if c.segment_overlap >= c.segment_max_length {
            return Err(RagError::ConfigError(format!(
                "segment_overlap ({}) must be less than segment_max_length ({})",
                c.segment_overlap, c.segment_max_length
            )));
        }
        if c.max_contract_results == 0 || c.max_law_results == 0 || c.max_segment_results == 0 {
            return Err(RagError::ConfigError(
                "result limits must be greater than zero".to_string(),
            ));
        }
        if !c.similarity_threshold.is_finite() {
            return Err(RagError::ConfigError("similarity_threshold must be finite".to_string()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        assert!(RetrievalConfig::builder().build().is_ok());
    }

    #[test]
    fn overlap_must_be_below_max_length() {
        let result = RetrievalConfig::builder()
            .segment_max_length(100)
            .segment_overlap(100)
            .build();
        assert!(matches!(result, Err(RagError::ConfigError(_))));
    }

    #[test]
    fn min_length_must_be_below_max_length() {
        let result = RetrievalConfig::builder()
            .segment_min_length(500)
            .segment_max_length(100)
            .segment_overlap(10)
            .build();
        assert!(matches!(result, Err(RagError::ConfigError(_))));
    }
}
