//! Metadata filters for similarity queries.
//!
//! A [`Filter`] is a flat AND of per-key conditions: either exact equality
//! against a scalar or membership in a list of scalars. No nested boolean
//! composition is supported.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{MetaValue, Metadata};

/// A condition on a single metadata key.
///
/// Untagged serde mirrors the wire form: a bare scalar means equality, a
/// list means membership. `In` is declared first so lists deserialize as
/// membership rather than as equality against a list value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Condition {
    /// The stored value must be one of these scalars.
    In(Vec<MetaValue>),
    /// The stored value must equal this scalar.
    Eq(MetaValue),
}

/// A flat metadata filter: every listed key must satisfy its condition.
///
/// # Example
///
/// ```rust,ignore
/// use contract_rag::Filter;
///
/// let filter = Filter::new()
///     .eq("category", "lease")
///     .any_of("jurisdiction", ["CN", "HK"]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Filter {
    conditions: BTreeMap<String, Condition>,
}

impl Filter {
    /// Create an empty filter (matches every record).
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` to equal `value`.
    pub fn eq(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.conditions.insert(key.into(), Condition::Eq(value.into()));
        self
    }

    /// Require `key` to be one of `values`.
    pub fn any_of<V>(mut self, key: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<MetaValue>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.insert(key.into(), Condition::In(values));
        self
    }

    /// Whether this filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Iterate over the per-key conditions in key order.
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.conditions.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Evaluate this filter against a record's metadata.
    ///
    /// A key missing from the metadata fails its condition.
    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.conditions.iter().all(|(key, condition)| {
            let Some(value) = metadata.get(key) else {
                return false;
            };
            match condition {
                Condition::Eq(expected) => value == expected,
                Condition::In(allowed) => allowed.contains(value),
            }
        })
    }
}
