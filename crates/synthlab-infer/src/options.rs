use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use synthlab_core::{DEFAULT_CATEGORICAL_THRESHOLD, InferConfig};

/// Options that control how inference behaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferOptions {
    /// Numeric columns with at most this many distinct values become categorical.
    pub categorical_threshold: usize,
    pub detect_identifiers: bool,
    pub identifier_unique_ratio: f64,
    /// Per-column identifier decision that replaces the heuristic.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub identifier_overrides: BTreeMap<String, bool>,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            categorical_threshold: DEFAULT_CATEGORICAL_THRESHOLD,
            detect_identifiers: true,
            identifier_unique_ratio: 0.95,
            identifier_overrides: BTreeMap::new(),
        }
    }
}

impl InferOptions {
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.categorical_threshold = threshold;
        self
    }

    /// Force (`true`) or suppress (`false`) the identifier flag for a column.
    pub fn with_identifier_override(mut self, column: impl Into<String>, flag: bool) -> Self {
        self.identifier_overrides.insert(column.into(), flag);
        self
    }

    pub(crate) fn identifier_override(&self, column: &str) -> Option<bool> {
        self.identifier_overrides.get(column).copied()
    }
}

impl From<&InferConfig> for InferOptions {
    fn from(config: &InferConfig) -> Self {
        Self {
            categorical_threshold: config.categorical_threshold,
            detect_identifiers: config.detect_identifiers,
            identifier_unique_ratio: config.identifier_unique_ratio,
            identifier_overrides: BTreeMap::new(),
        }
    }
}
