use serde::{Deserialize, Serialize};

/// Default maximum distinct-value count at which a numeric column turns categorical.
pub const DEFAULT_CATEGORICAL_THRESHOLD: usize = 10;

/// Explicit configuration passed into every engine operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub infer: InferConfig,
    /// p-value above which a column test counts as similar.
    pub significance_level: f64,
    pub correlation: CorrelationThresholds,
    pub adversarial: AdversarialConfig,
    /// Run the constraint post-processor on generated tables.
    pub apply_constraints: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            infer: InferConfig::default(),
            significance_level: 0.05,
            correlation: CorrelationThresholds::default(),
            adversarial: AdversarialConfig::default(),
            apply_constraints: true,
        }
    }
}

/// Schema inference settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferConfig {
    pub categorical_threshold: usize,
    /// Flag likely row keys as identifier columns.
    pub detect_identifiers: bool,
    /// Minimum unique/non-null ratio for a whole-number column to count as an identifier.
    pub identifier_unique_ratio: f64,
}

impl Default for InferConfig {
    fn default() -> Self {
        Self {
            categorical_threshold: DEFAULT_CATEGORICAL_THRESHOLD,
            detect_identifiers: true,
            identifier_unique_ratio: 0.95,
        }
    }
}

/// Interpretation bands for correlation MSE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationThresholds {
    /// Below this value relationships are well preserved.
    pub well_preserved: f64,
    /// Below this value (and above `well_preserved`) distortion is minor.
    pub minor_distortion: f64,
}

impl Default for CorrelationThresholds {
    fn default() -> Self {
        Self {
            well_preserved: 0.05,
            minor_distortion: 0.10,
        }
    }
}

/// Adversarial classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdversarialConfig {
    pub n_estimators: usize,
    pub test_fraction: f64,
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Training budget in milliseconds; unbounded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for AdversarialConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            test_fraction: 0.30,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            timeout_ms: None,
        }
    }
}

impl AdversarialConfig {
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_ms.map(std::time::Duration::from_millis)
    }
}
