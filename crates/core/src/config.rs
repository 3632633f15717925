//! Configuration for the alignment engine
//!
//! Tuning values only; none of them change the invariants the resolver and
//! highlighter guarantee.

use serde::{Deserialize, Serialize};

use crate::error::AlignError;

/// Tuning for the fuzzy locator strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Half-width of the windowed-unique search, in UTF-16 units
    pub window: usize,

    /// Half-width of the approximate alignment search
    pub wide_window: usize,

    /// Edit distance accepted by the approximate gate regardless of similarity
    pub max_edit_distance: usize,

    /// Similarity (0.0 to 1.0) accepted by the approximate gate
    pub min_similarity: f64,

    /// Whether the approximate strategy runs at all
    pub allow_approximate: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            window: 60,
            wide_window: 120,
            max_edit_distance: 3,
            min_similarity: 0.8,
            allow_approximate: true,
        }
    }
}

/// Thresholds above which an edit is split
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Longest `original`, in UTF-16 units, kept as a single edit
    pub max_chars: usize,

    /// Most whitespace-delimited words kept as a single edit
    pub max_words: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_chars: 48,
            max_words: 8,
        }
    }
}

/// Configuration for alignment and highlighting
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    pub locator: LocatorConfig,
    pub split: SplitConfig,
}

impl AlignConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact strategies only; edits whose text does not occur verbatim are
    /// skipped
    pub fn strict() -> Self {
        Self::new().with_approximate(false)
    }

    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, AlignError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AlignError::json("parsing configuration", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlignError> {
        let similarity = self.locator.min_similarity;
        if !similarity.is_finite() || !(0.0..=1.0).contains(&similarity) {
            return Err(AlignError::invalid_config(format!(
                "min_similarity {} outside [0, 1]",
                similarity
            )));
        }
        if self.split.max_chars == 0 {
            return Err(AlignError::invalid_config("max_chars must be positive"));
        }
        if self.split.max_words == 0 {
            return Err(AlignError::invalid_config("max_words must be positive"));
        }
        Ok(())
    }

    /// Set the windowed-unique half-width
    pub fn with_window(mut self, window: usize) -> Self {
        self.locator.window = window;
        self
    }

    /// Set the approximate search half-width
    pub fn with_wide_window(mut self, window: usize) -> Self {
        self.locator.wide_window = window;
        self
    }

    /// Set the approximate gate (edit distance OR similarity)
    pub fn with_approximate_gate(mut self, max_edit_distance: usize, min_similarity: f64) -> Self {
        self.locator.max_edit_distance = max_edit_distance;
        self.locator.min_similarity = min_similarity;
        self
    }

    /// Enable or disable approximate alignment
    pub fn with_approximate(mut self, enable: bool) -> Self {
        self.locator.allow_approximate = enable;
        self
    }

    /// Set the split thresholds
    pub fn with_split_thresholds(mut self, max_chars: usize, max_words: usize) -> Self {
        self.split = SplitConfig { max_chars, max_words };
        self
    }
}
