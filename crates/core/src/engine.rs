//! Correction engine that ties alignment and highlighting together

use std::fmt;

use serde::Serialize;

use crate::config::AlignConfig;
use crate::edit::Edit;
use crate::error::AlignError;
use crate::highlight::{DiffHighlighter, Highlight};
use crate::resolver::{AlignmentResolver, Resolution};

/// The main correction engine
///
/// Holds a resolver built from a validated configuration and a highlighter.
/// Every call is independent; an engine can be shared across threads.
pub struct CorrectionEngine {
    config: AlignConfig,
    resolver: AlignmentResolver,
    highlighter: DiffHighlighter,
}

impl CorrectionEngine {
    /// Create a new engine, rejecting invalid configuration
    pub fn new(config: AlignConfig) -> Result<Self, AlignError> {
        config.validate()?;
        Ok(Self {
            resolver: AlignmentResolver::new(&config),
            highlighter: DiffHighlighter::new(),
            config,
        })
    }

    /// Create an engine with the default configuration
    pub fn default_config() -> Self {
        Self {
            resolver: AlignmentResolver::default(),
            highlighter: DiffHighlighter::new(),
            config: AlignConfig::default(),
        }
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Re-anchor untrusted edits onto `canonical`
    pub fn resolve(&self, canonical: &str, edits: &[Edit]) -> Resolution {
        let resolution = self.resolver.resolve(canonical, edits);
        tracing::debug!(metrics = %resolution.metrics, "resolved edits");
        resolution
    }

    /// Highlight the differences between `canonical` and `corrected`
    pub fn highlight(&self, canonical: &str, corrected: &str, edits: &[Edit]) -> Highlight {
        self.highlighter.diff(canonical, corrected, edits)
    }

    /// Resolve the edits and highlight the corrected text in one pass
    ///
    /// The highlighter attaches the cleaned edits, so `edit_to_span` is
    /// indexed like `resolution.edits`.
    pub fn process(&self, canonical: &str, edits: &[Edit], corrected: &str) -> CorrectionReport {
        let resolution = self.resolve(canonical, edits);
        let highlight = self.highlight(canonical, corrected, &resolution.edits);
        CorrectionReport {
            resolution,
            highlight,
        }
    }
}

impl Default for CorrectionEngine {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Combined output of [`CorrectionEngine::process`]
#[derive(Debug, Clone, Serialize)]
pub struct CorrectionReport {
    pub resolution: Resolution,
    pub highlight: Highlight,
}

impl CorrectionReport {
    /// One-line summary of both stages
    pub fn summary(&self) -> String {
        format!("{}; {}", self.resolution.metrics, self.highlight.summary())
    }

    pub fn to_json(&self) -> Result<String, AlignError> {
        serde_json::to_string_pretty(self).map_err(|e| AlignError::json("serializing report", e))
    }
}

impl fmt::Display for CorrectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for (edit, source) in self.resolution.edits.iter().zip(&self.resolution.sources) {
            writeln!(f, "  [{}] {}", source, edit.description())?;
        }
        for unplaced in &self.highlight.diagnostics.unplaced {
            writeln!(f, "  unplaced edit {}: {:?}", unplaced.edit_index, unplaced.reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::Category;

    #[test]
    fn test_invalid_config_rejected() {
        let config = AlignConfig::default().with_approximate_gate(3, 1.5);
        assert!(matches!(
            CorrectionEngine::new(config),
            Err(AlignError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_process() {
        let engine = CorrectionEngine::default();
        let canonical = "Yo tengo un gato.";
        let edits = vec![Edit::new(0, 4, "gato", "perro").with_category(Category::Spelling)];

        let report = engine.process(canonical, &edits, "Yo tengo un perro.");

        assert_eq!(report.resolution.edits.len(), 1);
        assert_eq!(report.resolution.edits[0].start, 12);
        assert_eq!(report.highlight.edit_to_span, vec![Some(0)]);
        assert_eq!(report.highlight.spans[0].category, Category::Spelling);
        assert!(report.summary().starts_with("1 edits: 1 accepted"));
    }

    #[test]
    fn test_report_json() {
        let engine = CorrectionEngine::default();
        let report = engine.process("a b", &[Edit::new(2, 3, "b", "c")], "a c");
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["resolution"]["edits"][0]["original"], "b");
        assert_eq!(value["resolution"]["diagnostics"][0]["outcome"]["status"], "accepted");
        assert_eq!(value["highlight"]["hunks"][1]["kind"], "replace");
    }

    #[test]
    fn test_display_lists_edits() {
        let engine = CorrectionEngine::default();
        let report = engine.process("a b", &[Edit::new(2, 3, "b", "c")], "a c");
        let text = report.to_string();
        assert!(text.lines().count() >= 2);
        assert!(text.contains("[0]"));
    }
}
