//! Correction edits and their boundary conversion
//!
//! The model returns loosely typed records. `parse_edits` turns that payload
//! into strictly typed [`Edit`] values before anything else in the crate sees
//! it; offsets stay untrusted until the resolver has re-anchored them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AlignError;
use crate::mapping::CharSpan;

/// Kind of correction an edit proposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Spelling,
    Grammar,
    Punctuation,
    Agreement,
    Accent,
    Diacritic,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Spelling => "spelling",
            Category::Grammar => "grammar",
            Category::Punctuation => "punctuation",
            Category::Agreement => "agreement",
            Category::Accent => "accent",
            Category::Diacritic => "diacritic",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed replacement of `original` at `[start, end)` by `suggestion`
///
/// Offsets are UTF-16 code units into the canonical text. Before alignment
/// nothing about them is guaranteed; after alignment the canonical text at
/// `[start, end)` is exactly `original`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub original: String,
    pub suggestion: String,
    pub category: Category,
    pub explanation: String,
    pub confidence: f64,
}

impl Edit {
    pub fn new(start: usize, end: usize, original: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            start,
            end,
            original: original.into(),
            suggestion: suggestion.into(),
            category: Category::Other,
            explanation: String::new(),
            confidence: 1.0,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn span(&self) -> CharSpan {
        CharSpan::new(self.start, self.end)
    }

    /// Same metadata, different placement and text
    pub(crate) fn relocated(&self, span: CharSpan, original: &str, suggestion: &str) -> Self {
        Self {
            start: span.start,
            end: span.end,
            original: original.to_string(),
            suggestion: suggestion.to_string(),
            category: self.category,
            explanation: self.explanation.clone(),
            confidence: self.confidence,
        }
    }

    /// Get a human-readable description of this edit
    pub fn description(&self) -> String {
        format!(
            "[{}..{}) {}: \"{}\" → \"{}\"",
            self.start, self.end, self.category, self.original, self.suggestion
        )
    }
}

/// Record shape as produced by the model
#[derive(Debug, Deserialize)]
struct RawEdit {
    start: i64,
    end: i64,
    original: String,
    suggestion: String,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    explanation: String,
    #[serde(default = "default_confidence")]
    confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

fn saturating_offset(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

impl RawEdit {
    fn into_edit(self, index: usize) -> Result<Edit, AlignError> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(AlignError::invalid_edit(
                index,
                format!("confidence {} outside [0, 1]", self.confidence),
            ));
        }

        Ok(Edit {
            start: saturating_offset(self.start),
            end: saturating_offset(self.end),
            original: self.original,
            suggestion: self.suggestion,
            category: self.category,
            explanation: self.explanation,
            confidence: self.confidence,
        })
    }
}

/// Parse a JSON array of model edit records into typed edits
pub fn parse_edits(json: &str) -> Result<Vec<Edit>, AlignError> {
    let raw: Vec<RawEdit> =
        serde_json::from_str(json).map_err(|e| AlignError::json("parsing edit records", e))?;

    raw.into_iter()
        .enumerate()
        .map(|(index, record)| record.into_edit(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edits() {
        let json = r#"[
            {"start": 3, "end": 7, "original": "niño", "suggestion": "niña",
             "category": "agreement", "explanation": "gender", "confidence": 0.9},
            {"start": -4, "end": 2, "original": "El", "suggestion": "Él"}
        ]"#;

        let edits = parse_edits(json).unwrap();
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].category, Category::Agreement);
        assert_eq!(edits[0].span(), CharSpan::new(3, 7));
        assert_eq!(edits[1].start, 0);
        assert_eq!(edits[1].category, Category::Other);
        assert_eq!(edits[1].confidence, 1.0);
    }

    #[test]
    fn test_parse_rejects_bad_confidence() {
        let json = r#"[{"start": 0, "end": 1, "original": "a", "suggestion": "b", "confidence": 1.5}]"#;
        match parse_edits(json) {
            Err(AlignError::InvalidEdit { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected InvalidEdit, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_category() {
        let json = r#"[{"start": 0, "end": 1, "original": "a", "suggestion": "b", "category": "style"}]"#;
        assert!(matches!(parse_edits(json), Err(AlignError::Json { .. })));
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let json = r#"[{"start": 0, "end": 1, "original": "a"}]"#;
        assert!(matches!(parse_edits(json), Err(AlignError::Json { .. })));
    }

    #[test]
    fn test_builder() {
        let edit = Edit::new(0, 4, "gato", "perro")
            .with_category(Category::Spelling)
            .with_explanation("typo")
            .with_confidence(0.5);
        assert_eq!(edit.category, Category::Spelling);
        assert_eq!(edit.explanation, "typo");
        assert_eq!(edit.confidence, 0.5);
        assert!(edit.description().contains("spelling"));
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&Category::Diacritic).unwrap();
        assert_eq!(json, "\"diacritic\"");
    }
}
