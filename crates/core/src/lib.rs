//! # Realign
//!
//! Alignment and diff engine for model-proposed text corrections. A language
//! model returns a list of edits with offsets that are frequently stale or
//! wrong; this crate re-anchors them onto the canonical text and derives
//! highlight spans from a plain diff of the text before and after correction.
//!
//! ## Core Concepts
//!
//! - **Tokenizer**: Splits text into letter, digit, whitespace and symbol runs
//! - **Sequence matcher**: Token-level longest common subsequence
//! - **Locator**: Ordered chain of strategies that finds an edit's true span
//! - **Splitter**: Breaks clause-sized edits into word-sized pieces
//! - **Resolver**: Produces sorted, non-overlapping, verified edits
//! - **Highlighter**: Turns a before/after diff into highlight spans and
//!   attaches edits to them
//!
//! All offsets are UTF-16 code units.
//!
//! ## Example
//!
//! ```rust
//! use realign_core::{align_corrections, highlight_diff, Edit};
//!
//! let canonical = "El niño paso a la tienda.";
//! // The reported offsets are wrong; the text is not
//! let edits = vec![Edit::new(0, 4, "paso", "pasó")];
//!
//! let resolution = align_corrections(canonical, &edits, None).unwrap();
//! assert_eq!(resolution.edits[0].start, 8);
//! assert_eq!(resolution.metrics.reindexed, 1);
//!
//! let highlight = highlight_diff(canonical, "El niño pasó a la tienda.", &resolution.edits);
//! assert_eq!(highlight.edit_to_span, vec![Some(0)]);
//! ```

pub mod algorithm;
pub mod canonical;
pub mod config;
pub mod diff;
pub mod edit;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod locator;
pub mod mapping;
pub mod metrics;
pub mod resolver;
pub mod splitter;
pub mod tokenizers;

// Re-export main types
pub use canonical::canonicalize;
pub use config::{AlignConfig, LocatorConfig, SplitConfig};
pub use diff::{Hunk, HunkKind};
pub use edit::{parse_edits, Category, Edit};
pub use engine::{CorrectionEngine, CorrectionReport};
pub use error::AlignError;
pub use highlight::{DiffHighlighter, Highlight, HighlightSpan, UnplacedReason};
pub use locator::{FuzzyLocator, LocateStrategy, Strategy};
pub use mapping::CharSpan;
pub use metrics::{AlignmentMetrics, SkipReason};
pub use resolver::{AlignmentResolver, Resolution};
pub use splitter::OversizedSplitter;
pub use tokenizers::{tokenize, Token, TokenKind};

/// Main entry point for re-anchoring edits onto canonical text
///
/// # Arguments
///
/// * `canonical` - Canonical text all offsets refer to
/// * `edits` - Untrusted edits as returned by the model
/// * `config` - Optional configuration (uses default if None)
///
/// # Errors
///
/// Only an invalid configuration is an error. Edits that cannot be placed are
/// reported in the resolution's diagnostics.
pub fn align_corrections(
    canonical: &str,
    edits: &[Edit],
    config: Option<AlignConfig>,
) -> Result<Resolution, AlignError> {
    let engine = CorrectionEngine::new(config.unwrap_or_default())?;
    Ok(engine.resolve(canonical, edits))
}

/// Highlight the changes from `before` to `after` and attach `edits`
///
/// ```rust
/// use realign_core::{highlight_diff, HunkKind};
///
/// let result = highlight_diff("Yo tengo un gato.", "Yo tengo un perro.", &[]);
/// assert_eq!(result.spans.len(), 1);
/// assert_eq!((result.spans[0].start, result.spans[0].end), (12, 16));
/// assert_eq!(result.hunks[1].kind, HunkKind::Replace);
/// ```
pub fn highlight_diff(before: &str, after: &str, edits: &[Edit]) -> Highlight {
    DiffHighlighter::new().diff(before, after, edits)
}
