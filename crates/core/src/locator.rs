//! Fuzzy relocation of untrusted spans
//!
//! A `FuzzyLocator` is an ordered chain of strategies. Each strategy is a pure
//! function from a query to an optional span; the chain returns the first
//! success. The default chain escalates from cheap and certain to expensive
//! and approximate:
//!
//! 1. exact match at the hinted offset
//! 2. unique occurrence within a window around the hint
//! 3. first occurrence at or after the resolver's cursor
//! 4. best approximate (edit distance) alignment within a wider window

use serde::Serialize;

use crate::algorithm::levenshtein;
use crate::config::LocatorConfig;
use crate::mapping::{utf16_len, CharSpan, TextIndex};

/// Which strategy placed an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// The reported span was already correct
    Reported,
    ExactAtHint,
    WindowedUnique,
    ForwardGreedy,
    Approximate,
}

/// Input shared by every strategy
#[derive(Debug, Clone, Copy)]
pub struct LocateQuery<'a> {
    pub index: &'a TextIndex<'a>,
    pub needle: &'a str,
    /// Clamped reported start, UTF-16 units
    pub hint: usize,
    /// End of the last placed edit, UTF-16 units
    pub cursor: usize,
}

impl<'a> LocateQuery<'a> {
    pub fn new(index: &'a TextIndex<'a>, needle: &'a str, hint: usize, cursor: usize) -> Self {
        Self {
            index,
            needle,
            hint,
            cursor,
        }
    }

    fn window(&self, half_width: usize) -> (usize, usize) {
        self.index
            .byte_window(self.hint.saturating_sub(half_width), self.hint.saturating_add(half_width))
    }

    fn span_at_byte(&self, at: usize) -> Option<CharSpan> {
        self.index.span_of_bytes(at, at + self.needle.len())
    }
}

/// A successful placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    pub span: CharSpan,
    pub strategy: Strategy,
}

/// Trait for a single relocation strategy
pub trait LocateStrategy: Send + Sync {
    fn locate(&self, query: &LocateQuery<'_>) -> Option<CharSpan>;

    fn kind(&self) -> Strategy;
}

// ============================================================================
// Built-in Strategies
// ============================================================================

/// The needle sits exactly at the hinted offset
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactAtHint;

impl LocateStrategy for ExactAtHint {
    fn locate(&self, query: &LocateQuery<'_>) -> Option<CharSpan> {
        let start = query.index.byte_at(query.hint)?;
        query.index.text()[start..]
            .starts_with(query.needle)
            .then(|| CharSpan::new(query.hint, query.hint + utf16_len(query.needle)))
    }

    fn kind(&self) -> Strategy {
        Strategy::ExactAtHint
    }
}

/// Exactly one occurrence within `hint ± window`; ambiguity fails
#[derive(Debug, Clone, Copy)]
pub struct WindowedUnique {
    pub window: usize,
}

impl LocateStrategy for WindowedUnique {
    fn locate(&self, query: &LocateQuery<'_>) -> Option<CharSpan> {
        if query.needle.is_empty() {
            return None;
        }

        let (lo, hi) = query.window(self.window);
        let region = &query.index.text()[lo..hi];

        // Overlapping occurrences count too: "aa" occurs twice in "aaa"
        let step = query.needle.chars().next().map_or(1, char::len_utf8);
        let mut found = None;
        let mut from = 0;
        while let Some(pos) = region[from..].find(query.needle) {
            if found.is_some() {
                return None;
            }
            found = Some(from + pos);
            from += pos + step;
        }

        query.span_at_byte(lo + found?)
    }

    fn kind(&self) -> Strategy {
        Strategy::WindowedUnique
    }
}

/// First occurrence at or after the cursor
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardGreedy;

impl LocateStrategy for ForwardGreedy {
    fn locate(&self, query: &LocateQuery<'_>) -> Option<CharSpan> {
        if query.needle.is_empty() {
            return None;
        }

        let from = query.index.floor_byte(query.cursor);
        let pos = query.index.text()[from..].find(query.needle)?;
        query.span_at_byte(from + pos)
    }

    fn kind(&self) -> Strategy {
        Strategy::ForwardGreedy
    }
}

/// Best edit-distance alignment of a needle-sized window within
/// `hint ± window`
///
/// A position passes when its distance is at most `max_edit_distance` OR its
/// similarity is at least `min_similarity`; the passing position with the
/// highest similarity wins, leftmost on ties.
#[derive(Debug, Clone, Copy)]
pub struct ApproximateAlignment {
    pub window: usize,
    pub max_edit_distance: usize,
    pub min_similarity: f64,
}

impl LocateStrategy for ApproximateAlignment {
    fn locate(&self, query: &LocateQuery<'_>) -> Option<CharSpan> {
        let needle: Vec<char> = query.needle.chars().collect();
        if needle.is_empty() {
            return None;
        }

        let (lo, hi) = query.window(self.window);
        let base = query.index.unit_at(lo)?;

        let mut chars = Vec::new();
        let mut offsets = Vec::new();
        let mut unit = base;
        for ch in query.index.text()[lo..hi].chars() {
            chars.push(ch);
            offsets.push(unit);
            unit += ch.len_utf16();
        }
        offsets.push(unit);

        let n = needle.len();
        if chars.len() < n {
            return None;
        }

        let mut best: Option<(usize, f64)> = None;
        for i in 0..=chars.len() - n {
            let distance = levenshtein::distance(&needle, &chars[i..i + n]);
            let similarity = 1.0 - distance as f64 / n as f64;

            if distance > self.max_edit_distance && similarity < self.min_similarity {
                continue;
            }
            if best.map_or(true, |(_, s)| similarity > s) {
                best = Some((i, similarity));
            }
            if distance == 0 {
                break;
            }
        }

        let (i, _) = best?;
        Some(CharSpan::new(offsets[i], offsets[i + n]))
    }

    fn kind(&self) -> Strategy {
        Strategy::Approximate
    }
}

// ============================================================================
// Strategy chain
// ============================================================================

/// An ordered chain of strategies; the first success wins
pub struct FuzzyLocator {
    strategies: Vec<Box<dyn LocateStrategy>>,
}

impl FuzzyLocator {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy to the chain
    pub fn add_strategy(mut self, strategy: Box<dyn LocateStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// The four-step chain described in the module docs
    pub fn from_config(config: &LocatorConfig) -> Self {
        let locator = Self::new()
            .add_strategy(Box::new(ExactAtHint))
            .add_strategy(Box::new(WindowedUnique {
                window: config.window,
            }))
            .add_strategy(Box::new(ForwardGreedy));

        if config.allow_approximate {
            locator.add_strategy(Box::new(ApproximateAlignment {
                window: config.wide_window,
                max_edit_distance: config.max_edit_distance,
                min_similarity: config.min_similarity,
            }))
        } else {
            locator
        }
    }

    pub fn locate(&self, query: &LocateQuery<'_>) -> Option<Located> {
        self.strategies.iter().find_map(|strategy| {
            strategy.locate(query).map(|span| Located {
                span,
                strategy: strategy.kind(),
            })
        })
    }

    /// Strategy kinds in chain order
    pub fn kinds(&self) -> Vec<Strategy> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }
}

impl Default for FuzzyLocator {
    fn default() -> Self {
        Self::from_config(&LocatorConfig::default())
    }
}
