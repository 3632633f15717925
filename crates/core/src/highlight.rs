//! Diff-driven highlighting
//!
//! The highlighter ignores the model's offsets entirely. It diffs the
//! canonical text against the model's corrected text, turns every
//! remove/replace hunk into a highlight span over the canonical text, and then
//! attaches edits to spans purely by where their `original` text occurs.

use serde::Serialize;

use crate::diff::{compute_hunks, Hunk};
use crate::edit::{Category, Edit};
use crate::mapping::{CharSpan, TextIndex};
use crate::tokenizers::tokenize;

/// A highlighted region of the `before` text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    /// Majority category of the attached edits, `other` when none attached
    pub category: Category,
    /// Index of the hunk this span came from
    pub source_hunk: usize,
}

impl HighlightSpan {
    pub fn span(&self) -> CharSpan {
        CharSpan::new(self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnplacedReason {
    /// `original` occurs in no highlight span
    NoMatchingHunk,
    /// `original` occurs in several spans, or in one span at several free
    /// positions, or only at positions already claimed
    Ambiguous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnplacedEdit {
    pub edit_index: usize,
    pub reason: UnplacedReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightDiagnostics {
    pub unplaced: Vec<UnplacedEdit>,
    /// Spans shortened because they started inside the previous span
    pub clipped_spans: usize,
    /// Spans removed because the previous span covered them entirely
    pub dropped_spans: usize,
}

/// Output of one highlighter run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    /// Ordered, non-overlapping spans over `before`
    pub spans: Vec<HighlightSpan>,
    pub hunks: Vec<Hunk>,
    /// Span index per input edit, `None` when unplaced
    pub edit_to_span: Vec<Option<usize>>,
    /// Input edit indices per span, in attachment order
    pub span_to_edits: Vec<Vec<usize>>,
    pub diagnostics: HighlightDiagnostics,
}

impl Highlight {
    /// The span an edit was attached to
    pub fn span_for_edit(&self, edit_index: usize) -> Option<&HighlightSpan> {
        self.edit_to_span
            .get(edit_index)
            .copied()
            .flatten()
            .and_then(|span| self.spans.get(span))
    }

    /// Summary of the highlight
    pub fn summary(&self) -> String {
        let attached = self.edit_to_span.iter().filter(|s| s.is_some()).count();
        format!(
            "{} hunks, {} spans, {}/{} edits attached",
            self.hunks.len(),
            self.spans.len(),
            attached,
            self.edit_to_span.len()
        )
    }
}

/// Builds highlight spans from a before/after pair and attaches edits to them
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffHighlighter;

impl DiffHighlighter {
    pub fn new() -> Self {
        Self
    }

    pub fn diff(&self, before: &str, after: &str, edits: &[Edit]) -> Highlight {
        let index = TextIndex::new(before);
        let after_index = TextIndex::new(after);
        let hunks = compute_hunks(
            &tokenize(before),
            &tokenize(after),
            index.len_utf16(),
            after_index.len_utf16(),
        );

        let mut diagnostics = HighlightDiagnostics::default();
        let mut spans = collect_spans(&hunks, &mut diagnostics);

        let mut edit_to_span = vec![None; edits.len()];
        let mut span_to_edits: Vec<Vec<usize>> = vec![Vec::new(); spans.len()];
        let mut claimed: Vec<Vec<CharSpan>> = vec![Vec::new(); spans.len()];

        for (edit_index, edit) in edits.iter().enumerate() {
            match attach(&index, &spans, &claimed, &edit.original) {
                Ok((span, occurrence)) => {
                    claimed[span].push(occurrence);
                    span_to_edits[span].push(edit_index);
                    edit_to_span[edit_index] = Some(span);
                }
                Err(reason) => {
                    tracing::debug!(edit_index, ?reason, original = %edit.original, "edit left unplaced");
                    diagnostics.unplaced.push(UnplacedEdit { edit_index, reason });
                }
            }
        }

        for (span, attached) in spans.iter_mut().zip(&span_to_edits) {
            span.category = majority_category(attached.iter().map(|&i| edits[i].category));
        }

        tracing::debug!(
            hunks = hunks.len(),
            spans = spans.len(),
            unplaced = diagnostics.unplaced.len(),
            "computed highlight"
        );

        Highlight {
            spans,
            hunks,
            edit_to_span,
            span_to_edits,
            diagnostics,
        }
    }
}

/// Spans from remove/replace hunks, clipped so that they never overlap
fn collect_spans(hunks: &[Hunk], diagnostics: &mut HighlightDiagnostics) -> Vec<HighlightSpan> {
    let mut candidates: Vec<HighlightSpan> = hunks
        .iter()
        .enumerate()
        .filter(|(_, hunk)| hunk.kind.touches_before())
        .map(|(source_hunk, hunk)| HighlightSpan {
            start: hunk.a_span.start,
            end: hunk.a_span.end,
            category: Category::Other,
            source_hunk,
        })
        .collect();
    candidates.sort_by_key(|span| (span.start, span.end));

    let mut spans: Vec<HighlightSpan> = Vec::with_capacity(candidates.len());
    for mut span in candidates {
        if let Some(prev) = spans.last() {
            if span.end <= prev.end {
                diagnostics.dropped_spans += 1;
                continue;
            }
            if span.start < prev.end {
                span.start = prev.end;
                diagnostics.clipped_spans += 1;
            }
        }
        spans.push(span);
    }
    spans
}

/// Find the single free occurrence of `needle` across all spans
fn attach(
    index: &TextIndex<'_>,
    spans: &[HighlightSpan],
    claimed: &[Vec<CharSpan>],
    needle: &str,
) -> Result<(usize, CharSpan), UnplacedReason> {
    if needle.is_empty() {
        return Err(UnplacedReason::NoMatchingHunk);
    }

    let mut hits = spans
        .iter()
        .enumerate()
        .map(|(i, span)| (i, occurrences_in(index, span.span(), needle)))
        .filter(|(_, found)| !found.is_empty());

    let (span, found) = hits.next().ok_or(UnplacedReason::NoMatchingHunk)?;
    if hits.next().is_some() {
        return Err(UnplacedReason::Ambiguous);
    }

    let mut free = found
        .into_iter()
        .filter(|occ| !claimed[span].iter().any(|taken| taken.overlaps(*occ)));
    match (free.next(), free.next()) {
        (Some(occurrence), None) => Ok((span, occurrence)),
        _ => Err(UnplacedReason::Ambiguous),
    }
}

/// Every occurrence of `needle` inside `span`, overlapping ones included
fn occurrences_in(index: &TextIndex<'_>, span: CharSpan, needle: &str) -> Vec<CharSpan> {
    let (Some(lo), Some(hi)) = (index.byte_at(span.start), index.byte_at(span.end)) else {
        return Vec::new();
    };
    let region = &index.text()[lo..hi];
    let step = needle.chars().next().map_or(1, char::len_utf8);

    let mut found = Vec::new();
    let mut from = 0;
    while let Some(pos) = region[from..].find(needle) {
        let at = lo + from + pos;
        found.extend(index.span_of_bytes(at, at + needle.len()));
        from += pos + step;
    }
    found
}

/// Most frequent category; ties go to the category attached first
fn majority_category(categories: impl Iterator<Item = Category>) -> Category {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for category in categories {
        match counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((category, 1)),
        }
    }

    let mut best: Option<(Category, usize)> = None;
    for (category, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((category, n));
        }
    }
    best.map_or(Category::Other, |(category, _)| category)
}
