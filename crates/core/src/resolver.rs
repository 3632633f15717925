//! Re-anchoring of untrusted edits onto canonical text
//!
//! Edits are processed in order of their reported start. A cursor marks the
//! end of the last placed piece; nothing may be placed before it. The cursor
//! and the accumulated output live in a `ResolveState` that is threaded
//! through a fold over the sorted edits and never escapes `resolve`.

use serde::Serialize;

use crate::config::AlignConfig;
use crate::edit::Edit;
use crate::locator::{ForwardGreedy, FuzzyLocator, LocateQuery, LocateStrategy, Located, Strategy};
use crate::mapping::TextIndex;
use crate::metrics::{AlignmentMetrics, SkipReason};
use crate::splitter::OversizedSplitter;

/// What happened to one input edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EditOutcome {
    Accepted { pieces: usize },
    Skipped { reason: SkipReason },
}

/// Per-edit diagnostic record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditDiagnostic {
    /// Position of the edit in the input list
    pub index: usize,

    /// Strategy that produced the final placement (or the last one tried
    /// before an overlap skip)
    pub strategy: Option<Strategy>,

    /// Placed start minus reported start, in UTF-16 units
    pub relocation: i64,

    pub outcome: EditOutcome,
}

/// Output of one resolver run
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// Sorted, non-overlapping edits whose `original` matches the canonical text
    pub edits: Vec<Edit>,

    /// `sources[k]` is the input index that produced `edits[k]`
    pub sources: Vec<usize>,

    pub metrics: AlignmentMetrics,

    /// One record per input edit, in input order
    pub diagnostics: Vec<EditDiagnostic>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Diagnostic for the input edit at `index`
    pub fn diagnostic(&self, index: usize) -> Option<&EditDiagnostic> {
        self.diagnostics.iter().find(|d| d.index == index)
    }
}

struct ResolveState {
    cursor: usize,
    placed: Vec<(usize, Edit)>,
    diagnostics: Vec<EditDiagnostic>,
    metrics: AlignmentMetrics,
}

impl ResolveState {
    fn new(total: usize) -> Self {
        Self {
            cursor: 0,
            placed: Vec::new(),
            diagnostics: Vec::with_capacity(total),
            metrics: AlignmentMetrics::new(total),
        }
    }

    fn accept(mut self, input: usize, strategy: Strategy, relocation: i64, pieces: Vec<Edit>) -> Self {
        self.metrics.record_relocation(relocation);
        self.metrics.record_split(pieces.len());
        if let Some(last) = pieces.last() {
            self.cursor = self.cursor.max(last.end);
        }
        self.diagnostics.push(EditDiagnostic {
            index: input,
            strategy: Some(strategy),
            relocation,
            outcome: EditOutcome::Accepted {
                pieces: pieces.len(),
            },
        });
        self.placed.extend(pieces.into_iter().map(|piece| (input, piece)));
        self
    }

    fn skip(mut self, input: usize, reason: SkipReason, strategy: Option<Strategy>) -> Self {
        tracing::debug!(index = input, ?reason, "skipped edit");
        self.metrics.record_skip(reason);
        self.diagnostics.push(EditDiagnostic {
            index: input,
            strategy,
            relocation: 0,
            outcome: EditOutcome::Skipped { reason },
        });
        self
    }
}

/// Re-anchors untrusted edits and normalizes the accepted set
pub struct AlignmentResolver {
    locator: FuzzyLocator,
    splitter: OversizedSplitter,
}

impl AlignmentResolver {
    pub fn new(config: &AlignConfig) -> Self {
        Self {
            locator: FuzzyLocator::from_config(&config.locator),
            splitter: OversizedSplitter::new(config.split.clone()),
        }
    }

    /// Build a resolver from explicit parts
    pub fn with_parts(locator: FuzzyLocator, splitter: OversizedSplitter) -> Self {
        Self { locator, splitter }
    }

    pub fn resolve(&self, canonical: &str, edits: &[Edit]) -> Resolution {
        let index = TextIndex::new(canonical);

        let mut order: Vec<(usize, &Edit)> = edits.iter().enumerate().collect();
        order.sort_by_key(|(_, edit)| edit.start);

        let state = order
            .into_iter()
            .fold(ResolveState::new(edits.len()), |state, (input, edit)| {
                self.place(state, &index, input, edit)
            });

        let ResolveState {
            placed,
            mut diagnostics,
            mut metrics,
            ..
        } = state;

        let (kept, dropped) = normalize(placed);
        diagnostics.sort_by_key(|d| d.index);
        retract_dropped(&mut diagnostics, &mut metrics, &dropped);
        metrics.finalize(dropped.len());

        tracing::debug!(
            total = metrics.total,
            accepted = metrics.accepted(),
            reindexed = metrics.reindexed,
            skipped = metrics.skipped,
            splits = metrics.oversized_splits,
            "resolved edits"
        );

        let (sources, edits) = kept.into_iter().unzip();
        Resolution {
            edits,
            sources,
            metrics,
            diagnostics,
        }
    }

    fn place(&self, state: ResolveState, index: &TextIndex<'_>, input: usize, edit: &Edit) -> ResolveState {
        match self.anchor(index, edit, state.cursor) {
            Ok((anchored, strategy)) => {
                let relocation = signed_delta(anchored.start, edit.start);
                if relocation != 0 {
                    tracing::debug!(index = input, relocation, ?strategy, "relocated edit");
                }

                let pieces = self.splitter.split(&anchored);
                state.accept(input, strategy, relocation, pieces)
            }
            Err((reason, strategy)) => state.skip(input, reason, strategy),
        }
    }

    /// Steps (a) to (e): clamp, accept as reported or relocate, keep clear of
    /// the cursor, re-verify
    fn anchor(
        &self,
        index: &TextIndex<'_>,
        edit: &Edit,
        cursor: usize,
    ) -> Result<(Edit, Strategy), (SkipReason, Option<Strategy>)> {
        let reported = index.clamp(edit.start, edit.end);
        let query = LocateQuery::new(index, &edit.original, reported.start, cursor);

        let located = if index.slice(reported) == Some(edit.original.as_str()) {
            Located {
                span: reported,
                strategy: Strategy::Reported,
            }
        } else {
            self.locator
                .locate(&query)
                .ok_or((SkipReason::Unlocatable, None))?
        };

        let located = if located.span.start < cursor {
            let span = ForwardGreedy
                .locate(&query)
                .ok_or((SkipReason::Overlap, Some(located.strategy)))?;
            Located {
                span,
                strategy: Strategy::ForwardGreedy,
            }
        } else {
            located
        };

        let strategy = located.strategy;
        let found = index
            .slice(located.span)
            .ok_or((SkipReason::Mismatch, Some(strategy)))?;

        // an approximate hit re-anchors the edit onto the text actually there
        let original = if strategy == Strategy::Approximate {
            found
        } else {
            edit.original.as_str()
        };

        if found != original {
            tracing::warn!(
                start = located.span.start,
                end = located.span.end,
                ?strategy,
                "placed span does not match original"
            );
            return Err((SkipReason::Mismatch, Some(strategy)));
        }

        Ok((edit.relocated(located.span, original, &edit.suggestion), strategy))
    }
}

impl Default for AlignmentResolver {
    fn default() -> Self {
        Self::new(&AlignConfig::default())
    }
}

/// `placed - reported` in UTF-16 units, saturating at the `i64` range
fn signed_delta(placed: usize, reported: usize) -> i64 {
    let magnitude = i64::try_from(placed.abs_diff(reported)).unwrap_or(i64::MAX);
    if placed >= reported {
        magnitude
    } else {
        -magnitude
    }
}

/// Sort by start and drop anything overlapping an earlier kept edit, plus
/// exact duplicates. Returns the kept edits and the sources of the dropped
/// ones.
fn normalize(mut placed: Vec<(usize, Edit)>) -> (Vec<(usize, Edit)>, Vec<usize>) {
    placed.sort_by_key(|(_, edit)| (edit.start, edit.end));

    let mut kept: Vec<(usize, Edit)> = Vec::with_capacity(placed.len());
    let mut dropped = Vec::new();

    for (source, edit) in placed {
        if let Some((_, last)) = kept.last() {
            let overlaps = edit.start < last.end;
            let duplicate = edit.span() == last.span() && edit.suggestion == last.suggestion;
            if overlaps || duplicate {
                tracing::debug!(start = edit.start, end = edit.end, "dropped in final pass");
                dropped.push(source);
                continue;
            }
        }
        kept.push((source, edit));
    }

    (kept, dropped)
}

/// Bring diagnostics and metrics in line with the final pass: an input loses
/// the pieces that were dropped, and one left with none becomes `Superseded`
fn retract_dropped(diagnostics: &mut [EditDiagnostic], metrics: &mut AlignmentMetrics, dropped: &[usize]) {
    for diagnostic in diagnostics.iter_mut() {
        let lost = dropped.iter().filter(|&&source| source == diagnostic.index).count();
        let EditOutcome::Accepted { pieces } = diagnostic.outcome else {
            continue;
        };
        if lost == 0 {
            continue;
        }

        let remaining = pieces.saturating_sub(lost);
        if remaining > 0 {
            diagnostic.outcome = EditOutcome::Accepted { pieces: remaining };
            continue;
        }

        metrics.retract(diagnostic.relocation, pieces);
        metrics.record_skip(SkipReason::Superseded);
        diagnostic.relocation = 0;
        diagnostic.outcome = EditOutcome::Skipped {
            reason: SkipReason::Superseded,
        };
    }
}
