//! Token diff hunks
//!
//! Hunks are derived from the LCS of two token sequences. Each matched pair is
//! an `Equal` hunk (consecutive ones coalesce); each gap between matches is a
//! `Replace`, `Remove` or `Insert` hunk depending on which side is non-empty.
//! The ordered hunks cover both token sequences with no gaps.

use std::fmt;
use std::iter;
use std::ops::Range;

use serde::Serialize;

use crate::algorithm::longest_common_subsequence;
use crate::mapping::CharSpan;
use crate::tokenizers::{range_span, token_texts, Token};

/// Type of hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HunkKind {
    /// Content remained unchanged
    Equal,
    /// Content was inserted
    Insert,
    /// Content was removed
    Remove,
    /// Content was replaced (remove + insert)
    Replace,
}

impl HunkKind {
    /// Whether the `before` side of this hunk changed
    pub fn touches_before(self) -> bool {
        matches!(self, HunkKind::Remove | HunkKind::Replace)
    }
}

/// A maximal region of one kind between two token sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hunk {
    pub kind: HunkKind,

    /// Token index range in the `before` sequence
    pub a_range: Range<usize>,

    /// Token index range in the `after` sequence
    pub b_range: Range<usize>,

    /// UTF-16 span in the `before` text
    pub a_span: CharSpan,

    /// UTF-16 span in the `after` text
    pub b_span: CharSpan,
}

impl Hunk {
    /// Get a human-readable description of this hunk
    pub fn description(&self, before: &[Token], after: &[Token]) -> String {
        let text = |tokens: &[Token], range: &Range<usize>| -> String {
            tokens[range.clone()].iter().map(|t| t.text.as_str()).collect()
        };

        match self.kind {
            HunkKind::Equal => "Equal".to_string(),
            HunkKind::Insert => format!("Insert: \"{}\"", text(after, &self.b_range)),
            HunkKind::Remove => format!("Remove: \"{}\"", text(before, &self.a_range)),
            HunkKind::Replace => format!(
                "Replace: \"{}\" → \"{}\"",
                text(before, &self.a_range),
                text(after, &self.b_range)
            ),
        }
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} a[{}..{}) b[{}..{})",
            self.kind, self.a_span.start, self.a_span.end, self.b_span.start, self.b_span.end
        )
    }
}

/// Compute the ordered hunks between two token sequences
///
/// `before_len` and `after_len` are the UTF-16 lengths of the texts the tokens
/// came from; they place empty sides at the end of a text.
pub fn compute_hunks(before: &[Token], after: &[Token], before_len: usize, after_len: usize) -> Vec<Hunk> {
    let lcs = longest_common_subsequence(&token_texts(before), &token_texts(after));

    let mut hunks: Vec<Hunk> = Vec::new();
    let mut a_idx = 0;
    let mut b_idx = 0;

    let mut push = |kind: HunkKind, a_range: Range<usize>, b_range: Range<usize>| {
        if let Some(last) = hunks.last_mut() {
            if kind == HunkKind::Equal && last.kind == HunkKind::Equal {
                last.a_range.end = a_range.end;
                last.b_range.end = b_range.end;
                last.a_span.end = range_span(before, a_range, before_len).end;
                last.b_span.end = range_span(after, b_range, after_len).end;
                return;
            }
        }
        hunks.push(Hunk {
            kind,
            a_span: range_span(before, a_range.clone(), before_len),
            b_span: range_span(after, b_range.clone(), after_len),
            a_range,
            b_range,
        });
    };

    // The sentinel closes the trailing gap and never emits an Equal hunk
    let sentinel = (before.len(), after.len());
    for (a_match, b_match) in lcs.into_iter().chain(iter::once(sentinel)) {
        let kind = match (a_idx < a_match, b_idx < b_match) {
            (true, true) => Some(HunkKind::Replace),
            (true, false) => Some(HunkKind::Remove),
            (false, true) => Some(HunkKind::Insert),
            (false, false) => None,
        };
        if let Some(kind) = kind {
            push(kind, a_idx..a_match, b_idx..b_match);
        }

        if (a_match, b_match) != sentinel {
            push(HunkKind::Equal, a_match..a_match + 1, b_match..b_match + 1);
        }

        a_idx = a_match + 1;
        b_idx = b_match + 1;
    }

    hunks
}
