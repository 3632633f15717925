//! Oversized edit splitting
//!
//! Models sometimes rewrite a whole clause to fix one word. When an edit's
//! `original` exceeds the configured size, the original and suggestion are
//! token-diffed and every maximal non-matching gap becomes its own edit.

use std::iter;

use crate::algorithm::longest_common_subsequence;
use crate::config::SplitConfig;
use crate::edit::Edit;
use crate::mapping::utf16_len;
use crate::tokenizers::{range_byte_span, range_span, token_texts, tokenize, Token};

/// Splits edits that exceed the size thresholds into atomic sub-edits
#[derive(Debug, Clone, Default)]
pub struct OversizedSplitter {
    config: SplitConfig,
}

impl OversizedSplitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn is_oversized(&self, edit: &Edit) -> bool {
        utf16_len(&edit.original) > self.config.max_chars
            || edit.original.split_whitespace().count() > self.config.max_words
    }

    /// Split `edit` into ordered, non-overlapping pieces
    ///
    /// Returns `[edit]` when the edit is within bounds or when token diffing
    /// finds nothing better than the whole edit.
    pub fn split(&self, edit: &Edit) -> Vec<Edit> {
        if !self.is_oversized(edit) {
            return vec![edit.clone()];
        }

        let original = tokenize(&edit.original);
        let suggestion = tokenize(&edit.suggestion);
        let pieces = gap_pieces(edit, &original, &suggestion);

        if pieces.iter().all(|piece| piece.start == piece.end) {
            return vec![edit.clone()];
        }

        tracing::debug!(
            start = edit.start,
            end = edit.end,
            pieces = pieces.len(),
            "split oversized edit"
        );
        pieces
    }
}

fn gap_pieces(edit: &Edit, original: &[Token], suggestion: &[Token]) -> Vec<Edit> {
    let matches = longest_common_subsequence(&token_texts(original), &token_texts(suggestion));
    let original_len = utf16_len(&edit.original);

    let mut pieces = Vec::new();
    let mut orig_idx = 0;
    let mut sugg_idx = 0;

    // The sentinel closes the trailing gap
    for (orig_match, sugg_match) in matches.into_iter().chain(iter::once((original.len(), suggestion.len()))) {
        let orig_gap = orig_idx..orig_match;
        let sugg_gap = sugg_idx..sugg_match;

        if !orig_gap.is_empty() || !sugg_gap.is_empty() {
            let span = range_span(original, orig_gap.clone(), original_len);
            let orig_bytes = range_byte_span(original, orig_gap, edit.original.len());
            let sugg_bytes = range_byte_span(suggestion, sugg_gap, edit.suggestion.len());

            pieces.push(edit.relocated(
                span.offset_by(edit.start),
                &edit.original[orig_bytes.start..orig_bytes.end],
                &edit.suggestion[sugg_bytes.start..sugg_bytes.end],
            ));
        }

        orig_idx = orig_match + 1;
        sugg_idx = sugg_match + 1;
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::Category;
    use crate::mapping::{CharSpan, TextIndex};

    const CLAUSE: &str = "los niños jugaban en el parque cuando empezo a llover fuerte";
    const REWRITE: &str = "los niños jugaban en el parque cuando empezó a llover";

    #[test]
    fn test_small_edit_untouched() {
        let splitter = OversizedSplitter::default();
        let edit = Edit::new(3, 7, "niño", "niña");
        assert_eq!(splitter.split(&edit), vec![edit]);
    }

    #[test]
    fn test_split_clause() {
        let splitter = OversizedSplitter::default();
        let edit = Edit::new(5, 65, CLAUSE, REWRITE).with_category(Category::Accent);
        assert!(splitter.is_oversized(&edit));

        let pieces = splitter.split(&edit);
        assert_eq!(pieces.len(), 2);

        assert_eq!((pieces[0].start, pieces[0].end), (43, 49));
        assert_eq!(pieces[0].original, "empezo");
        assert_eq!(pieces[0].suggestion, "empezó");
        assert_eq!(pieces[0].category, Category::Accent);

        assert_eq!((pieces[1].start, pieces[1].end), (58, 65));
        assert_eq!(pieces[1].original, " fuerte");
        assert_eq!(pieces[1].suggestion, "");
    }

    #[test]
    fn test_word_threshold() {
        let splitter = OversizedSplitter::new(SplitConfig {
            max_chars: 1000,
            max_words: 3,
        });
        let edit = Edit::new(0, 15, "uno dos tres cuatro", "uno dos tres cinco");
        assert!(splitter.is_oversized(&edit));

        let pieces = splitter.split(&edit);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].original, "cuatro");
        assert_eq!(pieces[0].start, 13);
    }

    #[test]
    fn test_insertion_piece() {
        let splitter = OversizedSplitter::new(SplitConfig {
            max_chars: 4,
            max_words: 8,
        });
        let edit = Edit::new(10, 24, "uno tres cinco", "uno dos tres seis");
        let pieces = splitter.split(&edit);

        assert_eq!(pieces.len(), 2);
        // the inserted word lands as a zero-width piece before "tres"
        assert_eq!((pieces[0].start, pieces[0].end), (14, 14));
        assert_eq!(pieces[0].original, "");
        assert_eq!(pieces[0].suggestion, "dos ");
        assert_eq!((pieces[1].start, pieces[1].end), (19, 24));
        assert_eq!(pieces[1].original, "cinco");
        assert_eq!(pieces[1].suggestion, "seis");
    }

    #[test]
    fn test_only_insertions_fall_back() {
        let splitter = OversizedSplitter::new(SplitConfig {
            max_chars: 4,
            max_words: 8,
        });
        let edit = Edit::new(0, 8, "uno tres", "uno dos tres");
        assert_eq!(splitter.split(&edit), vec![edit]);
    }

    #[test]
    fn test_identical_texts_fall_back() {
        let splitter = OversizedSplitter::new(SplitConfig {
            max_chars: 2,
            max_words: 1,
        });
        let edit = Edit::new(0, 9, "same text", "same text");
        assert_eq!(splitter.split(&edit), vec![edit]);
    }

    #[test]
    fn test_pieces_are_substrings_of_parent() {
        let splitter = OversizedSplitter::default();
        let edit = Edit::new(5, 65, CLAUSE, REWRITE);
        let parent = TextIndex::new(CLAUSE);
        let mut last_end = edit.start;
        for piece in splitter.split(&edit) {
            assert!(piece.start >= last_end);
            assert!(piece.end <= edit.end);
            let local = CharSpan::new(piece.start - edit.start, piece.end - edit.start);
            assert_eq!(parent.slice(local), Some(piece.original.as_str()));
            last_end = piece.end;
        }
    }
}
