//! End-to-end scenarios for alignment and highlighting

use pretty_assertions::assert_eq;
use realign_core::{
    align_corrections, canonicalize, highlight_diff, parse_edits, AlignConfig, Category, CorrectionEngine, Edit,
    HunkKind, SkipReason, Strategy, UnplacedReason,
};
use realign_core::resolver::EditOutcome;

fn utf16_slice(text: &str, start: usize, end: usize) -> String {
    let units: Vec<u16> = text.encode_utf16().collect();
    String::from_utf16_lossy(&units[start..end])
}

fn assert_clean(canonical: &str, edits: &[Edit]) {
    for edit in edits {
        assert_eq!(utf16_slice(canonical, edit.start, edit.end), edit.original);
    }
    for pair in edits.windows(2) {
        assert!(pair[0].end <= pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
    }
}

#[test]
fn test_wrong_hint_is_relocated() {
    let canonical = "El niño paso a la tienda.";
    let edits = vec![Edit::new(0, 4, "niño", "niño").with_category(Category::Spelling)];

    let resolution = align_corrections(canonical, &edits, None).unwrap();

    assert_eq!(resolution.edits.len(), 1);
    assert_eq!((resolution.edits[0].start, resolution.edits[0].end), (3, 7));
    assert_eq!(resolution.metrics.reindexed, 1);
    assert_eq!(resolution.diagnostics[0].strategy, Some(Strategy::WindowedUnique));
    assert_eq!(resolution.diagnostics[0].relocation, 3);
    assert_clean(canonical, &resolution.edits);
}

#[test]
fn test_overlapping_edits_keep_the_earlier() {
    let canonical = "the cat sat on the mat";
    let edits = vec![Edit::new(5, 7, "at", "og"), Edit::new(4, 7, "cat", "dog")];

    let resolution = align_corrections(canonical, &edits, None).unwrap();

    assert_clean(canonical, &resolution.edits);
    assert_eq!(resolution.edits[0].original, "cat");
    assert_eq!(resolution.sources[0], 1);
    // the later edit is pushed forward past the cursor
    assert_eq!((resolution.edits[1].start, resolution.edits[1].end), (9, 11));
    assert_eq!(resolution.diagnostics[0].strategy, Some(Strategy::ForwardGreedy));
}

#[test]
fn test_overlap_without_room_is_skipped() {
    let canonical = "the cat";
    let edits = vec![Edit::new(4, 7, "cat", "dog"), Edit::new(5, 7, "at", "og")];

    let resolution = align_corrections(canonical, &edits, None).unwrap();

    assert_eq!(resolution.edits.len(), 1);
    assert_eq!(resolution.metrics.skipped_overlap, 1);
    assert_eq!(
        resolution.diagnostic(1).map(|d| d.outcome),
        Some(EditOutcome::Skipped {
            reason: SkipReason::Overlap
        })
    );
}

#[test]
fn test_clause_rewrite_is_split() {
    let clause = "los niños jugaban en el parque cuando empezo a llover fuerte";
    let rewrite = "los niños jugaban en el parque cuando empezó a llover";
    let canonical = format!("Ayer {}.", clause);
    let edits = vec![Edit::new(5, 65, clause, rewrite).with_category(Category::Accent)];

    let resolution = align_corrections(&canonical, &edits, None).unwrap();

    assert!(resolution.edits.len() >= 2);
    assert_eq!(resolution.metrics.oversized_splits, 1);
    assert_eq!(resolution.sources, vec![0; resolution.edits.len()]);
    for piece in &resolution.edits {
        assert!(piece.start >= 5 && piece.end <= 65);
        assert!(piece.end - piece.start < 48);
        assert_eq!(piece.category, Category::Accent);
    }
    assert_clean(&canonical, &resolution.edits);

    let originals: Vec<&str> = resolution.edits.iter().map(|e| e.original.as_str()).collect();
    assert_eq!(originals, vec!["empezo", " fuerte"]);
}

#[test]
fn test_single_replace_highlight() {
    let edits = vec![Edit::new(12, 16, "gato", "perro").with_category(Category::Grammar)];
    let highlight = highlight_diff("Yo tengo un gato.", "Yo tengo un perro.", &edits);

    let kinds: Vec<HunkKind> = highlight.hunks.iter().map(|h| h.kind).collect();
    assert_eq!(kinds, vec![HunkKind::Equal, HunkKind::Replace, HunkKind::Equal]);

    assert_eq!(highlight.spans.len(), 1);
    assert_eq!((highlight.spans[0].start, highlight.spans[0].end), (12, 16));
    assert_eq!(highlight.spans[0].source_hunk, 1);
    assert_eq!(highlight.spans[0].category, Category::Grammar);
    assert_eq!(highlight.edit_to_span, vec![Some(0)]);
}

#[test]
fn test_repeated_original_is_not_guessed() {
    let edits = vec![Edit::new(3, 7, "gato", "perro")];
    let highlight = highlight_diff("el gato gato duerme", "el perro duerme", &edits);

    assert_eq!(highlight.edit_to_span, vec![None]);
    assert_eq!(highlight.diagnostics.unplaced.len(), 1);
    assert_eq!(highlight.diagnostics.unplaced[0].reason, UnplacedReason::Ambiguous);
}

#[test]
fn test_unlocatable_edit_in_strict_mode() {
    let canonical = "El niño paso a la tienda.";
    let edits = vec![Edit::new(3, 7, "nino", "niño")];

    let resolution = align_corrections(canonical, &edits, Some(AlignConfig::strict())).unwrap();
    assert!(resolution.is_empty());
    assert_eq!(resolution.metrics.skipped_unlocatable, 1);

    // the approximate strategy recovers it and takes the canonical spelling
    let resolution = align_corrections(canonical, &edits, None).unwrap();
    assert_eq!(resolution.edits.len(), 1);
    assert_eq!(resolution.edits[0].original, "niño");
    assert_eq!(resolution.diagnostics[0].strategy, Some(Strategy::Approximate));
}

#[test]
fn test_full_pipeline_from_raw_input() {
    let canonical = canonicalize("El nin\u{0303}o paso a la tienda.\r\n");
    let json = r#"[
        {"start": 8, "end": 12, "original": "paso", "suggestion": "pasó", "category": "accent"},
        {"start": 30, "end": 31, "original": "z", "suggestion": "s"}
    ]"#;
    let edits = parse_edits(json).unwrap();

    let engine = CorrectionEngine::new(AlignConfig::strict()).unwrap();
    let report = engine.process(&canonical, &edits, "El niño pasó a la tienda.\n");

    assert_eq!(report.resolution.edits.len(), 1);
    assert_eq!(report.resolution.metrics.skipped, 1);
    assert_eq!(report.highlight.spans.len(), 1);
    assert_eq!(report.highlight.spans[0].category, Category::Accent);
    assert_eq!(report.highlight.edit_to_span, vec![Some(0)]);
    assert_clean(&canonical, &report.resolution.edits);
}
