//! Basic usage example of the realign library

use realign_core::{
    align_corrections, canonicalize, highlight_diff, parse_edits, AlignConfig, CorrectionEngine, Edit,
};

const LINE: &str = "----------------------------------------";

fn main() {
    println!("=== Realign Examples ===\n");

    // Example 1: Re-anchoring edits with wrong offsets
    example_relocation();

    // Example 2: Splitting a clause-sized rewrite
    example_split();

    // Example 3: Highlighting from a corrected text
    example_highlight();

    // Example 4: Full pipeline from a raw model payload
    example_pipeline();
}

fn example_relocation() {
    println!("Example 1: Relocation");
    println!("{}", LINE);

    let canonical = "El niño paso a la tienda.";
    let edits = vec![
        Edit::new(0, 4, "paso", "pasó"),
        Edit::new(40, 46, "tienda", "tiendita"),
        Edit::new(3, 7, "perro", "gato"),
    ];

    let resolution = match align_corrections(canonical, &edits, None) {
        Ok(resolution) => resolution,
        Err(e) => {
            eprintln!("alignment failed: {}", e);
            return;
        }
    };

    println!("Text: {}", canonical);
    println!("{}", resolution.metrics);
    for diagnostic in &resolution.diagnostics {
        println!(
            "  edit {}: {:?} via {:?} (moved {})",
            diagnostic.index, diagnostic.outcome, diagnostic.strategy, diagnostic.relocation
        );
    }
    println!();
}

fn example_split() {
    println!("Example 2: Oversized Split");
    println!("{}", LINE);

    let clause = "los niños jugaban en el parque cuando empezo a llover fuerte";
    let canonical = format!("Ayer {}.", clause);
    let edits = vec![Edit::new(
        5,
        65,
        clause,
        "los niños jugaban en el parque cuando empezó a llover",
    )];

    let config = AlignConfig::default().with_split_thresholds(48, 8);
    match align_corrections(&canonical, &edits, Some(config)) {
        Ok(resolution) => {
            for edit in &resolution.edits {
                println!("  {}", edit.description());
            }
        }
        Err(e) => eprintln!("alignment failed: {}", e),
    }
    println!();
}

fn example_highlight() {
    println!("Example 3: Highlight");
    println!("{}", LINE);

    let before = "el gato gato duerme en la cama";
    let after = "el perro duerme en su cama";
    let edits = vec![Edit::new(3, 7, "gato", "perro"), Edit::new(23, 25, "la", "su")];

    let highlight = highlight_diff(before, after, &edits);
    println!("{}", highlight.summary());
    for span in &highlight.spans {
        println!("  [{}..{}) {} (hunk {})", span.start, span.end, span.category, span.source_hunk);
    }
    for unplaced in &highlight.diagnostics.unplaced {
        println!("  unplaced edit {}: {:?}", unplaced.edit_index, unplaced.reason);
    }
    println!();
}

fn example_pipeline() {
    println!("Example 4: Full Pipeline");
    println!("{}", LINE);

    let raw = "Yo tengo un gato.\r\n";
    let payload = r#"[{"start": 2, "end": 6, "original": "gato", "suggestion": "perro", "category": "spelling"}]"#;

    let canonical = canonicalize(raw);
    let edits = match parse_edits(payload) {
        Ok(edits) => edits,
        Err(e) => {
            eprintln!("bad payload: {}", e);
            return;
        }
    };

    let engine = CorrectionEngine::default();
    let report = engine.process(&canonical, &edits, "Yo tengo un perro.\n");
    print!("{}", report);

    match report.to_json() {
        Ok(json) => println!("\n{}", json),
        Err(e) => eprintln!("serialization failed: {}", e),
    }
}
