//! Cross-file behaviour of a source collection

use mathlingua_analysis::{
    CollectionOptions, PathDiagnostic, RenderMode, RenderOptions, SourceCollection,
};
use mathlingua_parser::{DiagnosticKind, Location};

const NATURALS: &str = "[\\N]\nDefines: N\nwritten: \"\\mathbb{N}\"\n";
const USES: &str = "Theorem:\ngiven: x\nthen:\n. 'x is \\N'\n. 'x = \\N'\n";

fn collection(files: &[(&str, &str)]) -> SourceCollection {
    SourceCollection::from_sources(files.to_vec(), CollectionOptions::default())
}

fn summary(diagnostics: &[PathDiagnostic]) -> Vec<String> {
    diagnostics.iter().map(ToString::to_string).collect()
}

#[test]
fn test_bare_use_of_a_non_expressing_definition() {
    let collection = collection(&[("a.math", NATURALS), ("b.math", USES)]);
    let found = collection.check();
    assert_eq!(found.len(), 1, "{:?}", summary(&found));
    assert_eq!(found[0].path, "b.math");
    assert_eq!(found[0].diagnostic.kind, DiagnosticKind::Semantic);
    assert_eq!(found[0].diagnostic.location(), Location::new(4, 7));
    insta::assert_snapshot!(
        found[0].to_string(),
        @"b.math: Cannot use '\\N' in a non-`is` or non-`in` statement since its definition doesn't have an `expressing:` section (5, 8)"
    );
}

#[test]
fn test_defining_a_signature_anywhere_resolves_it() {
    let theorem = "Theorem:\nthen: 'x is \\foo'\n";
    let mut collection = collection(&[("content/1_theorem.math", theorem)]);
    let undefined = collection.get_undefined_signatures();
    assert_eq!(undefined.len(), 1);
    assert_eq!(undefined[0].diagnostic.message, "Undefined signature '\\foo'");

    collection.add_text("elsewhere/deep/foo.math", "[\\foo]\nDefines: f\nwritten: \"f\"\n");
    assert!(collection.get_undefined_signatures().is_empty());

    collection.remove_source("elsewhere/deep/foo.math");
    assert_eq!(collection.get_undefined_signatures().len(), 1);
}

#[test]
fn test_identical_ids_report_exactly_one_duplicate() {
    let first = "[\\set]\nDefines: X\nwritten: \"X\"\n";
    let second = "[\\set]\nDefines: Y\nmeans: 'Y is \\set'\n";
    let collection = collection(&[("1_a.math", first), ("2_b.math", second)]);
    let duplicates = collection.get_duplicate_signatures();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].path, "2_b.math");

    let distinct = collection_with_distinct_ids();
    assert!(distinct.get_duplicate_signatures().is_empty());
}

fn collection_with_distinct_ids() -> SourceCollection {
    collection(&[
        ("a.math", "[\\set]\nDefines: X\nwritten: \"X\"\n"),
        ("b.math", "[\\set.of]\nDefines: X\nwritten: \"X\"\n"),
    ])
}

#[test]
fn test_type_hierarchy_across_files() {
    let collection = collection(&[
        ("a.math", "[\\A]\nDefines: a\nmeans: 'a is \\B'\n"),
        ("b.math", "[\\B]\nDefines: b\nmeans: 'b is \\C'\n"),
        ("c.math", "[\\C]\nDefines: c\nwritten: \"c\"\n"),
    ]);
    let types = collection.types();
    assert!(types.is_sig_descendent_of("\\A", "\\C"));
    assert!(!types.is_sig_descendent_of("\\C", "\\A"));
    assert!(types.is_sig_is("\\A", "\\B"));
}

#[test]
fn test_parse_failures_are_reported_but_not_indexed() {
    let collection = collection(&[
        ("a.math", "Defines: X\nwritten: \"X\"\n"),
        ("b.math", "Theorem:\nthen: 'x is \\X'\n"),
    ]);
    let found = collection.check();
    let paths: Vec<&str> = found.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, vec!["a.math", "b.math"]);
    assert_eq!(found[0].diagnostic.kind, DiagnosticKind::Structural);
    assert_eq!(found[1].diagnostic.message, "Undefined signature '\\X'");
}

#[test]
fn test_search_and_autocomplete() {
    let collection = collection(&[
        ("10_limits.math", "[\\limit]\nDefines: L\nwritten: \"\\lim\"\ncalled: \"Limit of a sequence\"\n"),
        ("2_sequences.math", "[\\sequence]\nDefines: s\nwritten: \"s\"\ncalled: \"Sequence\"\n"),
    ]);
    let found: Vec<&str> = collection
        .search("SEQUENCE")
        .into_iter()
        .map(|file| file.path.as_str())
        .collect();
    assert_eq!(found, vec!["2_sequences.math", "10_limits.math"]);
    assert_eq!(
        collection
            .search("limit sequence")
            .into_iter()
            .map(|file| file.path.as_str())
            .collect::<Vec<_>>(),
        vec!["10_limits.math"]
    );
    assert_eq!(collection.find_word_suffixes("Seq"), vec!["uence"]);
    assert_eq!(collection.find_signature_suffixes("\\l"), vec!["imit"]);
    assert!(collection.find_signature_suffixes("\\L").is_empty());
}

#[test]
fn test_rendering_with_using_aliases() {
    let pair = "[\\pair{a, b}]\nDefines: p\nexpressing: 'p'\nwritten: \"(a?, b?)\"\n";
    let theorem = "Theorem:\nthen: 'x = \\f{y}'\nusing: '\\f{z} := \\pair{z, z}'\n";
    let collection = collection(&[("a.math", pair), ("b.math", theorem)]);
    let rendered = collection
        .render(
            "b.math",
            0,
            RenderOptions {
                html: false,
                mode: RenderMode::Literal,
            },
        )
        .expect("group renders");
    insta::assert_snapshot!(rendered, @r"
    Theorem:
    then:
    . 'x = (y, y)'
    using:
    . '\f{z} := (z, z)'
    ");
}
