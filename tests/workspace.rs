//! Configuration, parsing and analysis working together

use mathlingua::config::Loader;
use mathlingua::parser::mathlingua::expression::{parse_expression, Expression, RelationKind};
use mathlingua::{
    parse, CollectionOptions, MathlinguaConfig, RenderMode, RenderOptions, SourceCollection,
};
use rstest::rstest;

const CHAIN: &str = "[\\A]\nDefines: a\nmeans: 'a is \\B'\n\n[\\B]\nDefines: b\nmeans: 'b is \\C'\n\n[\\C]\nDefines: c\nwritten: \"\\mathcal{C}\"\n";
const THEOREM: &str = "Theorem:\nthen: 'x is \\A'\n";

fn options(config: &MathlinguaConfig) -> CollectionOptions {
    CollectionOptions {
        skip_operator_signatures: config.check.skip_operator_signatures,
        max_expansion_iterations: config.expansion.max_iterations,
        html_class_prefix: config.render.html_class_prefix.clone(),
    }
}

fn collection(config: &MathlinguaConfig, files: &[(&str, &str)]) -> SourceCollection {
    SourceCollection::from_sources(files.to_vec(), options(config))
}

fn config(assignments: &[&str]) -> MathlinguaConfig {
    assignments
        .iter()
        .try_fold(Loader::new(), |loader, assignment| loader.set_assignment(assignment))
        .and_then(Loader::build)
        .expect("config to build")
}

#[rstest]
#[case(&[], "x is \\mathcal{C}")]
#[case(&["expansion.max_iterations=1"], "x is \\B")]
fn test_iteration_limit_comes_from_config(#[case] assignments: &[&str], #[case] expected: &str) {
    let config = config(assignments);
    let collection = collection(&config, &[("chain.math", CHAIN), ("theorem.math", THEOREM)]);
    let rendered = collection
        .render("theorem.math", 0, RenderOptions::default())
        .expect("group renders");
    assert!(rendered.contains(expected), "{rendered}");
}

#[test]
fn test_operator_signatures_are_checked_when_configured() {
    let theorem = "Theorem:\nthen: 'z = x + y'\n";
    let skipped = collection(&config(&[]), &[("a.math", theorem)]);
    assert!(skipped.get_undefined_signatures().is_empty());

    let strict = collection(
        &config(&["check.skip_operator_signatures=false"]),
        &[("a.math", theorem)],
    );
    let messages: Vec<String> = strict
        .get_undefined_signatures()
        .into_iter()
        .map(|found| found.diagnostic.message)
        .collect();
    assert_eq!(messages, vec!["Undefined signature '+'"]);
}

#[test]
fn test_html_class_prefix_comes_from_config() {
    let config = config(&["render.html_class_prefix=ml"]);
    let collection = collection(&config, &[("chain.math", CHAIN), ("theorem.math", THEOREM)]);
    let html = collection
        .render(
            "theorem.math",
            0,
            RenderOptions {
                html: true,
                mode: RenderMode::Raw,
            },
        )
        .expect("group renders");
    assert!(html.contains("ml-header"), "{html}");
    assert!(!html.contains("mathlingua-header"));
}

#[test]
fn test_statements_are_parsed_during_validation() {
    let document = parse("Theorem:\nthen: '\\f(x, y) = \\g(x)'\n")
        .into_result()
        .expect("document parses");
    let statements = document.groups[0].statements();
    let Some(Expression::Relation(relation)) = statements[0].value() else {
        panic!("expected a relation");
    };
    assert_eq!(relation.kind, RelationKind::Equals);

    let (standalone, diagnostics) = parse_expression("\\f(x, y) = \\g(x)");
    assert!(diagnostics.is_empty());
    assert_eq!(standalone.to_code(), statements[0].value().map(Expression::to_code).unwrap_or_default());
}

#[test]
fn test_printed_documents_reparse_to_the_same_shape() {
    let document = parse(CHAIN).into_result().expect("document parses");
    let printed = document.to_code();
    let reparsed = parse(&printed).into_result().expect("printed form parses");
    assert_eq!(reparsed.to_code(), printed);
    assert_eq!(reparsed.groups.len(), 3);
}
