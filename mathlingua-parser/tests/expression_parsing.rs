//! Expression parser behavior as seen through the public API

use mathlingua_parser::mathlingua::expression::{parse_expression, Expression, RelationKind};
use proptest::prelude::*;
use rstest::rstest;

fn parse_ok(text: &str) -> Expression {
    let (expression, diagnostics) = parse_expression(text);
    assert!(diagnostics.is_empty(), "{text:?}: {diagnostics:?}");
    expression
}

fn call_shape(expression: &Expression) -> (String, bool, usize) {
    match expression {
        Expression::FunctionCall(call) => (
            call.name.clone(),
            call.command,
            call.params.as_ref().map(Vec::len).unwrap_or(0),
        ),
        other => panic!("expected a function call, got {other:?}"),
    }
}

#[test]
fn test_command_calls_on_both_sides_of_equals() {
    let expression = parse_ok("\\f(x, y) = \\g(x)");
    let Expression::Relation(relation) = &expression else {
        panic!("expected a relation, got {expression:?}");
    };
    assert_eq!(relation.kind, RelationKind::Equals);
    assert_eq!(relation.lhs.len(), 1);
    assert_eq!(relation.rhs.len(), 1);
    assert_eq!(call_shape(&relation.lhs[0]), ("f".to_string(), true, 2));
    assert_eq!(call_shape(&relation.rhs[0]), ("g".to_string(), true, 1));
}

#[rstest]
#[case("x is \\set", RelationKind::Is)]
#[case("x in X", RelationKind::In)]
#[case("x not in X", RelationKind::NotIn)]
#[case("a = b", RelationKind::Equals)]
#[case("a != b", RelationKind::NotEquals)]
#[case("x as \\real", RelationKind::As)]
fn test_relation_kinds(#[case] text: &str, #[case] kind: RelationKind) {
    match parse_ok(text) {
        Expression::Relation(relation) => assert_eq!(relation.kind, kind),
        other => panic!("expected a relation, got {other:?}"),
    }
}

#[test]
fn test_signatures_within_a_statement() {
    let expression = parse_ok("\\f{x} + \\g{y} = \\h");
    let mut signatures = expression.signatures_within();
    signatures.sort();
    assert_eq!(signatures, vec!["+", "\\f", "\\g", "\\h"]);
}

#[test]
fn test_printing_canonical_forms() {
    insta::assert_snapshot!(parse_ok("\\a.b[x]_{i}^{n}{y}:on{A}(z)").to_code(), @r"\a.b[x]_{i}^{n}{y}:on{A}(z)");
    insta::assert_snapshot!(parse_ok("x,y  in   X").to_code(), @"x, y in X");
}

#[test]
fn test_diagnostics_are_relative_to_the_statement() {
    let (_, diagnostics) = parse_expression("x is");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].row, 0);
}

proptest! {
    #[test]
    fn test_parsed_names_print_back(name in "[a-z][a-z0-9]{0,8}") {
        prop_assume!(!["is", "in", "as"].contains(&name.as_str()));
        let (expression, diagnostics) = parse_expression(&name);
        prop_assert!(diagnostics.is_empty());
        prop_assert_eq!(expression.to_code(), name);
    }
}
