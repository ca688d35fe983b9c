//! Printing a parsed document and parsing the output again must give back the same
//! document, modulo locations.

use mathlingua_parser::mathlingua::parsing::{parse, Document, Locatable};
use rstest::rstest;

const KITCHEN_SINK: &str = r#"[\function:on{A}:to{B}]
Defines: f
given: A, B
when: 'A is \set'
means:
. 'f is \relation{A, B}'
. for: a
  suchThat:
  . 'a in A'
  then:
  . existsUnique: b
    suchThat: 'b in B'
providing:
. view:
  as: '\relation{A, B}'
  via: 'f'
. member: x
  means: 'x in A'
written: "f? : A? \rightarrow B?"
called: "function"
Metadata:
. reference:
  . source: "@book"
    page: "12"
. tags: "sets", "functions"

[\continuous{f}]
States:
given: f
that:
. or:
  . 'f is \function'
  . not:
    . 'f is \relation'
written: "f? is continuous"

[\natural]
Defines: n
means:
. generated:
  from: zero, succ(m)
  when: 'm is \natural'
expressing:
. piecewise:
  when: 'n = 0'
  then: 'n'
  else: 'n'

Theorem: "Fundamental"
given: x
where: 'x is \set'
if: 'x = x'
then:
. 'x = x'
. matching:
  . 'x'
Proof: "by reflexivity"

Conjecture:
iff: 'a'
then: 'b'

[sets]
Topic: "Sets"
content: "Collections of things"

[@book]
Resource:
. title: "A Book"
. author: "Someone"

Foundation:
. [\set]
  Defines: X
  written: "X"

Mutually:
. [\even{n}]
  States:
  that: 'n is \even'
. [\odd{n}]
  States:
  that: 'n is \odd'
"#;

fn parse_ok(source: &str) -> Document {
    match parse(source).into_result() {
        Ok(document) => document,
        Err(errors) => panic!("expected {source:?} to parse, got {errors:?}"),
    }
}

#[test]
fn test_kitchen_sink_round_trips() {
    let document = parse_ok(KITCHEN_SINK);
    assert_eq!(document.groups.len(), 9);

    let printed = document.to_code();
    let reparsed = parse_ok(&printed);
    assert_eq!(reparsed.normalized(), document.normalized());
}

#[test]
fn test_printing_is_idempotent() {
    let once = parse_ok(KITCHEN_SINK).to_code();
    let twice = parse_ok(&once).to_code();
    assert_eq!(once, twice);
}

#[rstest]
#[case::inline_clause("Axiom:\nthen: 'a'\n")]
#[case::comments("-- a comment\nAxiom:\nthen: 'a' -- trailing\n")]
#[case::block_comment("::\nnotes\n::\nAxiom:\nthen: 'a'\n")]
#[case::extra_blank_lines("\n\n\nAxiom:\nthen: 'a'\n\n\n")]
#[case::no_trailing_newline("Axiom:\nthen: 'a'")]
fn test_layout_variants_round_trip(#[case] source: &str) {
    let document = parse_ok(source);
    let reparsed = parse_ok(&document.to_code());
    assert_eq!(reparsed.normalized(), document.clone().normalized());
    assert_eq!(document.to_code(), "Axiom:\nthen:\n. 'a'\n");
}

#[test]
fn test_signatures_of_kitchen_sink() {
    let document = parse_ok(KITCHEN_SINK);
    let forms: Vec<String> = document
        .groups
        .iter()
        .flat_map(|group| group.signatures())
        .map(|signature| signature.form)
        .collect();
    assert_eq!(
        forms,
        vec![
            "\\function:on:to",
            "\\continuous",
            "\\natural",
            "\\natural.zero",
            "\\natural.succ",
            "\\set",
            "\\even",
            "\\odd",
        ]
    );
}

#[test]
fn test_errors_are_reported_in_source_order() {
    let source = "Defines: x\nmeans: 'x'\n\n[\\b]\nStates:\nthat: 'y'\nbogus: 'z'\n";
    let errors = parse(source).into_result().expect_err("source is invalid");
    let rows: Vec<i32> = errors.iter().map(|e| e.row).collect();
    let mut sorted = rows.clone();
    sorted.sort();
    assert_eq!(rows, sorted);
    let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
    assert!(messages.contains(&"Expected an id"));
    assert!(messages.contains(&"Unexpected section bogus"));
}
