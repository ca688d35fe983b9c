//! Corpus-wide validation queries
//!
//! Every query is read-only and reports each finding together with the path of the file
//! it was found in. Nothing short-circuits: a query returns everything it finds.

use super::{SignatureKind, SourceCollection};
use crate::analyzer::{ShapeAnalyzer, SymbolAnalyzer};
use crate::expansion::alias_signatures;
use crate::paths::natural_cmp;
use crate::usage::{bare_uses, sole_command, used_signatures};
use mathlingua_parser::mathlingua::expression::{Expression, RelationKind};
use mathlingua_parser::mathlingua::parsing::groups::ResultKind;
use mathlingua_parser::mathlingua::parsing::{Definition, Signature, Statement, TopLevelGroup};
use mathlingua_parser::{Diagnostic, Location};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// A diagnostic and the file it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathDiagnostic {
    pub path: String,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

impl PathDiagnostic {
    pub fn new(path: impl Into<String>, diagnostic: Diagnostic) -> Self {
        Self {
            path: path.into(),
            diagnostic,
        }
    }
}

impl fmt::Display for PathDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.diagnostic)
    }
}

fn semantic(path: &str, message: impl Into<String>, location: Location) -> PathDiagnostic {
    PathDiagnostic::new(path, Diagnostic::semantic(message, location))
}

fn sort(diagnostics: &mut [PathDiagnostic]) {
    diagnostics.sort_by(|a, b| {
        natural_cmp(&a.path, &b.path)
            .then_with(|| a.diagnostic.row.cmp(&b.diagnostic.row))
            .then_with(|| a.diagnostic.column.cmp(&b.diagnostic.column))
    });
}

/// Statements of a group that are not the `as:` of a `view`
fn checked_statements(group: &TopLevelGroup) -> Vec<&Statement> {
    let views: Vec<&Statement> = group
        .definitions()
        .into_iter()
        .filter_map(|definition| match definition {
            Definition::Defines(defines) => defines.providing.as_ref(),
            Definition::States(_) => None,
        })
        .flat_map(|providing| providing.views().map(|view| &view.as_))
        .collect();
    group
        .statements()
        .into_iter()
        .filter(|statement| !views.iter().any(|view| std::ptr::eq(*view, *statement)))
        .collect()
}

fn parsed(statement: &Statement) -> Option<(&Expression, Location)> {
    statement
        .value()
        .map(|expression| (expression, statement.text_origin()))
}

impl SourceCollection {
    /// Every problem in the corpus, ordered by path and then position
    pub fn check(&self) -> Vec<PathDiagnostic> {
        self.check_with(&ShapeAnalyzer)
    }

    pub fn check_with(&self, analyzer: &dyn SymbolAnalyzer) -> Vec<PathDiagnostic> {
        let mut diagnostics = self.get_parse_errors();
        diagnostics.extend(self.get_id_errors());
        diagnostics.extend(self.get_duplicate_signatures());
        diagnostics.extend(self.get_undefined_signatures());
        diagnostics.extend(self.get_invalid_types(analyzer));
        diagnostics.extend(self.get_illegal_references());
        diagnostics.extend(self.get_scoping_errors());
        diagnostics.extend(self.get_non_expressing_uses());
        diagnostics.extend(self.get_duplicate_content());
        sort(&mut diagnostics);
        tracing::debug!(
            files = self.files.len(),
            diagnostics = diagnostics.len(),
            "checked collection"
        );
        diagnostics
    }

    /// Lexical and structural diagnostics of files that failed to parse
    pub fn get_parse_errors(&self) -> Vec<PathDiagnostic> {
        let mut diagnostics: Vec<PathDiagnostic> = self
            .files
            .values()
            .flat_map(|file| {
                file.errors()
                    .iter()
                    .map(|diagnostic| PathDiagnostic::new(&file.path, diagnostic.clone()))
            })
            .collect();
        sort(&mut diagnostics);
        diagnostics
    }

    /// Expression diagnostics of `[...]` ids, in file coordinates
    pub fn get_id_errors(&self) -> Vec<PathDiagnostic> {
        let mut diagnostics = Vec::new();
        for (_, located) in self.valid_groups() {
            for id in located.group.ids() {
                let origin = id.statement.text_origin();
                for diagnostic in id.statement.expression.errors() {
                    diagnostics.push(PathDiagnostic::new(
                        located.path,
                        diagnostic.clone().offset_by(origin),
                    ));
                }
            }
        }
        diagnostics
    }

    /// Every defining group after the first, per signature. Groups are ordered by natural
    /// path, then position in the file, and a group is reported once however many of its
    /// signatures collide.
    pub fn get_duplicate_signatures(&self) -> Vec<PathDiagnostic> {
        let mut reported: BTreeSet<(String, usize)> = BTreeSet::new();
        let mut diagnostics = Vec::new();
        for (signature, refs) in &self.signatures {
            if refs.len() < 2 {
                continue;
            }
            let mut refs = refs.clone();
            refs.sort_by(|a, b| natural_cmp(&a.path, &b.path).then(a.index.cmp(&b.index)));
            for later in refs.iter().skip(1) {
                if reported.insert((later.path.clone(), later.index)) {
                    diagnostics.push(semantic(
                        &later.path,
                        format!("Duplicate defined signature '{signature}'"),
                        later.location,
                    ));
                }
            }
        }
        sort(&mut diagnostics);
        diagnostics
    }

    /// References to signatures that nothing in the corpus or the group's own `using:`
    /// section defines
    pub fn get_undefined_signatures(&self) -> Vec<PathDiagnostic> {
        let mut diagnostics = Vec::new();
        for (_, located) in self.valid_groups() {
            let inner: BTreeSet<String> = located
                .group
                .using()
                .into_iter()
                .flat_map(alias_signatures)
                .collect();
            for statement in located.group.statements() {
                let Some((expression, origin)) = parsed(statement) else {
                    continue;
                };
                for used in used_signatures(expression) {
                    if self.options.skip_operator_signatures
                        && Signature::is_operator_style(&used.signature)
                    {
                        continue;
                    }
                    if self.is_defined(&used.signature) || inner.contains(&used.signature) {
                        continue;
                    }
                    diagnostics.push(semantic(
                        located.path,
                        format!("Undefined signature '{}'", used.signature),
                        used.location.offset_by(origin),
                    ));
                }
            }
        }
        diagnostics
    }

    /// Statement parse errors, analyzer findings and failed as-written expansions
    pub fn get_invalid_types(&self, analyzer: &dyn SymbolAnalyzer) -> Vec<PathDiagnostic> {
        let mut diagnostics = Vec::new();
        for (_, located) in self.valid_groups() {
            for diagnostic in analyzer.analyze(located.group, self) {
                diagnostics.push(PathDiagnostic::new(located.path, diagnostic));
            }
            let engine = self.engine.with_aliases(located.group.using());
            for statement in located.group.statements() {
                let origin = statement.text_origin();
                for diagnostic in statement.expression.errors() {
                    diagnostics.push(PathDiagnostic::new(
                        located.path,
                        diagnostic.clone().offset_by(origin),
                    ));
                }
                if let Some(expression) = statement.value() {
                    if let Err(error) = engine.expand_as_written(expression) {
                        diagnostics.push(semantic(located.path, error.to_string(), origin));
                    }
                }
            }
        }
        diagnostics
    }

    /// What may appear on the right of `is`, `in` and `:=`
    pub fn get_illegal_references(&self) -> Vec<PathDiagnostic> {
        let mut diagnostics = Vec::new();
        for (_, located) in self.valid_groups() {
            for statement in located.group.statements() {
                let Some((expression, origin)) = parsed(statement) else {
                    continue;
                };
                expression.walk(&mut |node| {
                    for (item, message) in self.illegal_references_in(node) {
                        diagnostics.push(semantic(
                            located.path,
                            message,
                            item.location().offset_by(origin),
                        ));
                    }
                });
            }
        }
        diagnostics
    }

    fn illegal_references_in<'e>(&self, node: &'e Expression) -> Vec<(&'e Expression, String)> {
        let mut found = Vec::new();
        match node {
            Expression::Relation(relation) if relation.kind == RelationKind::Is => {
                for item in &relation.rhs {
                    let Some(signature) = item.signature() else {
                        continue;
                    };
                    let referenced = match self.signature_kind(&signature) {
                        Some(SignatureKind::States) => "a `States:`",
                        Some(SignatureKind::Result(ResultKind::Theorem)) => "a `Theorem:`",
                        Some(SignatureKind::Result(ResultKind::Axiom)) => "a `Axiom:`",
                        Some(SignatureKind::Result(ResultKind::Conjecture)) => "a `Conjecture:`",
                        Some(SignatureKind::Defines { expressing: true }) => {
                            "a `Defines:` with an `expressing:` section"
                        }
                        _ => continue,
                    };
                    found.push((
                        item,
                        format!(
                            "The right-hand-side of an `is` cannot reference {referenced} but found '{signature}'"
                        ),
                    ));
                }
            }
            Expression::Relation(relation)
                if matches!(relation.kind, RelationKind::In | RelationKind::NotIn) =>
            {
                for item in &relation.rhs {
                    if let Some(signature) = self.non_expressing_signature(item) {
                        found.push((
                            item,
                            format!(
                                "The right-hand-side of an `in` cannot reference a signature without an `expressing:` section but found '{signature}'"
                            ),
                        ));
                    }
                }
            }
            Expression::Assignment(assignment) => {
                if let Some(signature) = self.non_expressing_signature(&assignment.rhs) {
                    found.push((
                        assignment.rhs.as_ref(),
                        format!(
                            "The right-hand-side of an `:=` cannot reference a signature without an `expressing:` section but found '{signature}'"
                        ),
                    ));
                }
            }
            _ => {}
        }
        found
    }

    fn non_expressing_signature(&self, expression: &Expression) -> Option<String> {
        let signature = expression.signature()?;
        matches!(
            self.signature_kind(&signature),
            Some(SignatureKind::Defines { expressing: false })
        )
        .then_some(signature)
    }

    /// Uses of a signature without `expressing:` in statements other than `is`/`in`.
    /// `States:` signatures are exempt, and an Axiom signature may stand alone as a whole
    /// statement.
    pub fn get_non_expressing_uses(&self) -> Vec<PathDiagnostic> {
        let mut diagnostics = Vec::new();
        for (_, located) in self.valid_groups() {
            for statement in checked_statements(located.group) {
                let Some((expression, origin)) = parsed(statement) else {
                    continue;
                };
                let sole = sole_command(expression);
                for used in bare_uses(expression) {
                    match self.signature_kind(&used.signature) {
                        None
                        | Some(SignatureKind::States)
                        | Some(SignatureKind::Constructor)
                        | Some(SignatureKind::Defines { expressing: true }) => continue,
                        Some(SignatureKind::Result(ResultKind::Axiom))
                            if sole.as_deref() == Some(used.signature.as_str()) =>
                        {
                            continue
                        }
                        _ => {}
                    }
                    diagnostics.push(semantic(
                        located.path,
                        format!(
                            "Cannot use '{}' in a non-`is` or non-`in` statement since its definition doesn't have an `expressing:` section",
                            used.signature
                        ),
                        used.location.offset_by(origin),
                    ));
                }
            }
        }
        diagnostics
    }

    /// Later top-level groups equal to an earlier one once locations are stripped
    pub fn get_duplicate_content(&self) -> Vec<PathDiagnostic> {
        let mut ordered: Vec<_> = self.groups.iter().collect();
        ordered.sort_by(|a, b| natural_cmp(&a.path, &b.path).then(a.index.cmp(&b.index)));
        let mut diagnostics = Vec::new();
        for (position, group) in ordered.iter().enumerate() {
            let seen_before = ordered[..position]
                .iter()
                .any(|earlier| earlier.normalized == group.normalized);
            if !seen_before {
                continue;
            }
            if let Ok(original) = self.group(&group.path, group.index) {
                diagnostics.push(semantic(
                    &group.path,
                    "Duplicate content found",
                    original.location(),
                ));
            }
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn collection(files: &[(&str, &str)]) -> SourceCollection {
        let mut collection = SourceCollection::new();
        for (path, content) in files {
            collection.add_text(*path, *content);
        }
        collection
    }

    fn messages(diagnostics: Vec<PathDiagnostic>) -> Vec<String> {
        diagnostics
            .into_iter()
            .map(|d| d.diagnostic.message)
            .collect()
    }

    const SET: &str = "[\\set]\nDefines: X\nwritten: \"X\"\n";

    #[test]
    fn test_duplicates_report_the_later_group_once() {
        let other = "[\\set]\nDefines: Y\nwritten: \"Y\"\n";
        let collection = collection(&[("b.math", other), ("a.math", SET)]);
        let duplicates = collection.get_duplicate_signatures();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].path, "b.math");
        assert_eq!(
            duplicates[0].diagnostic.message,
            "Duplicate defined signature '\\set'"
        );
        assert_eq!(duplicates[0].diagnostic.location(), Location::new(0, 0));
    }

    #[test]
    fn test_theorem_duplicates_are_reported_once_per_group() {
        let theorem = "[\\lemma]\nTheorem:\nthen: 'x'\n";
        let collection = collection(&[("a.math", theorem), ("b.math", theorem)]);
        assert_eq!(collection.get_duplicate_signatures().len(), 1);
    }

    #[test]
    fn test_undefined_and_operator_carve_out() {
        let source = "Theorem:\nthen:\n. 'x is \\set'\n. 'x + y = \\foo'\n";
        let collection = collection(&[("a.math", SET), ("b.math", source)]);
        let undefined = collection.get_undefined_signatures();
        assert_eq!(messages(undefined.clone()), vec!["Undefined signature '\\foo'"]);
        assert_eq!(undefined[0].diagnostic.location(), Location::new(3, 11));
    }

    #[test]
    fn test_using_aliases_are_locally_defined() {
        let source = "Theorem:\nthen: 'x is \\g'\nusing: '\\g := \\set'\n";
        let collection = collection(&[("a.math", SET), ("b.math", source)]);
        assert!(collection.get_undefined_signatures().is_empty());
    }

    #[rstest]
    #[case(
        "[\\p]\nStates:\nthat: 'x'\n",
        "The right-hand-side of an `is` cannot reference a `States:` but found '\\p'"
    )]
    #[case(
        "[\\p]\nAxiom:\nthen: 'x'\n",
        "The right-hand-side of an `is` cannot reference a `Axiom:` but found '\\p'"
    )]
    #[case(
        "[\\p]\nDefines: y\nexpressing: 'y'\n",
        "The right-hand-side of an `is` cannot reference a `Defines:` with an `expressing:` section but found '\\p'"
    )]
    fn test_is_right_hand_side(#[case] definition: &str, #[case] message: &str) {
        let collection = collection(&[("a.math", definition), ("b.math", "Theorem:\nthen: 'x is \\p'\n")]);
        assert_eq!(messages(collection.get_illegal_references()), vec![message]);
    }

    #[test]
    fn test_in_and_assignment_need_expressing() {
        let source = "Theorem:\nthen:\n. 'x in \\set'\n. 'y := \\set'\n";
        let collection = collection(&[("a.math", SET), ("b.math", source)]);
        assert_eq!(
            messages(collection.get_illegal_references()),
            vec![
                "The right-hand-side of an `in` cannot reference a signature without an `expressing:` section but found '\\set'",
                "The right-hand-side of an `:=` cannot reference a signature without an `expressing:` section but found '\\set'",
            ]
        );
    }

    #[test]
    fn test_non_expressing_uses() {
        let source = "Theorem:\nthen:\n. 'x is \\set'\n. 'x = \\set'\n";
        let collection = collection(&[("a.math", SET), ("b.math", source)]);
        let found = collection.get_non_expressing_uses();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].diagnostic.location(), Location::new(3, 7));
    }

    #[test]
    fn test_axiom_signature_may_stand_alone() {
        let axiom = "[\\choice]\nAxiom:\nthen: 'x'\n";
        let uses = "Theorem:\nthen:\n. '\\choice'\n. 'y = \\choice'\n";
        let collection = collection(&[("a.math", axiom), ("b.math", uses)]);
        let found = collection.get_non_expressing_uses();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].diagnostic.location(), Location::new(3, 7));
    }

    #[test]
    fn test_a_statement_inside_an_axiom_is_not_exempt() {
        let collection = collection_with("Axiom:\nthen: '\\set'\n");
        assert_eq!(collection.get_non_expressing_uses().len(), 1);
        let collection = collection_with("Theorem:\nthen: '\\set'\n");
        assert_eq!(collection.get_non_expressing_uses().len(), 1);
    }

    #[test]
    fn test_result_signatures_lack_expressing() {
        let results = "[\\ax]\nAxiom:\nthen: 'a'\n\n[\\thm]\nTheorem:\nthen: 'b'\n";
        let uses = "Theorem:\nthen:\n. 'x = \\ax'\n. 'y = \\thm'\n";
        let collection = collection(&[("a.math", results), ("b.math", uses)]);
        let found = collection.get_non_expressing_uses();
        assert_eq!(
            messages(found),
            vec![
                "Cannot use '\\ax' in a non-`is` or non-`in` statement since its definition doesn't have an `expressing:` section",
                "Cannot use '\\thm' in a non-`is` or non-`in` statement since its definition doesn't have an `expressing:` section",
            ]
        );
    }

    #[rstest]
    #[case("Theorem:\nthen:\n. 'x in \\set{\\set}'\n. 'x is \\set{\\set}'\n")]
    #[case("Theorem:\nthen: 'x not in \\set'\n")]
    #[case("[\\p]\nStates:\nthat: 'x'\n\nTheorem:\nthen: 'x = \\p'\n")]
    fn test_exempt_statements(#[case] source: &str) {
        assert!(collection_with(source).get_non_expressing_uses().is_empty());
    }

    fn collection_with(source: &str) -> SourceCollection {
        collection(&[("a.math", SET), ("b.math", source)])
    }

    #[test]
    fn test_view_as_statements_are_skipped() {
        let source = "[\\pair]\nDefines: p\nmeans: 'p is \\set'\nproviding:\n. view:\n  as: '\\set'\n";
        let collection = collection_with(source);
        assert!(collection.get_non_expressing_uses().is_empty());
    }

    #[test]
    fn test_duplicate_content() {
        let theorem = "Theorem:\nthen: 'x is \\set'\n";
        let collection = collection(&[("a.math", SET), ("b.math", theorem), ("c.math", theorem)]);
        let found = collection.get_duplicate_content();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, "c.math");
        assert_eq!(found[0].diagnostic.message, "Duplicate content found");
    }

    #[test]
    fn test_expansion_failures_are_invalid_types() {
        let pair = "[\\pair{a, b}]\nDefines: p\nexpressing: 'p'\nwritten: \"(a?, b?)\"\n";
        let theorem = "Theorem:\nthen: 'x = \\pair{y}'\n";
        let collection = collection(&[("a.math", pair), ("b.math", theorem)]);
        let found = collection.get_invalid_types(&ShapeAnalyzer);
        assert_eq!(
            messages(found),
            vec![
                "Expected 2 argument(s) in the {} group of '\\pair' but found 1",
                "Expected 2 argument(s) for '\\pair' but found 1",
            ]
        );
    }

    #[test]
    fn test_check_orders_by_path_then_position() {
        let broken = "Defines: x\n";
        let theorem = "Theorem:\nthen:\n. '\\zzz'\n. '\\aaa'\n";
        let collection = collection(&[("10_b.math", broken), ("2_a.math", theorem)]);
        let found = collection.check();
        let order: Vec<(String, i32)> = found
            .iter()
            .map(|d| (d.path.clone(), d.diagnostic.row))
            .collect();
        assert_eq!(order[0], ("2_a.math".to_string(), 2));
        assert_eq!(order[1], ("2_a.math".to_string(), 3));
        assert!(order[2..].iter().all(|(path, _)| path == "10_b.math"));
    }
}
