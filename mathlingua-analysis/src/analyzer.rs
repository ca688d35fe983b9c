//! Per-group symbol analysis
//!
//! The collection's "invalid types" check hands every group to a [`SymbolAnalyzer`]. The
//! default [`ShapeAnalyzer`] compares each command use against the id of its definition
//! and reports bracket groups whose argument counts disagree.

use crate::collection::SourceCollection;
use mathlingua_parser::mathlingua::expression::{CommandExpression, Expression};
use mathlingua_parser::mathlingua::parsing::TopLevelGroup;
use mathlingua_parser::Diagnostic;

pub trait SymbolAnalyzer: Send + Sync {
    fn analyze(&self, group: &TopLevelGroup, collection: &SourceCollection) -> Vec<Diagnostic>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeAnalyzer;

/// Argument groups of a command keyed by their shape label
fn groups_of(command: &CommandExpression) -> Vec<(String, &[Expression])> {
    let mut groups: Vec<(String, &[Expression])> = Vec::new();
    for (label, group) in [
        ("[]", &command.square),
        ("_{}", &command.sub),
        ("^{}", &command.sup),
        ("{}", &command.curly),
    ] {
        if let Some(items) = group {
            groups.push((label.to_string(), items.as_slice()));
        }
    }
    for named in &command.named {
        groups.push((format!(":{}{{}}", named.name), named.params.as_slice()));
    }
    if let Some(paren) = &command.paren {
        groups.push(("()".to_string(), paren.as_slice()));
    }
    groups
}

fn accepts(declared: &[Expression], found: usize) -> bool {
    match declared.last() {
        Some(Expression::VariadicName(_)) => found + 1 >= declared.len(),
        _ => found == declared.len(),
    }
}

fn check_command(used: &CommandExpression, declared: &CommandExpression) -> Vec<String> {
    let declared_groups = groups_of(declared);
    groups_of(used)
        .into_iter()
        .filter_map(|(label, items)| {
            let (_, params) = declared_groups.iter().find(|(name, _)| *name == label)?;
            (!accepts(params, items.len())).then(|| {
                format!(
                    "Expected {} argument(s) in the {} group of '{}' but found {}",
                    params.len(),
                    label,
                    used.signature(),
                    items.len()
                )
            })
        })
        .collect()
}

impl SymbolAnalyzer for ShapeAnalyzer {
    fn analyze(&self, group: &TopLevelGroup, collection: &SourceCollection) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for statement in group.statements() {
            let Some(expression) = statement.value() else {
                continue;
            };
            let origin = statement.text_origin();
            expression.walk(&mut |node| {
                let Expression::Command(used) = node else {
                    return;
                };
                let Some(Expression::Command(declared)) = collection.definition_id(&used.signature())
                else {
                    return;
                };
                for message in check_command(used, declared) {
                    diagnostics.push(Diagnostic::semantic(message, used.location).offset_by(origin));
                }
            });
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathlingua_parser::mathlingua::expression::parse_expression;
    use rstest::rstest;

    fn command(text: &str) -> CommandExpression {
        match parse_expression(text).0 {
            Expression::Command(command) => command,
            other => panic!("expected a command, found {other:?}"),
        }
    }

    #[rstest]
    #[case("\\set{X}", "\\set{A}", 0)]
    #[case("\\set{X}", "\\set{A, B}", 1)]
    #[case("\\set", "\\set{A}", 0)]
    #[case("\\tuple{x...}", "\\tuple{a, b, c}", 0)]
    #[case("\\function:on{A}:to{B}", "\\function:on{X, Y}:to{Z}", 1)]
    #[case("\\f[a]{x}", "\\f[b, c]{y, z}", 2)]
    fn test_shape_mismatches(#[case] declared: &str, #[case] used: &str, #[case] count: usize) {
        assert_eq!(check_command(&command(used), &command(declared)).len(), count);
    }

    #[test]
    fn test_message() {
        let messages = check_command(&command("\\set{A, B}"), &command("\\set{X}"));
        assert_eq!(
            messages,
            vec!["Expected 1 argument(s) in the {} group of '\\set' but found 2"]
        );
    }
}
