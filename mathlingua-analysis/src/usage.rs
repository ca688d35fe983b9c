//! How statements reference signatures and names
//!
//! Locations returned here are relative to the statement text; callers shift them with
//! `Statement::text_origin` before reporting.

use mathlingua_parser::mathlingua::expression::{Expression, RelationKind};
use mathlingua_parser::Location;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureUse {
    pub signature: String,
    pub location: Location,
}

impl SignatureUse {
    fn of(expression: &Expression) -> Option<Self> {
        if matches!(expression, Expression::Grouped(_)) {
            return None;
        }
        expression.signature().map(|signature| SignatureUse {
            signature,
            location: expression.location(),
        })
    }
}

/// Signatures referenced by `expression`. The left side of `=` and `:=` defines rather
/// than uses, so it is skipped.
pub fn used_signatures(expression: &Expression) -> Vec<SignatureUse> {
    let mut uses = Vec::new();
    collect_uses(expression, &mut uses);
    uses
}

fn collect_uses(expression: &Expression, uses: &mut Vec<SignatureUse>) {
    match expression {
        Expression::Relation(relation) if relation.kind == RelationKind::Equals => {
            for item in &relation.rhs {
                collect_uses(item, uses);
            }
        }
        Expression::Assignment(assignment) => collect_uses(&assignment.rhs, uses),
        other => {
            uses.extend(SignatureUse::of(other));
            for child in other.children() {
                collect_uses(child, uses);
            }
        }
    }
}

/// Signature uses in a statement that is not an `is`/`in`/`not in` relation. A `:=`
/// statement is left to the assignment rule.
pub fn bare_uses(expression: &Expression) -> Vec<SignatureUse> {
    let mut uses = Vec::new();
    match expression {
        Expression::Relation(relation)
            if matches!(
                relation.kind,
                RelationKind::Is | RelationKind::In | RelationKind::NotIn
            ) => {}
        Expression::Assignment(_) => {}
        other => collect_all(other, &mut uses),
    }
    uses
}

fn collect_all(expression: &Expression, uses: &mut Vec<SignatureUse>) {
    uses.extend(SignatureUse::of(expression));
    for child in expression.children() {
        collect_all(child, uses);
    }
}

/// The signature of the statement when it is a single command such as `\continuous{f}`
pub fn sole_command(expression: &Expression) -> Option<String> {
    match expression {
        Expression::Command(command) => Some(command.signature()),
        Expression::FunctionCall(call) if call.command => expression.signature(),
        _ => None,
    }
}

/// Names a statement describes: the left side of an `is` or a `:=`
pub fn described_names(expression: &Expression) -> Vec<(String, Location)> {
    match expression {
        Expression::Relation(relation) if relation.kind == RelationKind::Is => {
            relation.lhs.iter().flat_map(pattern_names).collect()
        }
        Expression::Assignment(assignment) => pattern_names(&assignment.lhs),
        _ => Vec::new(),
    }
}

fn pattern_names(expression: &Expression) -> Vec<(String, Location)> {
    match expression {
        Expression::Name(name) | Expression::VariadicName(name) => {
            vec![(name.name.clone(), name.location)]
        }
        Expression::Function(function) => vec![(function.name.clone(), function.location)],
        Expression::FunctionCall(call) if !call.command => vec![(call.name.clone(), call.location)],
        Expression::Tuple(tuple) => tuple.items.iter().flat_map(pattern_names).collect(),
        Expression::Grouped(grouped) => pattern_names(&grouped.inner),
        _ => Vec::new(),
    }
}

/// Every plain name mentioned anywhere in `expression`, excluding command names
pub fn mentioned_names(expression: &Expression) -> Vec<String> {
    let mut names = Vec::new();
    expression.walk(&mut |node| match node {
        Expression::Name(name) | Expression::VariadicName(name) => names.push(name.name.clone()),
        Expression::Function(function) => names.push(function.name.clone()),
        Expression::FunctionCall(call) if !call.command => names.push(call.name.clone()),
        _ => {}
    });
    names
}
