//! Definitional inlining
//!
//! `x is \B{y}` is replaced by the single statement of `\B`'s body, with the defined target
//! renamed to `x` and the id parameters renamed to the call arguments.

use super::patterns::{arguments_of, params_of};
use mathlingua_parser::mathlingua::expression::{Expression, Grouped, RelationKind};
use mathlingua_parser::mathlingua::parsing::clauses::Clause;
use mathlingua_parser::mathlingua::parsing::Definition;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct InlineBody {
    pub target: Option<String>,
    pub params: Vec<String>,
    pub body: Expression,
}

impl InlineBody {
    /// Only bodies made of exactly one statement can be inlined.
    pub fn from_definition(definition: Definition<'_>) -> Option<Self> {
        let [Clause::Statement(statement)] = definition.body()?.clauses.as_slice() else {
            return None;
        };
        let id = definition.id().statement.value()?;
        let target = match definition {
            Definition::Defines(defines) => defines.target.names().into_iter().next(),
            Definition::States(_) => None,
        };
        Some(Self {
            target,
            params: params_of(id).into_iter().map(|param| param.name).collect(),
            body: statement.value()?.clone(),
        })
    }
}

fn spliced(expression: &Expression) -> Expression {
    if expression.is_compound() {
        Expression::Grouped(Grouped {
            inner: Box::new(expression.clone()),
            location: expression.location(),
        })
    } else {
        expression.clone()
    }
}

/// Inline `expression` once if it is an `is` statement over a known single-statement
/// body. Returns `None` when nothing applies.
pub fn inline_once(
    expression: &Expression,
    bodies: &HashMap<String, InlineBody>,
) -> Option<Expression> {
    let Expression::Relation(relation) = expression else {
        return None;
    };
    let ([lhs], [rhs], RelationKind::Is) =
        (relation.lhs.as_slice(), relation.rhs.as_slice(), relation.kind)
    else {
        return None;
    };
    let inline = bodies.get(&rhs.signature()?)?;
    let args = arguments_of(rhs).unwrap_or_default();
    if args.len() != inline.params.len() {
        return None;
    }

    let mut replacements: HashMap<String, Expression> = inline
        .params
        .iter()
        .zip(args)
        .map(|(param, arg)| (param.clone(), spliced(arg)))
        .collect();
    if let Some(target) = &inline.target {
        replacements.insert(target.clone(), spliced(lhs));
    }
    Some(inline.body.substitute(&replacements))
}
