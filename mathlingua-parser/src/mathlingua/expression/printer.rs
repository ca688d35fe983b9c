//! Expression printer
//!
//! Prints an expression back to statement text. Parenthesized input is kept as
//! [`Expression::Grouped`], so printing a parsed tree reproduces its grouping without
//! having to re-derive where parentheses are needed.

use super::nodes::{CommandExpression, Expression, Operator};

fn join(items: &[Expression]) -> String {
    items.iter().map(to_code).collect::<Vec<_>>().join(", ")
}

pub fn to_code(expression: &Expression) -> String {
    match expression {
        Expression::Name(name) => name.name.clone(),
        Expression::VariadicName(name) => format!("{}...", name.name),
        Expression::Command(command) => command_to_code(command),
        Expression::Function(function) => format!("{}({})", function.name, join(&function.params)),
        Expression::FunctionCall(call) => {
            let mut code = String::new();
            if call.command {
                code.push('\\');
            }
            code.push_str(&call.name);
            if let Some(sub) = &call.sub_params {
                code.push_str(&format!("_{{{}}}", join(sub)));
            }
            if let Some(params) = &call.params {
                code.push_str(&format!("({})", join(params)));
            }
            code
        }
        Expression::Tuple(tuple) => format!("({})", join(&tuple.items)),
        Expression::Set(set) => format!("{{{}}}", join(&set.items)),
        Expression::Grouped(grouped) => format!("({})", to_code(&grouped.inner)),
        Expression::Operation(operation) => format!(
            "{} {} {}",
            to_code(&operation.lhs),
            operator_to_code(&operation.operator),
            to_code(&operation.rhs)
        ),
        Expression::Prefix(prefix) => format!(
            "{}{}",
            operator_to_code(&prefix.operator),
            to_code(&prefix.operand)
        ),
        Expression::Relation(relation) => format!(
            "{} {} {}",
            join(&relation.lhs),
            relation.kind,
            join(&relation.rhs)
        ),
        Expression::Assignment(assignment) => {
            format!("{} := {}", to_code(&assignment.lhs), to_code(&assignment.rhs))
        }
        Expression::Text(text) => format!("\"{}\"", text.text),
        Expression::Empty(_) => String::new(),
    }
}

fn operator_to_code(operator: &Operator) -> String {
    match operator {
        Operator::Symbol { text, .. } => text.clone(),
        Operator::Command(command) => format!("{}/", command_to_code(command)),
    }
}

pub fn command_to_code(command: &CommandExpression) -> String {
    let mut code = format!("\\{}", command.names.join("."));
    if let Some(square) = &command.square {
        code.push_str(&format!("[{}]", join(square)));
    }
    if let Some(sub) = &command.sub {
        code.push_str(&format!("_{{{}}}", join(sub)));
    }
    if let Some(sup) = &command.sup {
        code.push_str(&format!("^{{{}}}", join(sup)));
    }
    if let Some(curly) = &command.curly {
        code.push_str(&format!("{{{}}}", join(curly)));
    }
    for named in &command.named {
        code.push_str(&format!(":{}{{{}}}", named.name, join(&named.params)));
    }
    if let Some(paren) = &command.paren {
        code.push_str(&format!("({})", join(paren)));
    }
    code
}

impl Expression {
    pub fn to_code(&self) -> String {
        to_code(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::mathlingua::expression::parse_expression;
    use rstest::rstest;

    #[rstest]
    #[case("x is \\set")]
    #[case("x, y in \\real")]
    #[case("x not in X")]
    #[case("\\f(x, y) = \\g(x)")]
    #[case("\\integral.of[a]_{i}^{n}{f}:from{x}(y)")]
    #[case("a + (b - c) * d")]
    #[case("x \\op/ y")]
    #[case("-x")]
    #[case("f_{i}(x...)")]
    #[case("{x, y := z}")]
    #[case("(a, b) := \\pair")]
    #[case("\"some text\" as \\thing")]
    fn test_prints_canonical_text(#[case] text: &str) {
        let (expression, diagnostics) = parse_expression(text);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(expression.to_code(), text);
    }

    #[test]
    fn test_normalizes_spacing() {
        let (expression, _) = parse_expression("\\f( x ,y )=  \\g{ x }");
        insta::assert_snapshot!(expression.to_code(), @r"\f(x, y) = \g{x}");
    }
}
