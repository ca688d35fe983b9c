//! As-written rendering
//!
//! Prints an expression the way [`printer`](mathlingua_parser::mathlingua::expression::printer)
//! does, except that every reference with a known `written:` template is replaced by the
//! instantiated template.

use super::patterns::{arguments_of, WrittenPattern};
use crate::error::ExpansionError;
use mathlingua_parser::mathlingua::expression::{
    CommandExpression, Expression, Operator, Relation, RelationKind,
};
use std::collections::HashMap;

pub struct AsWritten<'p> {
    patterns: &'p HashMap<String, WrittenPattern>,
}

type Rendered = Result<String, ExpansionError>;

impl<'p> AsWritten<'p> {
    pub fn new(patterns: &'p HashMap<String, WrittenPattern>) -> Self {
        Self { patterns }
    }

    pub fn render(&self, expression: &Expression) -> Rendered {
        match expression {
            Expression::Name(name) => match self.patterns.get(&name.name) {
                Some(pattern) => pattern.fill(None, &[]),
                None => Ok(name.name.clone()),
            },
            Expression::VariadicName(name) => Ok(format!("{}...", name.name)),
            Expression::Command(command) => match self.patterns.get(&command.signature()) {
                Some(pattern) => pattern.fill(None, &self.arguments(expression)?),
                None => self.command(command),
            },
            Expression::Function(function) => {
                Ok(format!("{}({})", function.name, self.join(&function.params)?))
            }
            Expression::FunctionCall(call) => {
                let signature = format!("\\{}", call.name);
                if call.command {
                    if let Some(pattern) = self.patterns.get(&signature) {
                        return pattern.fill(None, &self.arguments(expression)?);
                    }
                }
                let mut code = if call.command { signature } else { call.name.clone() };
                if let Some(sub) = &call.sub_params {
                    code.push_str(&format!("_{{{}}}", self.join(sub)?));
                }
                if let Some(params) = &call.params {
                    code.push_str(&format!("({})", self.join(params)?));
                }
                Ok(code)
            }
            Expression::Tuple(tuple) => Ok(format!("({})", self.join(&tuple.items)?)),
            Expression::Set(set) => Ok(format!("{{{}}}", self.join(&set.items)?)),
            Expression::Grouped(grouped) => Ok(format!("({})", self.render(&grouped.inner)?)),
            Expression::Operation(operation) => {
                match self.patterns.get(&operation.operator.text()) {
                    Some(pattern) => pattern.fill(None, &self.arguments(expression)?),
                    None => Ok(format!(
                        "{} {} {}",
                        self.render(&operation.lhs)?,
                        self.operator(&operation.operator)?,
                        self.render(&operation.rhs)?
                    )),
                }
            }
            Expression::Prefix(prefix) => match self.patterns.get(&prefix.operator.text()) {
                Some(pattern) => pattern.fill(None, &self.arguments(expression)?),
                None => Ok(format!(
                    "{}{}",
                    self.operator(&prefix.operator)?,
                    self.render(&prefix.operand)?
                )),
            },
            Expression::Relation(relation) => self.relation(relation),
            // The left side names what is being introduced and stays as written
            Expression::Assignment(assignment) => Ok(format!(
                "{} := {}",
                assignment.lhs.to_code(),
                self.render(&assignment.rhs)?
            )),
            Expression::Text(text) => Ok(format!("\"{}\"", text.text)),
            Expression::Empty(_) => Ok(String::new()),
        }
    }

    /// `x is \function:on{A}:to{B}` renders as a whole from the template when the
    /// template mentions the defined target.
    fn relation(&self, relation: &Relation) -> Rendered {
        if let ([lhs], [rhs], RelationKind::Is) =
            (relation.lhs.as_slice(), relation.rhs.as_slice(), relation.kind)
        {
            let pattern = rhs
                .signature()
                .and_then(|signature| self.patterns.get(&signature))
                .filter(|pattern| pattern.uses_target());
            if let Some(pattern) = pattern {
                let target = self.render(lhs)?;
                return pattern.fill(Some(&target), &self.arguments(rhs)?);
            }
        }
        Ok(format!(
            "{} {} {}",
            self.join(&relation.lhs)?,
            relation.kind,
            self.join(&relation.rhs)?
        ))
    }

    /// Rendered arguments of a reference, parenthesized when compound
    fn arguments(&self, expression: &Expression) -> Result<Vec<String>, ExpansionError> {
        arguments_of(expression)
            .unwrap_or_default()
            .into_iter()
            .map(|argument| {
                let text = self.render(argument)?;
                Ok(if argument.is_compound() {
                    format!("({text})")
                } else {
                    text
                })
            })
            .collect()
    }

    fn join(&self, items: &[Expression]) -> Rendered {
        let rendered = items
            .iter()
            .map(|item| self.render(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rendered.join(", "))
    }

    fn operator(&self, operator: &Operator) -> Rendered {
        match operator {
            Operator::Symbol { text, .. } => Ok(text.clone()),
            Operator::Command(command) => Ok(format!("{}/", self.command(command)?)),
        }
    }

    fn command(&self, command: &CommandExpression) -> Rendered {
        let mut code = format!("\\{}", command.names.join("."));
        if let Some(square) = &command.square {
            code.push_str(&format!("[{}]", self.join(square)?));
        }
        if let Some(sub) = &command.sub {
            code.push_str(&format!("_{{{}}}", self.join(sub)?));
        }
        if let Some(sup) = &command.sup {
            code.push_str(&format!("^{{{}}}", self.join(sup)?));
        }
        if let Some(curly) = &command.curly {
            code.push_str(&format!("{{{}}}", self.join(curly)?));
        }
        for named in &command.named {
            code.push_str(&format!(":{}{{{}}}", named.name, self.join(&named.params)?));
        }
        if let Some(paren) = &command.paren {
            code.push_str(&format!("({})", self.join(paren)?));
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion::patterns::params_of;
    use mathlingua_parser::mathlingua::expression::parse_expression;

    fn parse_ok(text: &str) -> Expression {
        let (expression, diagnostics) = parse_expression(text);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        expression
    }

    fn patterns(entries: &[(&str, Option<&str>, &str)]) -> HashMap<String, WrittenPattern> {
        entries
            .iter()
            .map(|(id, target, template)| {
                let id = parse_ok(id);
                let signature = id.signature().unwrap_or_default();
                let pattern = WrittenPattern {
                    signature: signature.clone(),
                    target: target.map(str::to_string),
                    params: params_of(&id),
                    template: template.to_string(),
                };
                (signature, pattern)
            })
            .collect()
    }

    #[test]
    fn test_unknown_references_print_canonically() {
        let patterns = HashMap::new();
        let written = AsWritten::new(&patterns);
        let text = "\\f(x, y) = \\g{x} + y";
        assert_eq!(written.render(&parse_ok(text)).as_deref(), Ok(text));
    }

    #[test]
    fn test_nested_templates() {
        let patterns = patterns(&[
            ("\\N", None, "\\mathbb{N}"),
            ("\\set.of{X}", None, "\\{X?\\}"),
        ]);
        let written = AsWritten::new(&patterns);
        assert_eq!(
            written.render(&parse_ok("x in \\set.of{\\N}")).as_deref(),
            Ok("x in \\{\\mathbb{N}\\}")
        );
    }

    #[test]
    fn test_is_relation_uses_target() {
        let patterns = patterns(&[(
            "\\function:on{A}:to{B}",
            Some("f"),
            "f? : A? \\rightarrow B?",
        )]);
        let written = AsWritten::new(&patterns);
        assert_eq!(
            written
                .render(&parse_ok("g is \\function:on{X}:to{Y}"))
                .as_deref(),
            Ok("g : X \\rightarrow Y")
        );
    }

    #[test]
    fn test_compound_arguments_are_parenthesized() {
        let patterns = patterns(&[("\\abs{x}", None, "|x?|")]);
        let written = AsWritten::new(&patterns);
        assert_eq!(
            written.render(&parse_ok("\\abs{a + b}")).as_deref(),
            Ok("|(a + b)|")
        );
    }

    #[test]
    fn test_assignment_left_side_stays_as_written() {
        let patterns = patterns(&[
            ("\\pair{a, b}", None, "(a?, b?)"),
            ("\\f{x}", None, "F(x?)"),
        ]);
        let written = AsWritten::new(&patterns);
        assert_eq!(
            written.render(&parse_ok("\\f{z} := \\pair{z, z}")).as_deref(),
            Ok("\\f{z} := (z, z)")
        );
    }

    #[test]
    fn test_arity_error_surfaces() {
        let patterns = patterns(&[("\\pair{a, b}", None, "(a?, b?)")]);
        let written = AsWritten::new(&patterns);
        let error = written.render(&parse_ok("x = \\pair{y}")).unwrap_err();
        assert_eq!(
            error,
            ExpansionError::ArityMismatch {
                signature: "\\pair".to_string(),
                expected: 2,
                found: 1,
            }
        );
    }
}
