//! `written:` templates
//!
//! A template such as `"f? : A? \rightarrow B?"` refers to the id's parameters and the
//! defined target by name, each followed by `?`. Arguments are matched to parameters by
//! position, in the order square, sub, sup, curly, named groups, paren.

use crate::error::ExpansionError;
use mathlingua_parser::mathlingua::expression::{Expression, NameExpression};
use mathlingua_parser::mathlingua::parsing::Definition;
use mathlingua_parser::Location;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-zA-Z0-9]+)\?").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPattern {
    pub signature: String,
    /// Name the template uses for the defined thing (`f` in `Defines: f`)
    pub target: Option<String>,
    pub params: Vec<Param>,
    pub template: String,
}

fn param_of(expression: &Expression) -> Param {
    match expression {
        Expression::Name(name) => Param {
            name: name.name.clone(),
            variadic: false,
        },
        Expression::VariadicName(name) => Param {
            name: name.name.clone(),
            variadic: true,
        },
        other => Param {
            name: other.bound_names().into_iter().next().unwrap_or_default(),
            variadic: false,
        },
    }
}

/// Arguments of a reference, in positional order. `None` when the expression is not
/// something a template can stand in for.
pub fn arguments_of(expression: &Expression) -> Option<Vec<&Expression>> {
    match expression {
        Expression::Command(command) => Some(command.arguments()),
        Expression::FunctionCall(call) if call.command => Some(call.arguments()),
        Expression::Operation(operation) => {
            Some(vec![operation.lhs.as_ref(), operation.rhs.as_ref()])
        }
        Expression::Prefix(prefix) => Some(vec![prefix.operand.as_ref()]),
        _ => None,
    }
}

/// Parameters declared by an id expression such as `\function:on{A}:to{B}`
pub fn params_of(id: &Expression) -> Vec<Param> {
    arguments_of(id)
        .unwrap_or_default()
        .into_iter()
        .map(param_of)
        .collect()
}

impl WrittenPattern {
    /// The first `written:` entry of a definition, keyed by its signature
    pub fn from_definition(definition: Definition<'_>) -> Option<Self> {
        let template = definition.written()?.items.first()?.text.clone();
        let signature = definition.signature()?.form;
        let id = definition.id().statement.value()?;
        let target = match definition {
            Definition::Defines(defines) => defines.target.names().into_iter().next(),
            Definition::States(_) => None,
        };
        Some(Self {
            signature,
            target,
            params: params_of(id),
            template,
        })
    }

    /// A pattern for a `using:` alias. Parameter names in `template` are expected to be
    /// marked as placeholders already.
    pub fn alias(signature: impl Into<String>, params: Vec<Param>, template: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            target: None,
            params,
            template: template.into(),
        }
    }

    pub fn uses_target(&self) -> bool {
        self.target
            .as_ref()
            .map(|target| self.placeholders().any(|name| name == target))
            .unwrap_or(false)
    }

    fn uses_params(&self) -> bool {
        self.placeholders()
            .any(|name| self.params.iter().any(|param| param.name == name))
    }

    fn placeholders(&self) -> impl Iterator<Item = &str> {
        PLACEHOLDER
            .captures_iter(&self.template)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    }

    fn bind(&self, args: &[String]) -> Result<HashMap<&str, String>, ExpansionError> {
        let mismatch = || ExpansionError::ArityMismatch {
            signature: self.signature.clone(),
            expected: self.params.len(),
            found: args.len(),
        };
        let mut bound = HashMap::new();
        if args.is_empty() {
            return if self.uses_params() {
                Err(mismatch())
            } else {
                Ok(bound)
            };
        }

        let variadic = self.params.last().map(|p| p.variadic).unwrap_or(false);
        let fixed = if variadic {
            self.params.len() - 1
        } else {
            self.params.len()
        };
        if args.len() < fixed || (!variadic && args.len() != fixed) {
            return Err(mismatch());
        }
        for (param, arg) in self.params.iter().zip(args) {
            bound.insert(param.name.as_str(), arg.clone());
        }
        if variadic {
            if let Some(last) = self.params.last() {
                bound.insert(last.name.as_str(), args[fixed..].join(", "));
            }
        }
        Ok(bound)
    }

    /// Instantiate the template with rendered arguments, and `target` for the target name.
    pub fn fill(&self, target: Option<&str>, args: &[String]) -> Result<String, ExpansionError> {
        let bound = self.bind(args)?;
        let filled = PLACEHOLDER.replace_all(&self.template, |caps: &Captures<'_>| {
            let name = &caps[1];
            if let (Some(target_name), Some(value)) = (self.target.as_deref(), target) {
                if name == target_name {
                    return value.to_string();
                }
            }
            match bound.get(name) {
                Some(value) => value.clone(),
                None if self.target.as_deref() == Some(name) => name.to_string(),
                None => caps[0].to_string(),
            }
        });
        Ok(filled.into_owned())
    }
}

/// A placeholder expression printing as `name?`
pub fn placeholder(name: &str) -> Expression {
    Expression::Name(NameExpression {
        name: format!("{name}?"),
        location: Location::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathlingua_parser::mathlingua::expression::parse_expression;

    fn pattern(id: &str, target: Option<&str>, template: &str) -> WrittenPattern {
        let (expression, diagnostics) = parse_expression(id);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        WrittenPattern {
            signature: expression.signature().unwrap_or_default(),
            target: target.map(str::to_string),
            params: params_of(&expression),
            template: template.to_string(),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fill_positional_parameters() {
        let p = pattern("\\function:on{A}:to{B}", Some("f"), "f? : A? \\rightarrow B?");
        assert_eq!(
            p.fill(Some("g"), &strings(&["X", "Y"])).as_deref(),
            Ok("g : X \\rightarrow Y")
        );
        assert_eq!(
            p.fill(None, &strings(&["X", "Y"])).as_deref(),
            Ok("f : X \\rightarrow Y")
        );
    }

    #[test]
    fn test_arity_mismatch() {
        let p = pattern("\\pair{a, b}", None, "(a?, b?)");
        let error = p.fill(None, &strings(&["x"])).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Expected 2 argument(s) for '\\pair' but found 1"
        );
        assert!(p.fill(None, &[]).is_err());
    }

    #[test]
    fn test_bare_reference_without_placeholders() {
        let p = pattern("\\N", None, "\\mathbb{N}");
        assert_eq!(p.fill(None, &[]).as_deref(), Ok("\\mathbb{N}"));
        assert!(p.fill(None, &strings(&["x"])).is_err());
    }

    #[test]
    fn test_variadic_parameter_absorbs_the_rest() {
        let p = pattern("\\tuple{x...}", None, "<x?>");
        assert_eq!(p.fill(None, &strings(&["a", "b", "c"])).as_deref(), Ok("<a, b, c>"));
    }

    #[test]
    fn test_placeholder_prints_with_marker() {
        assert_eq!(placeholder("x").to_code(), "x?");
        let p = WrittenPattern::alias(
            "\\f",
            vec![Param {
                name: "x".to_string(),
                variadic: false,
            }],
            "\\g{x?}",
        );
        assert_eq!(p.fill(None, &strings(&["y"])).as_deref(), Ok("\\g{y}"));
    }
}
