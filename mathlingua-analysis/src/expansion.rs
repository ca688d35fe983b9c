//! Expansion engine
//!
//!     Two transformations turn a statement into what a reader sees:
//!
//!         1. [inline]: `x is \B{y}` becomes the body of `\B`, repeated until the text stops
//!            changing, a previous snapshot comes back, or the iteration cap is reached
//!         2. [written]: every reference with a `written:` template is printed through it
//!
//!     Templates and bodies come from the corpus definitions. `:=` statements in a group's
//!     `using:` section add aliases for the duration of a single render through
//!     [`ExpansionEngine::with_aliases`].

pub mod inline;
pub mod patterns;
pub mod written;

use crate::error::ExpansionError;
use inline::{inline_once, InlineBody};
use mathlingua_parser::mathlingua::expression::{parse_expression, Expression};
use mathlingua_parser::mathlingua::parsing::{ClauseList, Definition};
use patterns::{params_of, placeholder, WrittenPattern};
use std::collections::HashMap;
use written::AsWritten;

pub use patterns::Param;

pub const DEFAULT_MAX_ITERATIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPoint {
    pub text: String,
    pub iterations: usize,
}

#[derive(Debug, Clone)]
pub struct ExpansionEngine {
    patterns: HashMap<String, WrittenPattern>,
    bodies: HashMap<String, InlineBody>,
    max_iterations: usize,
}

impl Default for ExpansionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS)
    }
}

/// Left-hand sides of `:=` statements that alias a command, like `\f(x) := ...`
pub fn alias_signatures(using: &ClauseList) -> Vec<String> {
    assignments(using)
        .filter_map(|(lhs, _)| match lhs {
            Expression::Command(_) => lhs.signature(),
            Expression::FunctionCall(call) if call.command => lhs.signature(),
            _ => None,
        })
        .collect()
}

fn assignments(using: &ClauseList) -> impl Iterator<Item = (&Expression, &Expression)> {
    using
        .top_level_statements()
        .into_iter()
        .filter_map(|statement| match statement.value()? {
            Expression::Assignment(assignment) => {
                Some((assignment.lhs.as_ref(), assignment.rhs.as_ref()))
            }
            _ => None,
        })
}

impl ExpansionEngine {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            patterns: HashMap::new(),
            bodies: HashMap::new(),
            max_iterations,
        }
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn patterns(&self) -> &HashMap<String, WrittenPattern> {
        &self.patterns
    }

    pub fn add_definition(&mut self, definition: Definition<'_>) {
        let Some(signature) = definition.signature() else {
            return;
        };
        if let Some(pattern) = WrittenPattern::from_definition(definition) {
            self.patterns.insert(signature.form.clone(), pattern);
        }
        if let Some(body) = InlineBody::from_definition(definition) {
            self.bodies.insert(signature.form, body);
        }
    }

    pub fn add_pattern(&mut self, pattern: WrittenPattern) {
        self.patterns.insert(pattern.signature.clone(), pattern);
    }

    /// Register the `:=` aliases of a `using:` section.
    pub fn add_aliases(&mut self, using: &ClauseList) {
        let aliases: Vec<WrittenPattern> = assignments(using)
            .flat_map(|(lhs, rhs)| self.aliases_for(lhs, rhs))
            .collect();
        for alias in aliases {
            tracing::trace!(signature = %alias.signature, template = %alias.template, "alias");
            self.add_pattern(alias);
        }
    }

    fn aliases_for(&self, lhs: &Expression, rhs: &Expression) -> Vec<WrittenPattern> {
        match lhs {
            Expression::Command(_) | Expression::FunctionCall(_) if lhs.signature().is_some() => {
                let params = params_of(lhs);
                let marked: HashMap<String, Expression> = params
                    .iter()
                    .map(|param| (param.name.clone(), placeholder(&param.name)))
                    .collect();
                let rhs = rhs.substitute(&marked);
                let template = self
                    .expand_as_written(&rhs)
                    .unwrap_or_else(|_| rhs.to_code());
                lhs.signature()
                    .map(|signature| WrittenPattern::alias(signature, params, template))
                    .into_iter()
                    .collect()
            }
            Expression::Name(_) | Expression::Tuple(_) => {
                let template = self
                    .expand_as_written(rhs)
                    .unwrap_or_else(|_| rhs.to_code());
                lhs.bound_names()
                    .into_iter()
                    .map(|name| WrittenPattern::alias(name, Vec::new(), template.clone()))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// A copy of this engine that also knows the aliases of `lists`
    pub fn with_aliases<'a>(&self, lists: impl IntoIterator<Item = &'a ClauseList>) -> Self {
        let mut engine = self.clone();
        for list in lists {
            engine.add_aliases(list);
        }
        engine
    }

    pub fn expand_as_written(&self, expression: &Expression) -> Result<String, ExpansionError> {
        AsWritten::new(&self.patterns).render(expression)
    }

    /// Parse `text` as a statement and render it as written.
    pub fn expand_text_as_written(&self, text: &str) -> Result<String, ExpansionError> {
        let (expression, diagnostics) = parse_expression(text);
        if !diagnostics.is_empty() {
            return Err(ExpansionError::Unparsable {
                text: text.to_string(),
            });
        }
        self.expand_as_written(&expression)
    }

    /// Inline definitions into `text` until the result stops changing.
    pub fn expand_to_fixed_point(&self, text: &str) -> FixedPoint {
        let mut current = text.to_string();
        let mut snapshots = vec![current.clone()];
        let mut iterations = 0;
        while iterations < self.max_iterations {
            let (expression, diagnostics) = parse_expression(&current);
            if !diagnostics.is_empty() {
                break;
            }
            let Some(inlined) = inline_once(&expression, &self.bodies) else {
                break;
            };
            let next = inlined.to_code();
            iterations += 1;
            tracing::trace!(iteration = iterations, text = %next, "inlined");
            if snapshots.contains(&next) {
                break;
            }
            snapshots.push(next.clone());
            current = next;
        }
        tracing::debug!(iterations, "expansion reached a fixed point");
        FixedPoint {
            text: current,
            iterations,
        }
    }

    /// Inline to a fixed point, then render as written.
    pub fn expand(&self, text: &str) -> Result<String, ExpansionError> {
        let fixed = self.expand_to_fixed_point(text);
        self.expand_text_as_written(&fixed.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathlingua_parser::mathlingua::parsing::{parse, TopLevelGroup};

    fn engine(source: &str, max_iterations: usize) -> (ExpansionEngine, Vec<TopLevelGroup>) {
        let document = parse(source).into_result().expect("source parses");
        let mut engine = ExpansionEngine::new(max_iterations);
        for group in &document.groups {
            for definition in group.definitions() {
                engine.add_definition(definition);
            }
        }
        (engine, document.groups)
    }

    #[test]
    fn test_fixed_point_follows_chains() {
        let source = "[\\A]\nDefines: a\nmeans: 'a is \\B'\n\n[\\B]\nDefines: b\nmeans: 'b is \\C'\n";
        let (engine, _) = engine(source, DEFAULT_MAX_ITERATIONS);
        let fixed = engine.expand_to_fixed_point("x is \\A");
        assert_eq!(fixed.text, "x is \\C");
        assert_eq!(fixed.iterations, 2);
    }

    #[test]
    fn test_fixed_point_terminates_on_cycles() {
        let source = "[\\A]\nDefines: a\nmeans: 'a is \\B'\n\n[\\B]\nDefines: b\nmeans: 'b is \\A'\n";
        let (engine, _) = engine(source, 50);
        let fixed = engine.expand_to_fixed_point("x is \\A");
        assert_eq!(fixed.text, "x is \\B");
        assert_eq!(fixed.iterations, 2);
    }

    #[test]
    fn test_iteration_cap() {
        let source = "[\\A]\nDefines: a\nmeans: 'a is \\B'\n\n[\\B]\nDefines: b\nmeans: 'b is \\C'\n";
        let (engine, _) = engine(source, 1);
        assert_eq!(engine.expand_to_fixed_point("x is \\A").text, "x is \\B");
    }

    #[test]
    fn test_expand_inlines_then_renders() {
        let source = "[\\even]\nDefines: n\nmeans: 'n is \\natural'\n\n[\\natural]\nDefines: n\nwritten: \"\\mathbb{N}\"\n";
        let (engine, _) = engine(source, DEFAULT_MAX_ITERATIONS);
        assert_eq!(engine.expand("k is \\even").as_deref(), Ok("k is \\mathbb{N}"));
        assert_eq!(
            engine.expand_text_as_written("k is \\even").as_deref(),
            Ok("k is \\even")
        );
    }

    #[test]
    fn test_using_aliases() {
        let source = "Theorem:\nthen: '\\f{y} = z'\nusing:\n. '\\f{x} := \\g{x, x}'\n. '(a, b) := \\pair'\n";
        let (engine, groups) = engine(source, DEFAULT_MAX_ITERATIONS);
        let using = groups[0].using();
        assert_eq!(alias_signatures(using[0]), vec!["\\f"]);

        let scoped = engine.with_aliases(using);
        assert_eq!(
            scoped.expand_text_as_written("\\f{y} = a").as_deref(),
            Ok("\\g{y, y} = \\pair")
        );
        assert!(engine.patterns().is_empty());
    }

    #[test]
    fn test_unparsable_text() {
        let engine = ExpansionEngine::default();
        assert!(matches!(
            engine.expand_text_as_written("\\f(x"),
            Err(ExpansionError::Unparsable { .. })
        ));
    }
}
