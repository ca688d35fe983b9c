//! Leaf nodes of the typed document
//!
//! Statements keep their raw text next to the parse result, so printing never depends on
//! the expression printer and a statement that failed to parse still round-trips.

use super::tree::Target;
use crate::mathlingua::ast::{Location, Validation};
use crate::mathlingua::expression::{parse_expression, Expression};
use crate::mathlingua::lexing::Token;

/// A quoted statement such as `'x is \set'`
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Text between the quotes
    pub text: String,
    pub expression: Validation<Expression>,
    pub location: Location,
}

impl Statement {
    /// Parse `text` (without delimiters) found at `location`.
    pub fn parse(text: impl Into<String>, location: Location) -> Self {
        let text = text.into();
        let (expression, diagnostics) = parse_expression(&text);
        Self {
            expression: Validation::from_parts(expression, diagnostics),
            text,
            location,
        }
    }

    /// Build a statement from a `'...'` or `[...]` token.
    pub fn from_token(token: &Token) -> Self {
        Self::parse(strip_delimiters(&token.text), token.location())
    }

    pub fn value(&self) -> Option<&Expression> {
        self.expression.value()
    }

    /// Where the statement text starts in the file, just past the opening delimiter
    pub fn text_origin(&self) -> Location {
        Location::new(self.location.row, self.location.column + 1)
    }
}

impl Default for Statement {
    fn default() -> Self {
        Self {
            text: String::new(),
            expression: Validation::Success(Expression::default()),
            location: Location::default(),
        }
    }
}

/// The `[...]` line identifying a group
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Id {
    pub statement: Statement,
}

impl Id {
    pub fn from_token(token: &Token) -> Self {
        Self {
            statement: Statement::from_token(token),
        }
    }

    pub fn location(&self) -> Location {
        self.statement.location
    }

    pub fn text(&self) -> &str {
        &self.statement.text
    }
}

/// A `"..."` literal; `text` excludes the quotes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    pub text: String,
    pub location: Location,
}

impl Text {
    pub fn from_token(token: &Token) -> Self {
        Self {
            text: strip_delimiters(&token.text).to_string(),
            location: token.location(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StringList {
    pub items: Vec<Text>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetList {
    pub items: Vec<Target>,
    pub location: Location,
}

impl TargetList {
    pub fn names(&self) -> Vec<String> {
        self.items.iter().flat_map(Target::names).collect()
    }
}

/// Drop the one-character delimiters around a literal token
pub fn strip_delimiters(text: &str) -> &str {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}
