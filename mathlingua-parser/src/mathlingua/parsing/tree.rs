//! Phase-1 tree
//!
//! The generic shape of a structural document, built purely from `Begin`/`End` nesting:
//! a [`Root`] holds groups and block comments, a [`Group`] is an optional id followed by
//! sections, a [`Section`] is a name followed by arguments, and an [`Argument`] is either a
//! target or a nested group. Nothing here knows which sections a `Defines:` needs; that is
//! the job of the phase-2 validators.

use crate::mathlingua::ast::Location;
use crate::mathlingua::lexing::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Root {
    pub items: Vec<RootItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RootItem {
    Group(Group),
    BlockComment(Token),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: Option<Token>,
    pub sections: Vec<Section>,
    pub location: Location,
}

impl Group {
    /// Name of the leading section, which decides the group's kind
    pub fn first_section_name(&self) -> Option<&str> {
        self.sections.first().map(|s| s.name.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: Token,
    pub args: Vec<Argument>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Target(Target),
    Group(Group),
}

impl Argument {
    pub fn location(&self) -> Location {
        match self {
            Argument::Target(target) => target.location(),
            Argument::Group(group) => group.location,
        }
    }
}

/// The leaf shapes an argument can take
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Token(Token),
    Abstraction(Abstraction),
    Assignment(Assignment),
    Tuple(Tuple),
}

impl Target {
    pub fn location(&self) -> Location {
        match self {
            Target::Token(token) => token.location(),
            Target::Abstraction(abstraction) => abstraction.location,
            Target::Assignment(assignment) => assignment.location,
            Target::Tuple(tuple) => tuple.location,
        }
    }

    /// The token when this target is a bare token of `kind`
    pub fn token_of(&self, kind: TokenKind) -> Option<&Token> {
        match self {
            Target::Token(token) if token.kind == kind => Some(token),
            _ => None,
        }
    }

    pub fn to_code(&self) -> String {
        match self {
            Target::Token(token) => token.text.clone(),
            Target::Abstraction(abstraction) => abstraction.to_code(),
            Target::Assignment(assignment) => assignment.to_code(),
            Target::Tuple(tuple) => tuple.to_code(),
        }
    }

    /// Plain names bound by this target, in order of appearance
    pub fn names(&self) -> Vec<String> {
        match self {
            Target::Token(token) if token.kind == TokenKind::Name => {
                vec![strip_name_suffix(&token.text).to_string()]
            }
            Target::Token(_) => vec![],
            Target::Abstraction(abstraction) => abstraction.names(),
            Target::Assignment(assignment) => {
                vec![strip_name_suffix(&assignment.lhs.text).to_string()]
            }
            Target::Tuple(tuple) => tuple.items.iter().flat_map(Target::names).collect(),
        }
    }
}

/// `f(x, y)`, `a_{i}`, `a_{i}(x)` or the enclosed set-builder form `{x, y}`
#[derive(Debug, Clone, PartialEq)]
pub struct Abstraction {
    pub name: Option<Token>,
    pub enclosed: bool,
    pub sub_params: Option<Vec<Token>>,
    pub params: Option<Vec<Token>>,
    pub location: Location,
}

impl Abstraction {
    pub fn to_code(&self) -> String {
        let join = |tokens: &[Token]| {
            tokens
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut code = String::new();
        if let Some(name) = &self.name {
            code.push_str(&name.text);
        }
        if let Some(sub) = &self.sub_params {
            code.push_str("_{");
            code.push_str(&join(sub));
            code.push('}');
        }
        if let Some(params) = &self.params {
            let (open, close) = if self.enclosed { ('{', '}') } else { ('(', ')') };
            code.push(open);
            code.push_str(&join(params));
            code.push(close);
        }
        code
    }

    /// The function name (when present) followed by every parameter name
    pub fn names(&self) -> Vec<String> {
        self.name
            .iter()
            .chain(self.sub_params.iter().flatten())
            .chain(self.params.iter().flatten())
            .map(|t| strip_name_suffix(&t.text).to_string())
            .collect()
    }
}

/// `name := rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub lhs: Token,
    pub rhs: Box<Target>,
    pub location: Location,
}

impl Assignment {
    pub fn to_code(&self) -> String {
        format!("{} := {}", self.lhs.text, self.rhs.to_code())
    }
}

/// `(a, b(x), c)`
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    pub items: Vec<Target>,
    pub location: Location,
}

impl Tuple {
    pub fn to_code(&self) -> String {
        let items: Vec<String> = self.items.iter().map(Target::to_code).collect();
        format!("({})", items.join(", "))
    }
}

/// Drop the variadic or placeholder suffix of a structural name (`x...` and `x?` bind `x`)
pub fn strip_name_suffix(text: &str) -> &str {
    let text = text.strip_suffix('?').unwrap_or(text);
    match text.find("...") {
        Some(index) if index > 0 => &text[..index],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str) -> Token {
        Token::new(text, TokenKind::Name, Location::default())
    }

    #[test]
    fn test_abstraction_to_code() {
        let abstraction = Abstraction {
            name: Some(name("f")),
            enclosed: false,
            sub_params: Some(vec![name("i")]),
            params: Some(vec![name("x"), name("y")]),
            location: Location::default(),
        };
        assert_eq!(abstraction.to_code(), "f_{i}(x, y)");
        assert_eq!(abstraction.names(), vec!["f", "i", "x", "y"]);
    }

    #[test]
    fn test_enclosed_abstraction_to_code() {
        let abstraction = Abstraction {
            name: None,
            enclosed: true,
            sub_params: None,
            params: Some(vec![name("x...")]),
            location: Location::default(),
        };
        assert_eq!(abstraction.to_code(), "{x...}");
        assert_eq!(abstraction.names(), vec!["x"]);
    }

    #[test]
    fn test_strip_name_suffix() {
        assert_eq!(strip_name_suffix("x?"), "x");
        assert_eq!(strip_name_suffix("x..."), "x");
        assert_eq!(strip_name_suffix("x...#y..."), "x");
        assert_eq!(strip_name_suffix("x#1"), "x#1");
    }
}
