//! Token definitions for the statement language
//!
//! `=` and `!=` are not separate logos patterns: they are runs of operator characters like
//! any other and are reclassified after scanning, so that `<=` or `==` stay operators.

use crate::mathlingua::ast::Location;
use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum ExprTokenKind {
    #[token("is")]
    Is,

    #[token("in")]
    In,

    #[regex(r"not[ \t\r\n\f]+in")]
    NotIn,

    #[token("as")]
    As,

    #[token(":=")]
    ColonEquals,

    /// Only produced by reclassifying an operator run
    Equals,

    /// Only produced by reclassifying an operator run
    NotEquals,

    #[regex(r"[~!@%&*\-+<>/|=]+")]
    Operator,

    #[token("\\")]
    Backslash,

    #[token(".")]
    Dot,

    #[token("...")]
    DotDotDot,

    #[token("^")]
    Caret,

    #[token("_")]
    Underscore,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LSquare,

    #[token("]")]
    RSquare,

    #[token("{")]
    LCurly,

    #[token("}")]
    RCurly,

    #[token("[:")]
    LSquareColon,

    #[token(":]")]
    ColonRSquare,

    #[regex(r#""[^"]*""#)]
    Text,

    #[regex(r"[a-zA-Z0-9]+")]
    Name,
}

impl ExprTokenKind {
    pub fn is_opening(self) -> bool {
        matches!(
            self,
            ExprTokenKind::LParen
                | ExprTokenKind::LSquare
                | ExprTokenKind::LCurly
                | ExprTokenKind::LSquareColon
        )
    }

    pub fn is_closing(self) -> bool {
        matches!(
            self,
            ExprTokenKind::RParen
                | ExprTokenKind::RSquare
                | ExprTokenKind::RCurly
                | ExprTokenKind::ColonRSquare
        )
    }

    /// The closer matching an opening bracket
    pub fn closer(self) -> Option<ExprTokenKind> {
        match self {
            ExprTokenKind::LParen => Some(ExprTokenKind::RParen),
            ExprTokenKind::LSquare => Some(ExprTokenKind::RSquare),
            ExprTokenKind::LCurly => Some(ExprTokenKind::RCurly),
            ExprTokenKind::LSquareColon => Some(ExprTokenKind::ColonRSquare),
            _ => None,
        }
    }
}

impl fmt::Display for ExprTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExprTokenKind::Is => "is",
            ExprTokenKind::In => "in",
            ExprTokenKind::NotIn => "not in",
            ExprTokenKind::As => "as",
            ExprTokenKind::ColonEquals => ":=",
            ExprTokenKind::Equals => "=",
            ExprTokenKind::NotEquals => "!=",
            ExprTokenKind::Operator => "operator",
            ExprTokenKind::Backslash => "\\",
            ExprTokenKind::Dot => ".",
            ExprTokenKind::DotDotDot => "...",
            ExprTokenKind::Caret => "^",
            ExprTokenKind::Underscore => "_",
            ExprTokenKind::Colon => ":",
            ExprTokenKind::Comma => ",",
            ExprTokenKind::LParen => "(",
            ExprTokenKind::RParen => ")",
            ExprTokenKind::LSquare => "[",
            ExprTokenKind::RSquare => "]",
            ExprTokenKind::LCurly => "{",
            ExprTokenKind::RCurly => "}",
            ExprTokenKind::LSquareColon => "[:",
            ExprTokenKind::ColonRSquare => ":]",
            ExprTokenKind::Text => "text",
            ExprTokenKind::Name => "name",
        };
        write!(f, "{text}")
    }
}

/// A located token of the statement language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprToken {
    pub text: String,
    pub kind: ExprTokenKind,
    pub row: i32,
    pub column: i32,
}

impl ExprToken {
    pub fn new(text: impl Into<String>, kind: ExprTokenKind, location: Location) -> Self {
        Self {
            text: text.into(),
            kind,
            row: location.row,
            column: location.column,
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Result<ExprTokenKind, ()>> {
        ExprTokenKind::lexer(source).collect()
    }

    #[test]
    fn test_keywords_win_over_names() {
        assert_eq!(
            kinds("x is island"),
            vec![
                Ok(ExprTokenKind::Name),
                Ok(ExprTokenKind::Is),
                Ok(ExprTokenKind::Name)
            ]
        );
    }

    #[test]
    fn test_not_in_is_one_token() {
        assert_eq!(
            kinds("x not  in X"),
            vec![
                Ok(ExprTokenKind::Name),
                Ok(ExprTokenKind::NotIn),
                Ok(ExprTokenKind::Name)
            ]
        );
    }

    #[test]
    fn test_square_colon_brackets() {
        assert_eq!(
            kinds("[: x :]"),
            vec![
                Ok(ExprTokenKind::LSquareColon),
                Ok(ExprTokenKind::Name),
                Ok(ExprTokenKind::ColonRSquare)
            ]
        );
    }

    #[test]
    fn test_bracket_pairs() {
        assert_eq!(ExprTokenKind::LCurly.closer(), Some(ExprTokenKind::RCurly));
        assert!(ExprTokenKind::ColonRSquare.is_closing());
        assert!(!ExprTokenKind::Name.is_opening());
    }
}
