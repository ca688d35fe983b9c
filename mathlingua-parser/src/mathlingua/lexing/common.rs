//! Common lexer types
//!
//! This module contains the token shape handed to the parser and the lexical error kinds.

use crate::mathlingua::ast::{Diagnostic, Location};
use std::fmt;
use thiserror::Error;

/// Kinds of tokens produced by the structural lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Synthesized at every newline that ends a content line
    Begin,
    /// Synthesized when indentation returns to an enclosing level
    End,
    /// Synthesized for a run of blank lines
    Linebreak,
    Name,
    Operator,
    String,
    Statement,
    Id,
    BlockComment,
    Colon,
    ColonEquals,
    Comma,
    LParen,
    RParen,
    LCurly,
    RCurly,
    DotSpace,
    DotDotDot,
    Underscore,
    Equals,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Begin => "<Indent>",
            TokenKind::End => "<Unindent>",
            TokenKind::Linebreak => "<Linebreak>",
            TokenKind::Name => "name",
            TokenKind::Operator => "operator",
            TokenKind::String => "string",
            TokenKind::Statement => "statement",
            TokenKind::Id => "id",
            TokenKind::BlockComment => "block comment",
            TokenKind::Colon => ":",
            TokenKind::ColonEquals => ":=",
            TokenKind::Comma => ",",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LCurly => "{",
            TokenKind::RCurly => "}",
            TokenKind::DotSpace => ". ",
            TokenKind::DotDotDot => "...",
            TokenKind::Underscore => "_",
            TokenKind::Equals => "=",
        };
        write!(f, "{text}")
    }
}

/// A located structural token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub row: i32,
    pub column: i32,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind, location: Location) -> Self {
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

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Output from the structural lexer: every token plus every problem found on the way
#[derive(Debug, Clone, Default)]
pub struct LexerOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Problems the lexer recovers from
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Expected a terminating \"")]
    UnterminatedString,
    #[error("Expected a terminating '")]
    UnterminatedStatement,
    #[error("Expected a terminating ]")]
    UnterminatedId,
    #[error("Expected a terminating ::")]
    UnterminatedBlockComment,
    #[error("Unrecognized character {0}")]
    UnrecognizedCharacter(char),
    #[error("{0}")]
    MalformedName(&'static str),
}

impl LexError {
    pub fn at(&self, location: Location) -> Diagnostic {
        Diagnostic::lex(self.to_string(), location)
    }
}
