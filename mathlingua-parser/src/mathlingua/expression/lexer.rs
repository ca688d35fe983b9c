//! Statement lexer
//!
//! Turns the text between a statement's quotes into located tokens. Rows and columns are
//! relative to the start of the statement text; callers that need file positions offset
//! them by the statement's own location.

use super::tokens::{ExprToken, ExprTokenKind};
use crate::mathlingua::ast::{Diagnostic, SourceLocation};
use logos::Logos;

/// Output of the statement lexer: the tokens plus anything that could not be scanned
#[derive(Debug, Clone, Default)]
pub struct ExprLexerOutput {
    pub tokens: Vec<ExprToken>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn lex_expression(text: &str) -> ExprLexerOutput {
    let locator = SourceLocation::new(text);
    let mut lexer = ExprTokenKind::lexer(text);
    let mut output = ExprLexerOutput::default();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let location = locator.locate(span.start);
        let slice = lexer.slice();
        match result {
            Ok(kind) => {
                let kind = match (kind, slice) {
                    (ExprTokenKind::Operator, "=") => ExprTokenKind::Equals,
                    (ExprTokenKind::Operator, "!=") => ExprTokenKind::NotEquals,
                    _ => kind,
                };
                output.tokens.push(ExprToken::new(slice, kind, location));
            }
            Err(()) => {
                let ch = slice.chars().next().unwrap_or('\u{fffd}');
                output.diagnostics.push(Diagnostic::expression(
                    format!("Unrecognized character {ch}"),
                    location,
                ));
            }
        }
    }

    output
}
