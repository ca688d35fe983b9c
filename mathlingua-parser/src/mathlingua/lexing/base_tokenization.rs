//! Base tokenization for the structural lexer
//!
//! This module provides the raw tokenization using the logos lexer library.
//! This is the entry point where source strings become token streams.
//!
//! This is NOT a transformation - transformations operate on token streams.
//! Characters logos cannot match are not dropped silently: their byte ranges are returned
//! separately so the indentation mapper can report them in source order.

use super::tokens::RawToken;
use logos::Logos;

/// Raw tokens paired with their byte ranges, plus the ranges logos could not match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTokens {
    pub tokens: Vec<(RawToken, logos::Span)>,
    pub unrecognized: Vec<logos::Span>,
}

/// Tokenize source code with location information
pub fn tokenize(source: &str) -> RawTokens {
    let mut lexer = RawToken::lexer(source);
    let mut raw = RawTokens::default();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => raw.tokens.push((token, lexer.span())),
            Err(()) => raw.unrecognized.push(lexer.span()),
        }
    }

    raw
}
