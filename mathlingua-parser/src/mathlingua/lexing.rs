//! Structural lexer
//!
//!     This module orchestrates tokenization of the structural language. The lexer never
//!     aborts: every problem becomes a diagnostic and scanning continues with a synthesized
//!     token where one is needed (for example the missing closing quote of a statement).
//!
//! The Lexing Pipeline
//!
//!     The pipeline consists of:
//!         1. Core tokenization using the logos lexer. See [base_tokenization].
//!            Context-sensitive literals (strings, statements, ids, block comments, suffixed
//!            names) are finished by scanning callbacks in [tokens].
//!
//!         2. Indentation mapping. See [transformations::indentation].
//!            Layout tokens are dropped and replaced by `Begin`, `End` and `Linebreak`
//!            markers, and byte ranges become row/column locations.
//!
//! Indentation Handling
//!
//!     Indentation levels are two spaces wide. Logos emits one indent token per two spaces
//!     at any position; only the ones at the start of a line matter, and the mapper is the
//!     only place that interprets them. Keeping this out of the logos patterns lets the
//!     tokenizer stay a vanilla logos lexer and isolates the stateful part in one step.

pub mod base_tokenization;
pub mod common;
pub mod tokens;
pub mod transformations;

pub use base_tokenization::tokenize;
pub use common::{LexError, LexerOutput, Token, TokenKind};
use transformations::IndentationMapper;

/// Preprocesses source text to ensure it ends with a newline.
pub fn ensure_source_ends_with_newline(source: &str) -> String {
    if !source.ends_with('\n') {
        format!("{source}\n")
    } else {
        source.to_string()
    }
}

/// Run the full structural lexing pipeline over `source`.
pub fn lex(source: &str) -> LexerOutput {
    let source = ensure_source_ends_with_newline(source);
    let raw = tokenize(&source);
    let mut output = IndentationMapper::new().map(&source, raw);
    crate::mathlingua::ast::diagnostics::sort_by_location(&mut output.diagnostics);
    output
}
