//! # mathlingua-parser
//!
//! Front end for the MathLingua language.
//!
//! MathLingua is made of two nested grammars. The outer, indentation-sensitive "structural"
//! language arranges groups, sections and arguments; the inner "expression" language lives
//! inside quoted statements (`'x is \set'`) and describes the mathematics itself.
//!
//! File Layout
//!
//!     src/mathlingua
//!       ├── ast          Locations, diagnostics and the Validation result shape
//!       ├── lexing       Structural lexer (logos tokens + indentation mapping)
//!       ├── parsing      Phase-1 tree building and phase-2 typed validation
//!       └── expression   Lexer and parser for the statement language
//!
//! The single entry point most callers need is [`mathlingua::parsing::parse`], which takes
//! source text and returns a `Validation<Document>`.

pub mod mathlingua;

pub use mathlingua::ast::{Diagnostic, DiagnosticKind, Location, Validation};
pub use mathlingua::parsing::{parse, Document};
