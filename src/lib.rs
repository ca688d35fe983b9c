//! # mathlingua
//!
//! A compiler front end for MathLingua, a language for writing mathematical definitions,
//! theorems and axioms in a form both people and tools can read.
//!
//! This crate re-exports the workspace libraries:
//!
//!     parser     structural lexer/parser, expression parser, printers
//!     analysis   source collection, checks, type hierarchy, expansion, rendering
//!     config     layered configuration with embedded defaults
//!
//! The `mathlingua` binary lives in `mathlingua-cli`.

pub use mathlingua_analysis as analysis;
pub use mathlingua_config as config;
pub use mathlingua_parser as parser;

pub use mathlingua_analysis::{
    CollectionOptions, PathDiagnostic, RenderMode, RenderOptions, SourceCollection, TypeManager,
};
pub use mathlingua_config::{Loader, MathlinguaConfig};
pub use mathlingua_parser::{parse, Diagnostic, DiagnosticKind, Document, Location, Validation};
