//! Shared building blocks for every stage of the front end
//!
//!     Every node produced by the lexer, the structural parser and the expression parser
//!     carries a [`Location`]. Problems found along the way are reported as [`Diagnostic`]
//!     values rather than returned as errors, so a single pass can report everything that
//!     is wrong with a file. Stages that either fully succeed or fully fail expose their
//!     result as a [`Validation`].

pub mod diagnostics;
pub mod location;
pub mod validation;

pub use diagnostics::{sort_by_location, Diagnostic, DiagnosticKind};
pub use location::{Location, SourceLocation};
pub use validation::Validation;
