//! Error types for operations that can genuinely fail
//!
//! Findings about the corpus (duplicate signatures, bad references, ...) are not errors in
//! this sense; they are reported as [`Diagnostic`](mathlingua_parser::Diagnostic) values by
//! the checks.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    #[error("Expected {expected} argument(s) for '{signature}' but found {found}")]
    ArityMismatch {
        signature: String,
        expected: usize,
        found: usize,
    },

    #[error("Unable to parse expanded text '{text}'")]
    Unparsable { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("Unknown path '{0}'")]
    UnknownPath(String),

    #[error("Unknown signature '{0}'")]
    UnknownSignature(String),

    #[error("No top-level group at index {index} in '{path}'")]
    UnknownGroup { path: String, index: usize },

    #[error("'{0}' did not parse")]
    InvalidSource(String),
}
