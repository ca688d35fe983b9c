//! Structural parsing
//!
//!     Parsing runs in two phases over the token stream produced by [`lexing`]:
//!
//!         1. [`tree_builder`] builds a generic [`tree`] of groups, sections and arguments,
//!            knowing nothing about which sections a group may have.
//!         2. [`document`] validates each group against its declared section shape and
//!            converts it into typed nodes ([`groups`], [`clauses`], [`nodes`]). Statements
//!            are handed to the expression parser on the way.
//!
//!     Both phases recover from errors and keep going, so one pass reports as many
//!     diagnostics as possible. The result is still all-or-nothing: [`parse`] returns a
//!     document only when no lexical or structural diagnostic was found. Diagnostics inside
//!     statements stay on the statements themselves.
//!
//!     The reverse direction lives in [`printer`] (layout) and [`writer`] (plain or HTML
//!     output); [`normalize`] strips locations for structural comparison.
//!
//! [`lexing`]: crate::mathlingua::lexing

pub mod clauses;
pub mod document;
pub mod groups;
pub mod nodes;
pub mod normalize;
pub mod printer;
pub mod sections;
pub mod tree;
pub mod tree_builder;
pub mod writer;

pub use clauses::{Clause, ClauseList};
pub use document::{validate_document, Definition, Document, Signature, TopLevelGroup};
pub use nodes::{Id, Statement, StringList, TargetList, Text};
pub use normalize::Locatable;
pub use printer::StatementRenderer;
pub use sections::ValidationContext;
pub use writer::{CodeWriter, HtmlWriter, PlainWriter};

use crate::mathlingua::ast::{sort_by_location, Validation};
use crate::mathlingua::lexing::lex;
use tree_builder::build_tree;

/// Parse a MathLingua file into a typed document.
pub fn parse(source: &str) -> Validation<Document> {
    let lexed = lex(source);
    let token_count = lexed.tokens.len();
    let (root, tree_diagnostics) = build_tree(&lexed.tokens);

    let mut ctx = ValidationContext::new();
    let document = validate_document(&root, &mut ctx);

    let mut diagnostics = lexed.diagnostics;
    diagnostics.extend(tree_diagnostics);
    diagnostics.extend(ctx.into_diagnostics());
    sort_by_location(&mut diagnostics);

    tracing::debug!(
        tokens = token_count,
        groups = document.groups.len(),
        diagnostics = diagnostics.len(),
        "parsed document"
    );
    Validation::from_parts(document, diagnostics)
}
