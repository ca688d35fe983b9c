//! # mathlingua-analysis
//!
//! Everything that needs more than one file at a time.
//!
//! File Layout
//!
//!     src
//!       ├── source       A parsed file and its error report
//!       ├── collection   The cross-file index, its checks and rendering
//!       ├── types        is-a and viewable-as relations between signatures
//!       ├── expansion    `written:` templates and definitional inlining
//!       ├── analyzer     Per-group symbol analysis plugged into the checks
//!       ├── usage        Which signatures and names a statement references
//!       ├── completion   Prefix trie for autocomplete
//!       ├── search       Word index for search
//!       └── paths        Natural ordering of numbered content paths
//!
//! A typical caller builds a [`SourceCollection`] from in-memory file contents, runs
//! [`SourceCollection::check`], and renders groups with [`SourceCollection::render`]. All
//! file system access stays with the caller.

pub mod analyzer;
pub mod collection;
pub mod completion;
pub mod error;
pub mod expansion;
pub mod paths;
pub mod search;
pub mod source;
pub mod types;
pub mod usage;

pub use analyzer::{ShapeAnalyzer, SymbolAnalyzer};
pub use collection::{
    CollectionOptions, GroupRef, LocatedGroup, PathDiagnostic, RenderMode, RenderOptions,
    SharedSourceCollection, SignatureKind, SourceCollection,
};
pub use error::{CollectionError, ExpansionError};
pub use expansion::{ExpansionEngine, FixedPoint};
pub use paths::{natural_cmp, sort_paths};
pub use source::SourceFile;
pub use types::TypeManager;
