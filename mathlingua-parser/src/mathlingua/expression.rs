//! Statement language
//!
//!     Statements are the quoted parts of a document (`'x is \set'`) and the contents of ids
//!     (`[\function{f}]`). They are parsed separately from the structural layout, after the
//!     structural parser has located them:
//!
//!         1. [lexer] scans the text into [tokens] with logos
//!         2. [grouping] folds matched brackets into token trees
//!         3. [parser] splits on relations and climbs operator [precedence]
//!
//!     The result is an [`Expression`] from [nodes] plus diagnostics located relative to the
//!     statement text. [printer] turns a tree back into canonical text.

pub mod grouping;
pub mod lexer;
pub mod nodes;
pub mod parser;
pub mod precedence;
pub mod printer;
pub mod tokens;

pub use nodes::{
    Assignment, CommandExpression, Expression, Function, FunctionCall, Grouped, NameExpression,
    NamedGroup, Operation, Operator, Prefix, Relation, RelationKind, Set, TextExpression, Tuple,
};
pub use parser::parse_expression;
