//! Token stream transformations run after base tokenization

pub mod indentation;

pub use indentation::IndentationMapper;
