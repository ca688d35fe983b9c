//! Main module for the MathLingua front end

pub mod ast;
pub mod expression;
pub mod lexing;
pub mod parsing;
