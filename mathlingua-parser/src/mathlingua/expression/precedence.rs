//! Infix operator precedence
//!
//! Binary operators are resolved by precedence climbing over this table. Every binary
//! operator is left-associative, and anything not listed (including infix commands such as
//! `\op/`) shares [`DEFAULT_PRECEDENCE`].

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const DEFAULT_PRECEDENCE: u8 = 40;

static PRECEDENCE: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| {
    HashMap::from([
        ("->", 10),
        ("=>", 10),
        ("<=>", 10),
        ("||", 20),
        ("&&", 25),
        ("<", 30),
        (">", 30),
        ("<=", 30),
        (">=", 30),
        ("==", 30),
        ("+", 50),
        ("-", 50),
        ("*", 60),
        ("/", 60),
        ("%", 60),
    ])
});

pub fn precedence_of(operator: &str) -> u8 {
    PRECEDENCE
        .get(operator)
        .copied()
        .unwrap_or(DEFAULT_PRECEDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_default_precedence() {
        assert!(precedence_of("*") > precedence_of("+"));
        assert!(precedence_of("+") > precedence_of("<"));
        assert_eq!(precedence_of("\\oplus/"), DEFAULT_PRECEDENCE);
        assert_eq!(precedence_of("~"), DEFAULT_PRECEDENCE);
    }
}
