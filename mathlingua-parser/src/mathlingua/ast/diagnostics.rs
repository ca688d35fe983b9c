//! Diagnostics reported by the front end
//!
//! A [`Diagnostic`] is the shape every problem takes once it leaves a stage: a message and
//! the 0-based row/column it refers to. The [`DiagnosticKind`] records which stage produced
//! it, mirroring the error taxonomy of the language:
//!
//! 1. **Lex**: unterminated literals, unrecognized characters, malformed names
//! 2. **Structural**: missing/duplicate/misordered sections, wrong argument shapes
//! 3. **Expression**: unmatched brackets, empty parameters, malformed commands
//! 4. **Semantic**: cross-file problems found by the source collection
//!
//! Paths and severities are attached by whoever presents the diagnostics to a user.

use super::location::Location;
use serde::Serialize;
use std::fmt;

/// The stage of the front end a diagnostic originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    Lex,
    Structural,
    Expression,
    Semantic,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Lex => write!(f, "lex"),
            DiagnosticKind::Structural => write!(f, "structural"),
            DiagnosticKind::Expression => write!(f, "expression"),
            DiagnosticKind::Semantic => write!(f, "semantic"),
        }
    }
}

/// A located problem found in source text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub row: i32,
    pub column: i32,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            row: location.row,
            column: location.column,
            kind,
        }
    }

    pub fn lex(message: impl Into<String>, location: Location) -> Self {
        Self::new(DiagnosticKind::Lex, message, location)
    }

    pub fn structural(message: impl Into<String>, location: Location) -> Self {
        Self::new(DiagnosticKind::Structural, message, location)
    }

    pub fn expression(message: impl Into<String>, location: Location) -> Self {
        Self::new(DiagnosticKind::Expression, message, location)
    }

    pub fn semantic(message: impl Into<String>, location: Location) -> Self {
        Self::new(DiagnosticKind::Semantic, message, location)
    }

    pub fn location(&self) -> Location {
        Location::new(self.row, self.column)
    }

    /// Re-anchor a diagnostic found inside embedded text at `origin` in the enclosing file.
    pub fn offset_by(mut self, origin: Location) -> Self {
        let shifted = self.location().offset_by(origin);
        self.row = shifted.row;
        self.column = shifted.column;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.message, self.row + 1, self.column + 1)
    }
}

/// Sort diagnostics by position, keeping the discovery order for ties.
pub fn sort_by_location(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| (d.row, d.column));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_based() {
        let diagnostic = Diagnostic::lex("Unrecognized character $", Location::new(0, 4));
        assert_eq!(diagnostic.to_string(), "Unrecognized character $ (1, 5)");
    }

    #[test]
    fn test_offset_by_moves_into_file_coordinates() {
        let diagnostic = Diagnostic::expression("Expected a closing bracket", Location::new(0, 2))
            .offset_by(Location::new(7, 5));
        assert_eq!(diagnostic.location(), Location::new(7, 7));
        assert_eq!(diagnostic.kind, DiagnosticKind::Expression);
    }

    #[test]
    fn test_serializes_kind_in_snake_case() {
        let diagnostic = Diagnostic::semantic("Undefined signature '\\foo'", Location::new(1, 0));
        let json = serde_json::to_value(&diagnostic).expect("diagnostic to serialize");
        assert_eq!(json["kind"], "semantic");
        assert_eq!(json["row"], 1);
    }

    #[test]
    fn test_sort_by_location_is_stable() {
        let mut diagnostics = vec![
            Diagnostic::lex("b", Location::new(2, 0)),
            Diagnostic::lex("a1", Location::new(1, 3)),
            Diagnostic::lex("a2", Location::new(1, 3)),
        ];
        sort_by_location(&mut diagnostics);
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["a1", "a2", "b"]);
    }
}
