//! Position tracking for source locations
//!
//! ## Types
//!
//! - [`Location`] - A 0-based row:column position in source text
//! - [`SourceLocation`] - Utility for converting byte offsets to locations
//!
//! ## Key Design
//!
//! - **Mandatory locations**: every token and AST node carries a `Location`
//! - **Sentinel for normalization**: [`Location::SENTINEL`] (`-1:-1`) replaces real positions
//!   when nodes are normalized for location-independent comparison
//! - **Character columns**: columns count `char`s, not bytes, so multi-byte text reports the
//!   column a user sees
//! - **Efficient conversion**: O(log n) binary search for byte-to-location conversion
//!
//! The typical flow is:
//! 1. logos produces `(Token, std::ops::Range<usize>)` pairs (byte offsets)
//! 2. The lexer converts byte offsets with [`SourceLocation::locate`]
//! 3. Nodes store the resulting `Location` for error reporting and tooling

use serde::Serialize;
use std::fmt;

/// A 0-based row and column in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Location {
    pub row: i32,
    pub column: i32,
}

impl Location {
    /// The location every node carries once normalized.
    pub const SENTINEL: Location = Location {
        row: -1,
        column: -1,
    };

    pub fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    /// Translate a location relative to some embedded text (for example the inside of a
    /// quoted statement) into the coordinates of the enclosing file.
    ///
    /// `origin` is where the embedded text starts. Columns are only shifted on the first
    /// row since later rows restart at the left margin. The result never goes negative.
    pub fn offset_by(&self, origin: Location) -> Location {
        let row = self.row + origin.row;
        let column = if self.row == 0 {
            self.column + origin.column
        } else {
            self.column
        };
        Location::new(row.max(0), column.max(0))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// Provides fast conversion from byte offsets to row/column locations
pub struct SourceLocation<'a> {
    source: &'a str,
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl<'a> SourceLocation<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset to a row/column location
    pub fn locate(&self, byte_offset: usize) -> Location {
        let byte_offset = byte_offset.min(self.source.len());
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i.saturating_sub(1));

        let start = self.line_starts[line];
        let column = self
            .source
            .get(start..byte_offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(byte_offset - start);

        Location::new(line as i32, column as i32)
    }

    /// The location one past the last character of the source
    pub fn end(&self) -> Location {
        self.locate(self.source.len())
    }

    /// Get the total number of lines in the source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_first_line() {
        let source = SourceLocation::new("abc\ndef");
        assert_eq!(source.locate(0), Location::new(0, 0));
        assert_eq!(source.locate(2), Location::new(0, 2));
    }

    #[test]
    fn test_locate_after_newline() {
        let source = SourceLocation::new("abc\ndef");
        assert_eq!(source.locate(4), Location::new(1, 0));
        assert_eq!(source.locate(6), Location::new(1, 2));
        assert_eq!(source.line_count(), 2);
    }

    #[test]
    fn test_columns_count_characters() {
        let source = SourceLocation::new("αβ x");
        // 'x' starts at byte 5 but is the fourth character
        assert_eq!(source.locate(5), Location::new(0, 3));
    }

    #[test]
    fn test_offset_by_shifts_first_row_only() {
        let origin = Location::new(4, 10);
        assert_eq!(Location::new(0, 3).offset_by(origin), Location::new(4, 13));
        assert_eq!(Location::new(2, 3).offset_by(origin), Location::new(6, 3));
    }

    #[test]
    fn test_offset_by_clamps_negative_values() {
        let shifted = Location::new(0, 2).offset_by(Location::SENTINEL);
        assert_eq!(shifted, Location::new(0, 1));
        assert_eq!(Location::SENTINEL.offset_by(Location::SENTINEL), Location::new(0, 0));
    }
}
