//! Indentation mapper
//!
//!     This mapper turns the flat raw token stream into the token stream the structural parser
//!     consumes. Layout tokens (newlines, indentation, spaces and line comments) disappear and
//!     are replaced by three synthetic markers:
//!
//!         - `Begin` at every newline that ends a content line
//!         - `End` whenever the following line returns to (or above) an enclosing level
//!         - `Linebreak` for a run of one or more blank lines
//!
//!     Every content line is therefore followed by a `Begin`. When the next line is nested
//!     deeper, that `Begin` stays open and encloses the nested lines; otherwise it is closed
//!     straight away by an `End`, giving the `Begin End` pair that separates sibling lines.
//!
//! Algorithm
//!
//!     Levels are tracked on a stack seeded with 0. A level is the number of two-space
//!     indents at the start of a line, plus one when the line's first token is `. `, since
//!     the content after `. ` sits one level deeper than the dot. When a content line starts
//!     after a newline:
//!        1. emit `Begin`
//!        2. if its level is at or above the top of the stack, pop the stack emitting `End`
//!           while there are open `Begin`s and the level is still at or above the top
//!        3. re-seed the stack with 0 if it emptied, then push the level
//!     A blank line resolves the pending newline at level 0 and then emits a single
//!     `Linebreak`. At end of input every still-open `Begin` is closed, so the output is
//!     always balanced.
//!
//!     Lines holding only a `--` comment are dropped entirely, newline included. A block
//!     comment owns the newline right after it, so the line that follows starts fresh
//!     without a `Begin`.

use crate::mathlingua::ast::{Diagnostic, Location, SourceLocation};
use crate::mathlingua::lexing::base_tokenization::RawTokens;
use crate::mathlingua::lexing::common::{LexError, LexerOutput, Token, TokenKind};
use crate::mathlingua::lexing::tokens::{RawToken, Scan};

const BEGIN_TEXT: &str = "<Indent>";
const END_TEXT: &str = "<Unindent>";
const LINEBREAK_TEXT: &str = "-";

/// What has been seen on the line currently being read
#[derive(Debug, Clone, Copy)]
struct LineState {
    at_start: bool,
    indent: usize,
    has_content: bool,
    comment_only: bool,
}

impl Default for LineState {
    fn default() -> Self {
        Self {
            at_start: true,
            indent: 0,
            has_content: false,
            comment_only: false,
        }
    }
}

/// A mapper that converts raw layout tokens into Begin/End/Linebreak markers.
pub struct IndentationMapper {
    levels: Vec<usize>,
    open: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl IndentationMapper {
    pub fn new() -> Self {
        Self {
            levels: vec![0],
            open: 0,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }
}

impl Default for IndentationMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentationMapper {
    /// Map raw tokens of `source` to located structural tokens.
    pub fn map(mut self, source: &str, raw: RawTokens) -> LexerOutput {
        let locator = SourceLocation::new(source);

        for span in &raw.unrecognized {
            let ch = source
                .get(span.clone())
                .and_then(|s| s.chars().next())
                .unwrap_or('\u{fffd}');
            self.diagnostics
                .push(LexError::UnrecognizedCharacter(ch).at(locator.locate(span.start)));
        }

        let mut line = LineState::default();
        // Location of the newline that ended the last content line, until the next line
        // tells us which level it opens.
        let mut pending: Option<Location> = None;

        for (raw_token, span) in raw.tokens {
            let location = locator.locate(span.start);
            match raw_token {
                RawToken::Newline => {
                    if line.has_content {
                        pending = Some(location);
                    } else if !line.comment_only {
                        if let Some(at) = pending.take() {
                            self.begin(at, 0);
                        }
                        self.linebreak(location);
                    }
                    line = LineState::default();
                }
                RawToken::Indent => {
                    if line.at_start {
                        line.indent += 1;
                    }
                }
                RawToken::Space => {}
                RawToken::LineComment => {
                    if !line.has_content {
                        line.comment_only = true;
                    }
                }
                content => {
                    if line.at_start {
                        line.at_start = false;
                        line.has_content = true;
                        let level = line.indent + usize::from(content == RawToken::DotSpace);
                        if let Some(at) = pending.take() {
                            self.begin(at, level);
                        }
                    }
                    let slice = source.get(span.clone()).unwrap_or_default();
                    self.push_content(content, slice, location);
                    if matches!(content, RawToken::BlockComment(_)) && slice.ends_with('\n') {
                        line = LineState::default();
                    }
                }
            }
        }

        let end = locator.end();
        if let Some(at) = pending.take() {
            self.begin(at, 0);
        }
        while self.open > 0 {
            self.tokens.push(Token::new(END_TEXT, TokenKind::End, end));
            self.open -= 1;
        }

        tracing::trace!(
            tokens = self.tokens.len(),
            diagnostics = self.diagnostics.len(),
            "mapped indentation"
        );

        LexerOutput {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn begin(&mut self, at: Location, level: usize) {
        self.tokens.push(Token::new(BEGIN_TEXT, TokenKind::Begin, at));
        self.open += 1;

        if self.levels.last().map_or(true, |top| level <= *top) {
            while self.open > 0 && self.levels.last().is_some_and(|top| level <= *top) {
                self.tokens.push(Token::new(END_TEXT, TokenKind::End, at));
                self.open -= 1;
                self.levels.pop();
            }
            if self.levels.is_empty() {
                self.levels.push(0);
            }
        }
        self.levels.push(level);
    }

    fn linebreak(&mut self, at: Location) {
        match self.tokens.last() {
            None => {}
            Some(last) if last.kind == TokenKind::Linebreak => {}
            Some(_) => self
                .tokens
                .push(Token::new(LINEBREAK_TEXT, TokenKind::Linebreak, at)),
        }
    }

    fn push_content(&mut self, raw: RawToken, slice: &str, location: Location) {
        let (kind, text) = match raw {
            RawToken::Name(scan) => {
                if let Scan::Malformed(message) = scan {
                    self.diagnostics
                        .push(LexError::MalformedName(message).at(location));
                }
                (TokenKind::Name, slice.to_string())
            }
            RawToken::Placeholder => (TokenKind::Name, slice.to_string()),
            RawToken::Operator => (TokenKind::Operator, slice.to_string()),
            RawToken::Str(scan) => (
                TokenKind::String,
                self.close(scan, slice, "\"", LexError::UnterminatedString, location),
            ),
            RawToken::Statement(scan) => (
                TokenKind::Statement,
                self.close(scan, slice, "'", LexError::UnterminatedStatement, location),
            ),
            RawToken::Id(scan) => (
                TokenKind::Id,
                self.close(scan, slice, "]", LexError::UnterminatedId, location),
            ),
            RawToken::BlockComment(scan) => {
                let body = slice.strip_suffix('\n').unwrap_or(slice);
                (
                    TokenKind::BlockComment,
                    self.close(scan, body, "::", LexError::UnterminatedBlockComment, location),
                )
            }
            RawToken::ColonEquals => (TokenKind::ColonEquals, slice.to_string()),
            RawToken::Colon => (TokenKind::Colon, slice.to_string()),
            RawToken::Comma => (TokenKind::Comma, slice.to_string()),
            RawToken::LParen => (TokenKind::LParen, slice.to_string()),
            RawToken::RParen => (TokenKind::RParen, slice.to_string()),
            RawToken::LCurly => (TokenKind::LCurly, slice.to_string()),
            RawToken::RCurly => (TokenKind::RCurly, slice.to_string()),
            RawToken::DotSpace => (TokenKind::DotSpace, slice.to_string()),
            RawToken::DotDotDot => (TokenKind::DotDotDot, slice.to_string()),
            RawToken::Underscore => (TokenKind::Underscore, slice.to_string()),
            RawToken::Equals => (TokenKind::Equals, slice.to_string()),
            RawToken::Newline | RawToken::Indent | RawToken::Space | RawToken::LineComment => {
                return
            }
        };
        self.tokens.push(Token::new(text, kind, location));
    }

    /// Synthesize the closing delimiter of an unterminated literal.
    fn close(
        &mut self,
        scan: Scan,
        slice: &str,
        closer: &str,
        error: LexError,
        location: Location,
    ) -> String {
        match scan {
            Scan::Unterminated => {
                self.diagnostics.push(error.at(location));
                format!("{slice}{closer}")
            }
            Scan::Complete | Scan::Malformed(_) => slice.to_string(),
        }
    }
}
