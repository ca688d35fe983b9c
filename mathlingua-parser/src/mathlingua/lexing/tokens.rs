//! Raw token definitions for the structural language
//!
//! This module defines the tokens produced by the logos lexer before any indentation
//! handling. Most tokens are plain `#[token]`/`#[regex]` patterns. The literals whose extent
//! depends on context (quoted strings and statements, bracketed ids, block comments and
//! suffixed names) are matched by their opening characters and finished by a callback that
//! scans the remainder of the input. Those callbacks never fail: they report how the scan
//! went through [`Scan`] so that the caller can record a diagnostic and keep going.
use logos::{Lexer, Logos};

/// How a context-sensitive literal ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    Complete,
    /// Input ran out (or a line ended, for ids) before the closing delimiter
    Unterminated,
    /// The literal is usable but its suffix is malformed
    Malformed(&'static str),
}

/// All raw tokens of the structural language
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken {
    #[token("\n")]
    Newline,

    // One indentation level is exactly two spaces
    #[token("  ")]
    Indent,

    #[regex(r"[ \t\r\f]")]
    Space,

    #[regex(r"--[^\n]*", priority = 10)]
    LineComment,

    #[token("::", block_comment)]
    BlockComment(Scan),

    #[token("\"", string_literal)]
    Str(Scan),

    #[token("'", statement_literal)]
    Statement(Scan),

    #[token("[", id_literal)]
    Id(Scan),

    #[regex(r"[a-zA-Z0-9]+", name_suffix)]
    Name(Scan),

    #[token("?")]
    Placeholder,

    #[regex(r"[~!@%^&*\-+<>\\/=]+", operator_suffix)]
    Operator,

    #[token(":=")]
    ColonEquals,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LCurly,

    #[token("}")]
    RCurly,

    #[token(". ")]
    DotSpace,

    #[token("...")]
    DotDotDot,

    #[token("_")]
    Underscore,

    #[token("=", priority = 3)]
    Equals,
}

impl RawToken {
    /// Tokens that only shape layout and never reach the parser as content
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            RawToken::Newline | RawToken::Indent | RawToken::Space | RawToken::LineComment
        )
    }
}

fn quoted(lex: &mut Lexer<RawToken>, quote: char) -> Scan {
    let remainder = lex.remainder();
    match remainder.find(quote) {
        Some(end) => {
            lex.bump(end + quote.len_utf8());
            Scan::Complete
        }
        None => {
            lex.bump(remainder.len());
            Scan::Unterminated
        }
    }
}

fn string_literal(lex: &mut Lexer<RawToken>) -> Scan {
    quoted(lex, '"')
}

fn statement_literal(lex: &mut Lexer<RawToken>) -> Scan {
    quoted(lex, '\'')
}

/// Scan an id with balanced bracket counting. Ids never span lines.
fn id_literal(lex: &mut Lexer<RawToken>) -> Scan {
    let remainder = lex.remainder();
    let mut depth = 1usize;
    let mut outcome = None;
    for (offset, ch) in remainder.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    outcome = Some((offset + 1, Scan::Complete));
                    break;
                }
            }
            '\n' => {
                outcome = Some((offset, Scan::Unterminated));
                break;
            }
            _ => {}
        }
    }
    let (consumed, scan) = outcome.unwrap_or((remainder.len(), Scan::Unterminated));
    lex.bump(consumed);
    scan
}

/// Scan a `::...::` block comment, where `{::}` stands for a literal `::`.
/// The newline directly after the closing `::` belongs to the comment.
fn block_comment(lex: &mut Lexer<RawToken>) -> Scan {
    let remainder = lex.remainder();
    let mut offset = 0;
    while offset < remainder.len() {
        let rest = &remainder[offset..];
        if rest.starts_with("{::}") {
            offset += 4;
            continue;
        }
        if rest.starts_with("::") {
            let mut consumed = offset + 2;
            if remainder[consumed..].starts_with('\n') {
                consumed += 1;
            }
            lex.bump(consumed);
            return Scan::Complete;
        }
        offset += rest.chars().next().map_or(1, char::len_utf8);
    }
    lex.bump(remainder.len());
    Scan::Unterminated
}

/// Names may carry one of the suffixes `?`, `#<digits>`, `...` or `...#name...`.
fn name_suffix(lex: &mut Lexer<RawToken>) -> Scan {
    let rest = lex.remainder();

    if rest.starts_with('?') {
        lex.bump(1);
        return Scan::Complete;
    }

    if let Some(after) = rest.strip_prefix('#') {
        let digits = after.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            lex.bump(1);
            return Scan::Malformed("Expected digits after '#'");
        }
        lex.bump(1 + digits);
        return Scan::Complete;
    }

    if let Some(after) = rest.strip_prefix("...") {
        if let Some(tail) = after.strip_prefix('#') {
            let name_len = tail
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .count();
            if name_len > 0 && tail[name_len..].starts_with("...") {
                lex.bump(3 + 1 + name_len + 3);
                return Scan::Complete;
            }
            lex.bump(4);
            return Scan::Malformed("Expected a name followed by '...' after '#'");
        }
        lex.bump(3);
    }

    Scan::Complete
}

/// Operator names may carry a `_name` suffix, as in `+_left`.
fn operator_suffix(lex: &mut Lexer<RawToken>) -> bool {
    let rest = lex.remainder();
    if let Some(after) = rest.strip_prefix('_') {
        let len = after
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .count();
        if len > 0 {
            lex.bump(1 + len);
        }
    }
    true
}
