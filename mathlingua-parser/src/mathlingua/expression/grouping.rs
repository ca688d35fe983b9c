//! Bracket grouping
//!
//! Matched bracket pairs are folded into [`TokenTree::Group`] nodes so the parser can treat
//! `(...)`, `[...]`, `{...}` and `[:...:]` as single units. An opening bracket that is
//! never closed keeps everything after it and gets a `None` closer; a closer with no
//! opener is dropped. Both cases are reported.

use super::tokens::{ExprToken, ExprTokenKind};
use crate::mathlingua::ast::{Diagnostic, Location};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenTree {
    Leaf(ExprToken),
    Group {
        open: ExprToken,
        items: Vec<TokenTree>,
        close: Option<ExprToken>,
    },
}

impl TokenTree {
    pub fn location(&self) -> Location {
        match self {
            TokenTree::Leaf(token) => token.location(),
            TokenTree::Group { open, .. } => open.location(),
        }
    }

    /// The token kind of a leaf, or of a group's opening bracket
    pub fn kind(&self) -> ExprTokenKind {
        match self {
            TokenTree::Leaf(token) => token.kind,
            TokenTree::Group { open, .. } => open.kind,
        }
    }

    pub fn is_leaf(&self, kind: ExprTokenKind) -> bool {
        matches!(self, TokenTree::Leaf(token) if token.kind == kind)
    }

    pub fn is_group(&self, kind: ExprTokenKind) -> bool {
        matches!(self, TokenTree::Group { open, .. } if open.kind == kind)
    }

    pub fn text(&self) -> &str {
        match self {
            TokenTree::Leaf(token) => &token.text,
            TokenTree::Group { open, .. } => &open.text,
        }
    }
}

struct OpenGroup {
    open: ExprToken,
    items: Vec<TokenTree>,
}

pub fn group_tokens(tokens: Vec<ExprToken>, diagnostics: &mut Vec<Diagnostic>) -> Vec<TokenTree> {
    let mut root: Vec<TokenTree> = Vec::new();
    let mut stack: Vec<OpenGroup> = Vec::new();

    for token in tokens {
        if token.kind.is_opening() {
            stack.push(OpenGroup {
                open: token,
                items: Vec::new(),
            });
        } else if token.kind.is_closing() {
            let matches_top = stack
                .last()
                .is_some_and(|top| top.open.kind.closer() == Some(token.kind));
            if matches_top {
                if let Some(group) = stack.pop() {
                    let tree = TokenTree::Group {
                        open: group.open,
                        items: group.items,
                        close: Some(token),
                    };
                    push(&mut stack, &mut root, tree);
                }
            } else if stack
                .iter()
                .any(|open| open.open.kind.closer() == Some(token.kind))
            {
                // Close the unterminated brackets in between, then the matching one.
                while let Some(group) = stack.pop() {
                    let done = group.open.kind.closer() == Some(token.kind);
                    let close = if done {
                        Some(token.clone())
                    } else {
                        diagnostics.push(Diagnostic::expression(
                            "Expected a closing bracket",
                            group.open.location(),
                        ));
                        None
                    };
                    let tree = TokenTree::Group {
                        open: group.open,
                        items: group.items,
                        close,
                    };
                    push(&mut stack, &mut root, tree);
                    if done {
                        break;
                    }
                }
            } else {
                diagnostics.push(Diagnostic::expression(
                    format!("Unexpected closing bracket {}", token.text),
                    token.location(),
                ));
            }
        } else {
            push(&mut stack, &mut root, TokenTree::Leaf(token));
        }
    }

    while let Some(group) = stack.pop() {
        diagnostics.push(Diagnostic::expression(
            "Expected a closing bracket",
            group.open.location(),
        ));
        let tree = TokenTree::Group {
            open: group.open,
            items: group.items,
            close: None,
        };
        push(&mut stack, &mut root, tree);
    }

    root
}

fn push(stack: &mut [OpenGroup], root: &mut Vec<TokenTree>, tree: TokenTree) {
    match stack.last_mut() {
        Some(top) => top.items.push(tree),
        None => root.push(tree),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mathlingua::expression::lexer::lex_expression;

    fn group(text: &str) -> (Vec<TokenTree>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let trees = group_tokens(lex_expression(text).tokens, &mut diagnostics);
        (trees, diagnostics)
    }

    #[test]
    fn test_nested_groups() {
        let (trees, diagnostics) = group("f(x, {y})");
        assert!(diagnostics.is_empty());
        assert_eq!(trees.len(), 2);
        match &trees[1] {
            TokenTree::Group { items, close, .. } => {
                assert_eq!(items.len(), 3);
                assert!(items[2].is_group(ExprTokenKind::LCurly));
                assert!(close.is_some());
            }
            other => panic!("expected a group, found {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_bracket_gets_null_closer() {
        let (trees, diagnostics) = group("f(x");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Expected a closing bracket");
        assert!(matches!(&trees[1], TokenTree::Group { close: None, .. }));
    }

    #[test]
    fn test_stray_closer_is_reported() {
        let (trees, diagnostics) = group("x)");
        assert_eq!(trees.len(), 1);
        assert_eq!(diagnostics[0].message, "Unexpected closing bracket )");
    }

    #[test]
    fn test_mismatched_closer_closes_outer_group() {
        let (trees, diagnostics) = group("(a[b)");
        assert_eq!(trees.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(&trees[0], TokenTree::Group { close: Some(_), .. }));
    }
}
