//! Statement parser
//!
//!     Parsing works on the bracket-grouped token trees from [super::grouping]. The top level
//!     is split in a fixed order, each split binding looser than the next:
//!
//!         1. `:=`                   -> Assignment
//!         2. `is`, `in`, `not in`   -> Relation
//!         3. `=`, `!=`              -> Relation
//!         4. `as`                   -> Relation
//!
//!     Each side of a relation is a comma-separated operand list. What remains after the
//!     splits is a run of terms and operators, resolved by precedence climbing over the
//!     table in [super::precedence].
//!
//!     The parser never fails outright. Anything malformed becomes [`Expression::Empty`]
//!     with a diagnostic, and parsing carries on with the next piece.

use super::grouping::{group_tokens, TokenTree};
use super::lexer::lex_expression;
use super::nodes::{
    Assignment, CommandExpression, Expression, Function, FunctionCall, Grouped, NameExpression,
    NamedGroup, Operation, Operator, Prefix, Relation, RelationKind, Set, TextExpression, Tuple,
};
use super::precedence::precedence_of;
use super::tokens::ExprTokenKind;
use crate::mathlingua::ast::diagnostics::sort_by_location;
use crate::mathlingua::ast::{Diagnostic, Location};
use std::iter::Peekable;
use std::vec::IntoIter;

const SPLITS: [&[ExprTokenKind]; 3] = [
    &[ExprTokenKind::Is, ExprTokenKind::In, ExprTokenKind::NotIn],
    &[ExprTokenKind::Equals, ExprTokenKind::NotEquals],
    &[ExprTokenKind::As],
];

/// Parse statement text, returning the tree and every problem found.
pub fn parse_expression(text: &str) -> (Expression, Vec<Diagnostic>) {
    let lexed = lex_expression(text);
    let mut diagnostics = lexed.diagnostics;
    let trees = group_tokens(lexed.tokens, &mut diagnostics);

    let mut parser = ExpressionParser { diagnostics };
    let expression = parser.expression(&trees, Location::default());
    let mut diagnostics = parser.diagnostics;
    sort_by_location(&mut diagnostics);
    (expression, diagnostics)
}

enum Piece {
    Operand(Expression),
    Operator(Operator),
}

struct ExpressionParser {
    diagnostics: Vec<Diagnostic>,
}

impl ExpressionParser {
    fn error(&mut self, message: impl Into<String>, location: Location) {
        self.diagnostics
            .push(Diagnostic::expression(message, location));
    }

    fn empty(&mut self, at: Location) -> Expression {
        self.error("Expected an expression", at);
        Expression::Empty(at)
    }

    fn expression(&mut self, items: &[TokenTree], at: Location) -> Expression {
        let split = items
            .iter()
            .position(|item| item.is_leaf(ExprTokenKind::ColonEquals));
        match split {
            Some(index) => {
                let operator = items[index].location();
                let lhs = self.split_level(&items[..index], at, 0);
                let rhs = self.expression(&items[index + 1..], operator);
                Expression::Assignment(Assignment {
                    location: lhs.location(),
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                })
            }
            None => self.split_level(items, at, 0),
        }
    }

    fn split_level(&mut self, items: &[TokenTree], at: Location, level: usize) -> Expression {
        let Some(kinds) = SPLITS.get(level) else {
            return self.operation(items, at);
        };
        let is_split = |item: &TokenTree| kinds.iter().any(|kind| item.is_leaf(*kind));

        let Some(index) = items.iter().position(is_split) else {
            return self.split_level(items, at, level + 1);
        };

        let operator = &items[index];
        let kind = relation_kind(operator.kind());
        let lhs = self.operands(&items[..index], at, level + 1);
        let rest = &items[index + 1..];
        let rhs = if rest.iter().any(is_split) {
            vec![self.split_level(rest, operator.location(), level)]
        } else {
            self.operands(rest, operator.location(), level + 1)
        };

        Expression::Relation(Relation {
            kind,
            location: lhs.first().map_or(operator.location(), Expression::location),
            lhs,
            rhs,
        })
    }

    /// A comma-separated operand list below `level`
    fn operands(&mut self, items: &[TokenTree], at: Location, level: usize) -> Vec<Expression> {
        if items.is_empty() {
            return vec![self.empty(at)];
        }
        split_commas(items, at)
            .into_iter()
            .map(|(segment, location)| {
                if segment.is_empty() {
                    self.error("Unexpected empty parameter", location);
                    Expression::Empty(location)
                } else {
                    self.split_level(segment, location, level)
                }
            })
            .collect()
    }

    /// The contents of a bracket group: full expressions separated by commas
    fn comma_list(&mut self, items: &[TokenTree], at: Location) -> Vec<Expression> {
        if items.is_empty() {
            return Vec::new();
        }
        split_commas(items, at)
            .into_iter()
            .map(|(segment, location)| {
                if segment.is_empty() {
                    self.error("Unexpected empty parameter", location);
                    Expression::Empty(location)
                } else {
                    self.expression(segment, location)
                }
            })
            .collect()
    }

    fn operation(&mut self, items: &[TokenTree], at: Location) -> Expression {
        let pieces = self.pieces(items);
        if pieces.is_empty() {
            return self.empty(at);
        }

        let mut pieces = pieces.into_iter().peekable();
        let expression = self.climb(&mut pieces, 0, at);
        if let Some(Piece::Operand(extra)) = pieces.next() {
            self.error("Expected an operator", extra.location());
        }
        expression
    }

    fn climb(
        &mut self,
        pieces: &mut Peekable<IntoIter<Piece>>,
        min_precedence: u8,
        at: Location,
    ) -> Expression {
        let mut lhs = self.primary(pieces, at);
        loop {
            let precedence = match pieces.peek() {
                Some(Piece::Operator(operator)) => precedence_of(&operator.text()),
                _ => break,
            };
            if precedence < min_precedence {
                break;
            }
            let Some(Piece::Operator(operator)) = pieces.next() else {
                break;
            };
            let rhs = self.climb(pieces, precedence.saturating_add(1), operator.location());
            lhs = Expression::Operation(Operation {
                location: lhs.location(),
                operator,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }
        lhs
    }

    fn primary(&mut self, pieces: &mut Peekable<IntoIter<Piece>>, at: Location) -> Expression {
        match pieces.next() {
            Some(Piece::Operand(expression)) => expression,
            Some(Piece::Operator(operator)) => {
                let location = operator.location();
                let operand = self.primary(pieces, location);
                Expression::Prefix(Prefix {
                    operator,
                    operand: Box::new(operand),
                    location,
                })
            }
            None => self.empty(at),
        }
    }

    fn pieces(&mut self, items: &[TokenTree]) -> Vec<Piece> {
        let mut pieces = Vec::new();
        let mut i = 0;
        while i < items.len() {
            let item = &items[i];
            match item {
                TokenTree::Leaf(token) if token.kind == ExprTokenKind::Operator => {
                    pieces.push(Piece::Operator(Operator::Symbol {
                        text: token.text.clone(),
                        location: token.location(),
                    }));
                    i += 1;
                }
                TokenTree::Leaf(token) if token.kind == ExprTokenKind::Backslash => {
                    let (command, next) = self.command(items, i);
                    i = next;
                    let infix = items
                        .get(i)
                        .is_some_and(|t| t.is_leaf(ExprTokenKind::Operator) && t.text() == "/");
                    if infix {
                        i += 1;
                        pieces.push(Piece::Operator(Operator::Command(command)));
                    } else {
                        pieces.push(Piece::Operand(command_to_expression(command)));
                    }
                }
                TokenTree::Leaf(token) if token.kind == ExprTokenKind::Name => {
                    let (expression, next) = self.name_term(items, i);
                    pieces.push(Piece::Operand(expression));
                    i = next;
                }
                TokenTree::Leaf(token) if token.kind == ExprTokenKind::Text => {
                    let text = token.text.trim_start_matches('"').trim_end_matches('"');
                    pieces.push(Piece::Operand(Expression::Text(TextExpression {
                        text: text.to_string(),
                        location: token.location(),
                    })));
                    i += 1;
                }
                TokenTree::Group { open, items: inner, .. } => {
                    let location = open.location();
                    let expression = match open.kind {
                        ExprTokenKind::LParen => {
                            let has_comma = inner.iter().any(|t| t.is_leaf(ExprTokenKind::Comma));
                            let mut list = self.comma_list(inner, location);
                            if list.len() == 1 && !has_comma {
                                Some(Expression::Grouped(Grouped {
                                    inner: Box::new(list.remove(0)),
                                    location,
                                }))
                            } else {
                                Some(Expression::Tuple(Tuple {
                                    items: list,
                                    location,
                                }))
                            }
                        }
                        ExprTokenKind::LCurly => Some(Expression::Set(Set {
                            items: self.comma_list(inner, location),
                            location,
                        })),
                        ExprTokenKind::LSquareColon => Some(Expression::Grouped(Grouped {
                            inner: Box::new(self.expression(inner, location)),
                            location,
                        })),
                        _ => {
                            self.error(format!("Unexpected token {}", open.text), location);
                            None
                        }
                    };
                    if let Some(expression) = expression {
                        pieces.push(Piece::Operand(expression));
                    }
                    i += 1;
                }
                TokenTree::Leaf(token) => {
                    self.error(format!("Unexpected token {}", token.text), token.location());
                    i += 1;
                }
            }
        }
        pieces
    }

    /// `x`, `x...`, `f(x)`, `f_{i}` or `f_{i}(x)` starting at `items[start]`
    fn name_term(&mut self, items: &[TokenTree], start: usize) -> (Expression, usize) {
        let token = &items[start];
        let name = token.text().to_string();
        let location = token.location();
        let mut next = start + 1;

        if items.get(next).is_some_and(|t| t.is_leaf(ExprTokenKind::DotDotDot)) {
            return (
                Expression::VariadicName(NameExpression { name, location }),
                next + 1,
            );
        }

        let mut sub_params = None;
        if items.get(next).is_some_and(|t| t.is_leaf(ExprTokenKind::Underscore)) {
            if let Some(TokenTree::Group { open, items: inner, .. }) = items.get(next + 1) {
                if open.kind == ExprTokenKind::LCurly {
                    sub_params = Some(self.comma_list(inner, open.location()));
                    next += 2;
                }
            }
        }

        let mut params = None;
        if let Some(TokenTree::Group { open, items: inner, .. }) = items.get(next) {
            if open.kind == ExprTokenKind::LParen {
                params = Some(self.comma_list(inner, open.location()));
                next += 1;
            }
        }

        let expression = match (sub_params, params) {
            (None, None) => Expression::Name(NameExpression { name, location }),
            (None, Some(params))
                if params.iter().all(|p| {
                    matches!(p, Expression::Name(_) | Expression::VariadicName(_))
                }) =>
            {
                Expression::Function(Function {
                    name,
                    params,
                    location,
                })
            }
            (sub_params, params) => Expression::FunctionCall(FunctionCall {
                name,
                command: false,
                sub_params,
                params,
                location,
            }),
        };
        (expression, next)
    }

    /// `\name.name[..]_{..}^{..}{..}:name{..}(..)` starting at the backslash
    fn command(&mut self, items: &[TokenTree], start: usize) -> (CommandExpression, usize) {
        let location = items[start].location();
        let mut next = start + 1;
        let mut command = CommandExpression {
            location,
            ..CommandExpression::default()
        };

        match items.get(next) {
            Some(TokenTree::Leaf(token)) if token.kind == ExprTokenKind::Name => {
                command.names.push(token.text.clone());
                next += 1;
            }
            _ => {
                self.error("Expected a name after \\", location);
                return (command, next);
            }
        }

        while let Some(dot) = items.get(next).filter(|t| t.is_leaf(ExprTokenKind::Dot)) {
            match items.get(next + 1) {
                Some(TokenTree::Leaf(token)) if token.kind == ExprTokenKind::Name => {
                    command.names.push(token.text.clone());
                    next += 2;
                }
                _ => {
                    self.error("Expected a name after .", dot.location());
                    next += 1;
                    break;
                }
            }
        }

        if let Some(inner) = group_at(items, next, ExprTokenKind::LSquare) {
            command.square = Some(self.comma_list(inner, items[next].location()));
            next += 1;
        }
        if items.get(next).is_some_and(|t| t.is_leaf(ExprTokenKind::Underscore)) {
            if let Some(inner) = group_at(items, next + 1, ExprTokenKind::LCurly) {
                command.sub = Some(self.comma_list(inner, items[next + 1].location()));
                next += 2;
            }
        }
        if items.get(next).is_some_and(|t| t.is_leaf(ExprTokenKind::Caret)) {
            if let Some(inner) = group_at(items, next + 1, ExprTokenKind::LCurly) {
                command.sup = Some(self.comma_list(inner, items[next + 1].location()));
                next += 2;
            }
        }
        if let Some(inner) = group_at(items, next, ExprTokenKind::LCurly) {
            command.curly = Some(self.comma_list(inner, items[next].location()));
            next += 1;
        }

        while let Some(colon) = items.get(next).filter(|t| t.is_leaf(ExprTokenKind::Colon)) {
            let name = match items.get(next + 1) {
                Some(TokenTree::Leaf(token)) if token.kind == ExprTokenKind::Name => token,
                _ => {
                    self.error("Expected a name after :", colon.location());
                    next += 1;
                    break;
                }
            };
            match group_at(items, next + 2, ExprTokenKind::LCurly) {
                Some(inner) => {
                    let params = self.comma_list(inner, items[next + 2].location());
                    command.named.push(NamedGroup {
                        name: name.text.clone(),
                        params,
                    });
                    next += 3;
                }
                None => {
                    self.error("Expected {...} after :name", name.location());
                    next += 2;
                    break;
                }
            }
        }

        if let Some(inner) = group_at(items, next, ExprTokenKind::LParen) {
            command.paren = Some(self.comma_list(inner, items[next].location()));
            next += 1;
        }

        (command, next)
    }
}

fn group_at(items: &[TokenTree], index: usize, kind: ExprTokenKind) -> Option<&[TokenTree]> {
    match items.get(index) {
        Some(TokenTree::Group { open, items, .. }) if open.kind == kind => Some(items),
        _ => None,
    }
}

/// Split on top-level commas, pairing each segment with where it starts
fn split_commas(items: &[TokenTree], at: Location) -> Vec<(&[TokenTree], Location)> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut location = at;
    for (index, item) in items.iter().enumerate() {
        if item.is_leaf(ExprTokenKind::Comma) {
            let segment = &items[start..index];
            segments.push((segment, segment.first().map_or(location, TokenTree::location)));
            start = index + 1;
            location = item.location();
        }
    }
    let segment = &items[start..];
    segments.push((segment, segment.first().map_or(location, TokenTree::location)));
    segments
}

/// `\f(x, y)` reads as a call of `\f`; anything richer stays a command
fn command_to_expression(command: CommandExpression) -> Expression {
    let plain_call = command.names.len() == 1
        && command.square.is_none()
        && command.sub.is_none()
        && command.sup.is_none()
        && command.curly.is_none()
        && command.named.is_empty()
        && command.paren.is_some();
    if !plain_call {
        return Expression::Command(command);
    }
    let CommandExpression {
        mut names,
        paren,
        location,
        ..
    } = command;
    Expression::FunctionCall(FunctionCall {
        name: names.remove(0),
        command: true,
        sub_params: None,
        params: paren,
        location,
    })
}

fn relation_kind(kind: ExprTokenKind) -> RelationKind {
    match kind {
        ExprTokenKind::Is => RelationKind::Is,
        ExprTokenKind::In => RelationKind::In,
        ExprTokenKind::NotIn => RelationKind::NotIn,
        ExprTokenKind::Equals => RelationKind::Equals,
        ExprTokenKind::NotEquals => RelationKind::NotEquals,
        _ => RelationKind::As,
    }
}
