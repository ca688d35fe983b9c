//! Phase-1 tree builder
//!
//!     Consumes the structural token stream and builds the generic [`Root`] tree. The grammar
//!     follows directly from the indentation markers:
//!
//!         root      := (Linebreak | BlockComment | group)*
//!         group     := [Id Begin End] section+
//!         section   := Name Colon [target (Comma target)*] Begin (DotSpace argument)* End
//!         argument  := [Id Begin End] section+
//!                    | target (Comma target)* Begin End
//!
//!     A nested group's sections are siblings inside the enclosing block, so a group argument
//!     simply keeps reading sections until something other than `name:` comes up.
//!
//! Recovery
//!
//!     The builder never stops at the first problem. When a top-level group fails, the error
//!     is recorded and tokens are skipped up to the next `Linebreak`, where the next group
//!     starts.

use super::tree::{Abstraction, Argument, Assignment, Group, Root, RootItem, Section, Target, Tuple};
use crate::mathlingua::ast::{Diagnostic, Location};
use crate::mathlingua::lexing::{Token, TokenKind};

/// Build the phase-1 tree for a token stream, returning every problem found.
pub fn build_tree(tokens: &[Token]) -> (Root, Vec<Diagnostic>) {
    TreeBuilder::new(tokens).root()
}

struct TreeBuilder<'a> {
    tokens: &'a [Token],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> TreeBuilder<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn peek_kind_at(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Option<&'a Token> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Some(token)
            }
            _ => None,
        }
    }

    /// Where the next token starts, or where the last one did at end of input
    fn here(&self) -> Location {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(Token::location)
            .unwrap_or_default()
    }

    fn error(&mut self, message: impl Into<String>, location: Location) {
        self.diagnostics
            .push(Diagnostic::structural(message, location));
    }

    fn unexpected(&mut self) {
        match self.peek() {
            Some(token) => {
                let message = match token.kind {
                    TokenKind::Begin => "Unexpected indentation".to_string(),
                    TokenKind::End => "Unexpected end of block".to_string(),
                    _ => format!("Unexpected token {}", token.text),
                };
                self.error(message, token.location());
            }
            None => self.error("Unexpected end of input", self.here()),
        }
    }

    fn at_section_start(&self) -> bool {
        self.peek_kind() == Some(TokenKind::Name) && self.peek_kind_at(1) == Some(TokenKind::Colon)
    }

    fn root(mut self) -> (Root, Vec<Diagnostic>) {
        let mut root = Root::default();
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Linebreak => self.pos += 1,
                TokenKind::BlockComment => {
                    root.items.push(RootItem::BlockComment(token.clone()));
                    self.pos += 1;
                }
                _ => {
                    let errors_before = self.diagnostics.len();
                    let group = self.group();
                    if self.diagnostics.len() == errors_before
                        && !matches!(
                            self.peek_kind(),
                            None | Some(TokenKind::Linebreak) | Some(TokenKind::BlockComment)
                        )
                    {
                        self.unexpected();
                    }
                    if self.diagnostics.len() > errors_before {
                        self.recover();
                    }
                    if let Some(group) = group {
                        root.items.push(RootItem::Group(group));
                    }
                }
            }
        }
        (root, self.diagnostics)
    }

    fn recover(&mut self) {
        while let Some(token) = self.peek() {
            if token.kind == TokenKind::Linebreak {
                break;
            }
            self.pos += 1;
        }
    }

    fn group(&mut self) -> Option<Group> {
        let location = self.here();
        let id = match self.eat(TokenKind::Id) {
            Some(id) => {
                self.line_end()?;
                Some(id.clone())
            }
            None => None,
        };

        let mut sections = Vec::new();
        while self.at_section_start() {
            sections.push(self.section()?);
        }

        if sections.is_empty() {
            self.error("Expected a section name", self.here());
            return None;
        }

        Some(Group {
            id,
            sections,
            location,
        })
    }

    fn section(&mut self) -> Option<Section> {
        let name = self.advance()?.clone();
        if self.eat(TokenKind::Colon).is_none() {
            self.error("Expected a ':'", self.here());
            return None;
        }

        let mut args = Vec::new();
        if !matches!(self.peek_kind(), Some(TokenKind::Begin) | None) {
            loop {
                args.push(Argument::Target(self.target()?));
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        if self.eat(TokenKind::Begin).is_none() {
            self.unexpected();
            return None;
        }
        while self.eat(TokenKind::DotSpace).is_some() {
            args.extend(self.argument()?);
        }
        if self.eat(TokenKind::End).is_none() {
            self.unexpected();
            return None;
        }

        Some(Section {
            location: name.location(),
            name,
            args,
        })
    }

    fn argument(&mut self) -> Option<Vec<Argument>> {
        if self.peek_kind() == Some(TokenKind::Id) || self.at_section_start() {
            return self.group().map(|group| vec![Argument::Group(group)]);
        }

        let mut args = Vec::new();
        loop {
            args.push(Argument::Target(self.target()?));
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.line_end()?;
        Some(args)
    }

    /// Every argument line ends with an empty `Begin End` block.
    fn line_end(&mut self) -> Option<()> {
        if self.eat(TokenKind::Begin).is_none() {
            self.unexpected();
            return None;
        }
        // Anything but `End` here is content indented under the line
        match self.peek_kind() {
            Some(TokenKind::End) => {
                self.pos += 1;
                Some(())
            }
            Some(_) => {
                self.error("Unexpected indentation", self.here());
                None
            }
            None => {
                self.unexpected();
                None
            }
        }
    }

    fn target(&mut self) -> Option<Target> {
        let Some(token) = self.peek() else {
            self.error("Expected an argument", self.here());
            return None;
        };

        match token.kind {
            TokenKind::LParen => self.tuple().map(Target::Tuple),
            TokenKind::LCurly => self.enclosed_abstraction().map(Target::Abstraction),
            TokenKind::Name => {
                self.pos += 1;
                match self.peek_kind() {
                    Some(TokenKind::ColonEquals) => {
                        self.pos += 1;
                        let rhs = self.target()?;
                        Some(Target::Assignment(Assignment {
                            lhs: token.clone(),
                            rhs: Box::new(rhs),
                            location: token.location(),
                        }))
                    }
                    Some(TokenKind::Underscore) | Some(TokenKind::LParen) => {
                        self.abstraction(token.clone()).map(Target::Abstraction)
                    }
                    _ => Some(Target::Token(token.clone())),
                }
            }
            TokenKind::Operator | TokenKind::String | TokenKind::Statement | TokenKind::Id => {
                self.pos += 1;
                Some(Target::Token(token.clone()))
            }
            _ => {
                self.error("Expected an argument", token.location());
                None
            }
        }
    }

    fn abstraction(&mut self, name: Token) -> Option<Abstraction> {
        let mut sub_params = None;
        if self.eat(TokenKind::Underscore).is_some() {
            if self.eat(TokenKind::LCurly).is_none() {
                self.error("Expected a '{'", self.here());
                return None;
            }
            sub_params = Some(self.name_list(TokenKind::RCurly)?);
        }

        let params = match self.eat(TokenKind::LParen) {
            Some(_) => Some(self.name_list(TokenKind::RParen)?),
            None => None,
        };

        Some(Abstraction {
            location: name.location(),
            name: Some(name),
            enclosed: false,
            sub_params,
            params,
        })
    }

    fn enclosed_abstraction(&mut self) -> Option<Abstraction> {
        let open = self.advance()?;
        let params = self.name_list(TokenKind::RCurly)?;
        Some(Abstraction {
            name: None,
            enclosed: true,
            sub_params: None,
            params: Some(params),
            location: open.location(),
        })
    }

    fn name_list(&mut self, closer: TokenKind) -> Option<Vec<Token>> {
        let mut names = Vec::new();
        if self.eat(closer).is_some() {
            return Some(names);
        }
        loop {
            match self.eat(TokenKind::Name) {
                Some(name) => names.push(name.clone()),
                None => {
                    self.error("Expected a name", self.here());
                    return None;
                }
            }
            if self.eat(TokenKind::Comma).is_some() {
                continue;
            }
            if self.eat(closer).is_some() {
                return Some(names);
            }
            self.error(format!("Expected a closing {closer}"), self.here());
            return None;
        }
    }

    fn tuple(&mut self) -> Option<Tuple> {
        let open = self.advance()?;
        let mut items = Vec::new();
        if self.eat(TokenKind::RParen).is_some() {
            return Some(Tuple {
                items,
                location: open.location(),
            });
        }
        loop {
            items.push(self.target()?);
            if self.eat(TokenKind::Comma).is_some() {
                continue;
            }
            if self.eat(TokenKind::RParen).is_some() {
                return Some(Tuple {
                    items,
                    location: open.location(),
                });
            }
            self.error("Expected a closing )", self.here());
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mathlingua::lexing::lex;

    fn build(source: &str) -> (Root, Vec<Diagnostic>) {
        let output = lex(source);
        build_tree(&output.tokens)
    }

    fn only_group(root: &Root) -> &Group {
        match root.items.as_slice() {
            [RootItem::Group(group)] => group,
            other => panic!("expected a single group, found {other:?}"),
        }
    }

    #[test]
    fn test_group_with_id_and_inline_arguments() {
        let (root, errors) = build("[\\set]\nDefines: X\nwritten: \"X\"\n");
        assert!(errors.is_empty(), "{errors:?}");
        let group = only_group(&root);
        assert_eq!(group.id.as_ref().map(|t| t.text.as_str()), Some("[\\set]"));
        let names: Vec<_> = group.sections.iter().map(|s| s.name.text.as_str()).collect();
        assert_eq!(names, vec!["Defines", "written"]);
        assert_eq!(group.sections[0].args.len(), 1);
    }

    #[test]
    fn test_block_arguments_and_nested_groups() {
        let source = "Theorem:\nthen:\n. for: x, y\n  then:\n  . 'x'\n. 'y'\n";
        let (root, errors) = build(source);
        assert!(errors.is_empty(), "{errors:?}");
        let then = &only_group(&root).sections[1];
        assert_eq!(then.args.len(), 2);
        match &then.args[0] {
            Argument::Group(nested) => {
                assert_eq!(nested.first_section_name(), Some("for"));
                assert_eq!(nested.sections[0].args.len(), 2);
                assert_eq!(nested.sections[1].args.len(), 1);
            }
            other => panic!("expected a nested group, found {other:?}"),
        }
        assert!(matches!(&then.args[1], Argument::Target(Target::Token(t)) if t.text == "'y'"));
    }

    #[test]
    fn test_abstractions_tuples_and_assignments() {
        let (root, errors) = build("Defines: f_{i}(x, y)\ngiven: (a, b), {c...}, z := g(w)\n");
        assert!(errors.is_empty(), "{errors:?}");
        let group = only_group(&root);
        let codes: Vec<_> = group.sections[1]
            .args
            .iter()
            .map(|a| match a {
                Argument::Target(t) => t.to_code(),
                Argument::Group(_) => "<group>".to_string(),
            })
            .collect();
        assert_eq!(codes, vec!["(a, b)", "{c...}", "z := g(w)"]);
    }

    #[test]
    fn test_groups_are_separated_by_linebreaks() {
        let (root, errors) = build("Theorem:\nthen: 'a'\n\n::note::\n\nAxiom:\nthen: 'b'\n");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(root.items.len(), 3);
        assert!(matches!(root.items[1], RootItem::BlockComment(_)));
    }

    #[test]
    fn test_recovers_at_next_group() {
        let (root, errors) = build("Theorem\nthen: 'a'\n\nAxiom:\nthen: 'b'\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Expected a section name");
        assert_eq!(root.items.len(), 1);
    }

    #[test]
    fn test_unexpected_indentation_after_target() {
        let (_, errors) = build("Theorem:\nthen:\n. 'a'\n    'b'\n");
        assert!(!errors.is_empty());
        assert_eq!(errors[0].message, "Unexpected indentation");
        assert_eq!(errors[0].location(), Location::new(3, 4));
    }
}
