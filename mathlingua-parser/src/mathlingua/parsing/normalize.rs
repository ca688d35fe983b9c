//! Location normalization
//!
//! Two parses of equivalent source differ only in where things sit. [`Locatable`] walks
//! every location carried by a node (tokens, statements, the expressions inside them and
//! their diagnostics) so tests and tools can compare documents structurally after
//! [`Locatable::normalized`] resets everything to [`Location::SENTINEL`].

use super::clauses::{Clause, ClauseList};
use super::document::{Document, TopLevelGroup};
use super::groups::{
    DefinesGroup, Field, FoundationItem, MetadataItem, MetadataSection, ProvidingItem,
    ProvidingSection, ResultGroup, StatesGroup,
};
use super::nodes::{Id, Statement, StringList, TargetList, Text};
use super::tree::Target;
use crate::mathlingua::ast::{Location, Validation};
use crate::mathlingua::lexing::Token;

pub trait Locatable {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location));

    /// The same node with every location replaced by the sentinel
    fn normalized(mut self) -> Self
    where
        Self: Sized,
    {
        self.visit_locations(&mut |location| *location = Location::SENTINEL);
        self
    }
}

impl<T: Locatable> Locatable for Option<T> {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        if let Some(inner) = self {
            inner.visit_locations(f);
        }
    }
}

impl<T: Locatable> Locatable for Vec<T> {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        for item in self {
            item.visit_locations(f);
        }
    }
}

impl<T: Locatable> Locatable for Box<T> {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        self.as_mut().visit_locations(f);
    }
}

impl Locatable for Token {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        let mut location = Location::new(self.row, self.column);
        f(&mut location);
        self.row = location.row;
        self.column = location.column;
    }
}

impl Locatable for Target {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        match self {
            Target::Token(token) => token.visit_locations(f),
            Target::Abstraction(abstraction) => {
                f(&mut abstraction.location);
                abstraction.name.visit_locations(f);
                abstraction.sub_params.visit_locations(f);
                abstraction.params.visit_locations(f);
            }
            Target::Assignment(assignment) => {
                f(&mut assignment.location);
                assignment.lhs.visit_locations(f);
                assignment.rhs.visit_locations(f);
            }
            Target::Tuple(tuple) => {
                f(&mut tuple.location);
                tuple.items.visit_locations(f);
            }
        }
    }
}

impl Locatable for Statement {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        f(&mut self.location);
        match &mut self.expression {
            Validation::Success(expression) => expression.visit_locations(f),
            Validation::Failure(diagnostics) => {
                for diagnostic in diagnostics {
                    let mut location = diagnostic.location();
                    f(&mut location);
                    diagnostic.row = location.row;
                    diagnostic.column = location.column;
                }
            }
        }
    }
}

impl Locatable for Id {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        self.statement.visit_locations(f);
    }
}

impl Locatable for Text {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        f(&mut self.location);
    }
}

impl Locatable for StringList {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        f(&mut self.location);
        self.items.visit_locations(f);
    }
}

impl Locatable for TargetList {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        f(&mut self.location);
        self.items.visit_locations(f);
    }
}

impl Locatable for ClauseList {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        f(&mut self.location);
        self.clauses.visit_locations(f);
    }
}

impl Locatable for Clause {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        match self {
            Clause::Statement(statement) => statement.visit_locations(f),
            Clause::Text(text) => text.visit_locations(f),
            Clause::If(group) => {
                f(&mut group.location);
                group.conditions.visit_locations(f);
                group.then.visit_locations(f);
            }
            Clause::Iff(group) => {
                f(&mut group.location);
                group.conditions.visit_locations(f);
                group.then.visit_locations(f);
            }
            Clause::ForAll(group) => {
                f(&mut group.location);
                group.targets.visit_locations(f);
                group.such_that.visit_locations(f);
                group.then.visit_locations(f);
            }
            Clause::Exists(group) | Clause::ExistsUnique(group) => {
                f(&mut group.location);
                group.targets.visit_locations(f);
                group.such_that.visit_locations(f);
            }
            Clause::Not(group) => {
                f(&mut group.location);
                group.clause.visit_locations(f);
            }
            Clause::Or(group) => {
                f(&mut group.location);
                group.clauses.visit_locations(f);
            }
            Clause::Piecewise(group) => {
                f(&mut group.location);
                group.when.visit_locations(f);
                group.then.visit_locations(f);
                group.otherwise.visit_locations(f);
            }
            Clause::Matching(group) => {
                f(&mut group.location);
                group.clauses.visit_locations(f);
            }
            Clause::Generated(group) => {
                f(&mut group.location);
                group.from.visit_locations(f);
                group.when.visit_locations(f);
            }
        }
    }
}

impl Locatable for Field {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        f(&mut self.location);
        self.value.visit_locations(f);
    }
}

impl Locatable for MetadataSection {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        f(&mut self.location);
        for item in &mut self.items {
            match item {
                MetadataItem::Reference(reference) => {
                    f(&mut reference.location);
                    for source in &mut reference.sources {
                        f(&mut source.location);
                        source.source.visit_locations(f);
                        source.page.visit_locations(f);
                        source.offset.visit_locations(f);
                    }
                }
                MetadataItem::Tags(tags) => tags.visit_locations(f),
                MetadataItem::Field(field) => field.visit_locations(f),
            }
        }
    }
}

impl Locatable for ProvidingSection {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        f(&mut self.location);
        for item in &mut self.items {
            match item {
                ProvidingItem::View(view) => {
                    f(&mut view.location);
                    view.as_.visit_locations(f);
                    view.via.visit_locations(f);
                    view.by.visit_locations(f);
                }
                ProvidingItem::Member(member) => {
                    f(&mut member.location);
                    member.targets.visit_locations(f);
                    member.means.visit_locations(f);
                }
            }
        }
    }
}

impl Locatable for DefinesGroup {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        f(&mut self.location);
        self.id.visit_locations(f);
        self.target.visit_locations(f);
        self.given.visit_locations(f);
        for list in [
            &mut self.when,
            &mut self.such_that,
            &mut self.means,
            &mut self.satisfying,
            &mut self.expressing,
            &mut self.using,
        ] {
            list.visit_locations(f);
        }
        self.providing.visit_locations(f);
        self.written.visit_locations(f);
        self.called.visit_locations(f);
        self.metadata.visit_locations(f);
    }
}

impl Locatable for StatesGroup {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        f(&mut self.location);
        self.id.visit_locations(f);
        self.given.visit_locations(f);
        self.when.visit_locations(f);
        self.such_that.visit_locations(f);
        self.that.visit_locations(f);
        self.using.visit_locations(f);
        self.written.visit_locations(f);
        self.called.visit_locations(f);
        self.metadata.visit_locations(f);
    }
}

impl Locatable for ResultGroup {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        f(&mut self.location);
        self.id.visit_locations(f);
        self.names.visit_locations(f);
        self.given.visit_locations(f);
        for list in [
            &mut self.where_,
            &mut self.if_,
            &mut self.iff,
            &mut self.using,
            &mut self.proof,
        ] {
            list.visit_locations(f);
        }
        self.then.visit_locations(f);
        self.metadata.visit_locations(f);
    }
}

impl Locatable for FoundationItem {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        match self {
            FoundationItem::Defines(defines) => defines.visit_locations(f),
            FoundationItem::States(states) => states.visit_locations(f),
        }
    }
}

impl Locatable for TopLevelGroup {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        match self {
            TopLevelGroup::Defines(defines) => defines.visit_locations(f),
            TopLevelGroup::States(states) => states.visit_locations(f),
            TopLevelGroup::Axiom(result)
            | TopLevelGroup::Theorem(result)
            | TopLevelGroup::Conjecture(result) => result.visit_locations(f),
            TopLevelGroup::Topic(topic) => {
                f(&mut topic.location);
                topic.id.visit_locations(f);
                topic.names.visit_locations(f);
                topic.content.visit_locations(f);
                topic.metadata.visit_locations(f);
            }
            TopLevelGroup::Resource(resource) => {
                f(&mut resource.location);
                resource.id.visit_locations(f);
                resource.items.visit_locations(f);
                resource.metadata.visit_locations(f);
            }
            TopLevelGroup::Foundation(foundation) => {
                f(&mut foundation.location);
                foundation.item.visit_locations(f);
                foundation.metadata.visit_locations(f);
            }
            TopLevelGroup::Mutually(mutually) => {
                f(&mut mutually.location);
                mutually.items.visit_locations(f);
                mutually.metadata.visit_locations(f);
            }
        }
    }
}

impl Locatable for Document {
    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        self.groups.visit_locations(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mathlingua::parsing::parse;

    #[test]
    fn test_normalized_documents_ignore_layout() {
        let spaced = parse("\n\nAxiom:\nthen:\n. 'a = b'\n")
            .into_result()
            .expect("spaced source parses");
        let compact = parse("Axiom:\nthen: 'a = b'\n")
            .into_result()
            .expect("compact source parses");
        assert_ne!(spaced, compact);
        assert_eq!(spaced.normalized(), compact.normalized());
    }

    #[test]
    fn test_normalized_leaves_no_real_locations() {
        let mut document = parse("[\\a]\nDefines: x\nmeans: 'x is \\b'\n")
            .into_result()
            .expect("source parses")
            .normalized();
        let mut seen = Vec::new();
        document.visit_locations(&mut |location| seen.push(*location));
        assert!(!seen.is_empty());
        assert!(seen.iter().all(Location::is_sentinel));
    }
}
