//! The typed document
//!
//! A [`Document`] is the ordered list of top-level groups of one file. Groups that define
//! something expose the [`Signature`]s they introduce; everything else about a group is
//! reached through its typed fields.

use super::clauses::ClauseList;
use super::groups::{
    validate_defines, validate_foundation, validate_mutually, validate_resource, validate_result,
    validate_states, validate_topic, DefinesGroup, FoundationGroup, FoundationItem, MutuallyGroup,
    ResourceGroup, ResultGroup, ResultKind, StatesGroup, TopicGroup,
};
use super::nodes::{Id, Statement, StringList};
use super::sections::ValidationContext;
use super::tree::{Group, Root, RootItem};
use crate::mathlingua::ast::Location;
use serde::Serialize;

/// The canonical textual identity of a definition, such as `\function:on`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Signature {
    pub form: String,
    pub location: Location,
}

impl Signature {
    pub fn new(form: impl Into<String>, location: Location) -> Self {
        Self {
            form: form.into(),
            location,
        }
    }

    /// Operator-style signatures (`+`, `*`) do not start with a backslash
    pub fn is_operator_style(form: &str) -> bool {
        !form.starts_with('\\')
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub groups: Vec<TopLevelGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopLevelGroup {
    Defines(DefinesGroup),
    States(StatesGroup),
    Axiom(ResultGroup),
    Theorem(ResultGroup),
    Conjecture(ResultGroup),
    Topic(TopicGroup),
    Resource(ResourceGroup),
    Foundation(FoundationGroup),
    Mutually(MutuallyGroup),
}

/// A borrowed Defines or States, wherever it sits in the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Definition<'a> {
    Defines(&'a DefinesGroup),
    States(&'a StatesGroup),
}

impl<'a> Definition<'a> {
    pub fn id(&self) -> &'a Id {
        match self {
            Definition::Defines(defines) => &defines.id,
            Definition::States(states) => &states.id,
        }
    }

    pub fn signature(&self) -> Option<Signature> {
        id_signature(self.id())
    }

    pub fn has_expressing(&self) -> bool {
        matches!(self, Definition::Defines(defines) if defines.has_expressing())
    }

    pub fn is_states(&self) -> bool {
        matches!(self, Definition::States(_))
    }

    pub fn using(&self) -> Option<&'a ClauseList> {
        match self {
            Definition::Defines(defines) => defines.using.as_ref(),
            Definition::States(states) => states.using.as_ref(),
        }
    }

    pub fn written(&self) -> Option<&'a StringList> {
        match self {
            Definition::Defines(defines) => defines.written.as_ref(),
            Definition::States(states) => states.written.as_ref(),
        }
    }

    /// The definitional body: `means:` for a Defines, `that:` for a States
    pub fn body(&self) -> Option<&'a ClauseList> {
        match self {
            Definition::Defines(defines) => defines.means.as_ref(),
            Definition::States(states) => Some(&states.that),
        }
    }

    /// The signature plus one `<sig>.<ctor>` per `generated:` constructor
    pub fn signatures(&self) -> Vec<Signature> {
        let Some(signature) = self.signature() else {
            return Vec::new();
        };
        let mut signatures = vec![signature.clone()];
        if let Definition::Defines(defines) = self {
            for list in [&defines.means, &defines.satisfying].into_iter().flatten() {
                for generated in list.generated_groups() {
                    for constructor in generated.constructors() {
                        signatures.push(Signature::new(
                            format!("{}.{}", signature.form, constructor),
                            generated.location,
                        ));
                    }
                }
            }
        }
        signatures
    }

    pub fn statements(&self) -> Vec<&'a Statement> {
        match self {
            Definition::Defines(defines) => defines.statements(),
            Definition::States(states) => states.statements(),
        }
    }
}

fn id_signature(id: &Id) -> Option<Signature> {
    id.statement
        .value()
        .and_then(|expression| expression.signature())
        .map(|form| Signature::new(form, id.location()))
}

impl FoundationItem {
    pub fn as_definition(&self) -> Definition<'_> {
        match self {
            FoundationItem::Defines(defines) => Definition::Defines(defines),
            FoundationItem::States(states) => Definition::States(states),
        }
    }
}

impl TopLevelGroup {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TopLevelGroup::Defines(_) => "Defines",
            TopLevelGroup::States(_) => "States",
            TopLevelGroup::Axiom(_) => "Axiom",
            TopLevelGroup::Theorem(_) => "Theorem",
            TopLevelGroup::Conjecture(_) => "Conjecture",
            TopLevelGroup::Topic(_) => "Topic",
            TopLevelGroup::Resource(_) => "Resource",
            TopLevelGroup::Foundation(_) => "Foundation",
            TopLevelGroup::Mutually(_) => "Mutually",
        }
    }

    pub fn location(&self) -> Location {
        match self {
            TopLevelGroup::Defines(group) => group.location,
            TopLevelGroup::States(group) => group.location,
            TopLevelGroup::Axiom(group)
            | TopLevelGroup::Theorem(group)
            | TopLevelGroup::Conjecture(group) => group.location,
            TopLevelGroup::Topic(group) => group.location,
            TopLevelGroup::Resource(group) => group.location,
            TopLevelGroup::Foundation(group) => group.location,
            TopLevelGroup::Mutually(group) => group.location,
        }
    }

    pub fn id(&self) -> Option<&Id> {
        match self {
            TopLevelGroup::Defines(group) => Some(&group.id),
            TopLevelGroup::States(group) => Some(&group.id),
            TopLevelGroup::Axiom(group)
            | TopLevelGroup::Theorem(group)
            | TopLevelGroup::Conjecture(group) => group.id.as_ref(),
            TopLevelGroup::Topic(group) => Some(&group.id),
            TopLevelGroup::Resource(group) => Some(&group.id),
            TopLevelGroup::Foundation(_) | TopLevelGroup::Mutually(_) => None,
        }
    }

    pub fn as_result(&self) -> Option<&ResultGroup> {
        match self {
            TopLevelGroup::Axiom(group)
            | TopLevelGroup::Theorem(group)
            | TopLevelGroup::Conjecture(group) => Some(group),
            _ => None,
        }
    }

    /// Every Defines and States in this group, including the ones nested in
    /// `Foundation:` and `Mutually:`
    pub fn definitions(&self) -> Vec<Definition<'_>> {
        match self {
            TopLevelGroup::Defines(defines) => vec![Definition::Defines(defines)],
            TopLevelGroup::States(states) => vec![Definition::States(states)],
            TopLevelGroup::Foundation(foundation) => vec![foundation.item.as_definition()],
            TopLevelGroup::Mutually(mutually) => mutually
                .items
                .iter()
                .map(FoundationItem::as_definition)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The primary signature of this group, if it has one
    pub fn signature(&self) -> Option<Signature> {
        match self {
            TopLevelGroup::Defines(_) | TopLevelGroup::States(_) => {
                self.definitions().first().and_then(Definition::signature)
            }
            _ => self.as_result().and_then(|r| r.id.as_ref()).and_then(id_signature),
        }
    }

    /// Every signature this group introduces
    pub fn signatures(&self) -> Vec<Signature> {
        if let Some(result) = self.as_result() {
            return match result.id.as_ref().and_then(id_signature) {
                Some(signature) => {
                    let given = Signature::new(format!("{}:given", signature.form), signature.location);
                    vec![signature, given]
                }
                None => Vec::new(),
            };
        }
        self.definitions()
            .iter()
            .flat_map(Definition::signatures)
            .collect()
    }

    /// Every statement of the group outside of ids
    pub fn statements(&self) -> Vec<&Statement> {
        match self {
            TopLevelGroup::Axiom(group)
            | TopLevelGroup::Theorem(group)
            | TopLevelGroup::Conjecture(group) => group.statements(),
            TopLevelGroup::Topic(_) | TopLevelGroup::Resource(_) => Vec::new(),
            _ => self
                .definitions()
                .into_iter()
                .flat_map(|definition| definition.statements())
                .collect(),
        }
    }

    /// Ids of this group and of any nested definitions
    pub fn ids(&self) -> Vec<&Id> {
        match self {
            TopLevelGroup::Foundation(_) | TopLevelGroup::Mutually(_) => {
                self.definitions().into_iter().map(|d| d.id()).collect()
            }
            _ => self.id().into_iter().collect(),
        }
    }

    pub fn using(&self) -> Vec<&ClauseList> {
        match self.as_result() {
            Some(result) => result.using.iter().collect(),
            None => self
                .definitions()
                .into_iter()
                .filter_map(|definition| definition.using())
                .collect(),
        }
    }
}

/// Convert a phase-1 tree into a typed document, reporting into `ctx`.
pub fn validate_document(root: &Root, ctx: &mut ValidationContext) -> Document {
    let groups = root
        .items
        .iter()
        .filter_map(|item| match item {
            RootItem::Group(group) => top_level_group(group, ctx),
            RootItem::BlockComment(_) => None,
        })
        .collect();
    Document { groups }
}

fn top_level_group(group: &Group, ctx: &mut ValidationContext) -> Option<TopLevelGroup> {
    let name = group.first_section_name().unwrap_or_default();
    match name {
        "Defines" => validate_defines(group, ctx).map(TopLevelGroup::Defines),
        "States" => validate_states(group, ctx).map(TopLevelGroup::States),
        "Axiom" | "Theorem" | "Conjecture" => {
            let kind = ResultKind::from_section_name(name)?;
            let result = validate_result(kind, group, ctx)?;
            Some(match kind {
                ResultKind::Axiom => TopLevelGroup::Axiom(result),
                ResultKind::Theorem => TopLevelGroup::Theorem(result),
                ResultKind::Conjecture => TopLevelGroup::Conjecture(result),
            })
        }
        "Topic" => validate_topic(group, ctx).map(TopLevelGroup::Topic),
        "Resource" => validate_resource(group, ctx).map(TopLevelGroup::Resource),
        "Foundation" => validate_foundation(group, ctx).map(TopLevelGroup::Foundation),
        "Mutually" => validate_mutually(group, ctx).map(TopLevelGroup::Mutually),
        other => {
            ctx.error(
                format!("Expected a top level group but found {other}"),
                group.location,
            );
            None
        }
    }
}
