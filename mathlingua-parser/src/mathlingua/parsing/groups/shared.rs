//! Sections shared by several group kinds: `Metadata:` and `providing:`

use crate::mathlingua::ast::Location;
use crate::mathlingua::parsing::clauses::{clause_list, ClauseList};
use crate::mathlingua::parsing::nodes::{Statement, StringList, TargetList, Text};
use crate::mathlingua::parsing::sections::{
    expect_no_args, forbid_id, identify_sections, nested_groups, single_statement, single_text,
    string_list, target_list, ValidationContext,
};
use crate::mathlingua::parsing::tree::{Group, Section};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetadataSection {
    pub items: Vec<MetadataItem>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetadataItem {
    Reference(ReferenceGroup),
    Tags(StringList),
    Field(Field),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceGroup {
    pub sources: Vec<SourceReference>,
    pub location: Location,
}

/// One `source:`/`page?:`/`offset?:` entry under `reference:`
#[derive(Debug, Clone, PartialEq)]
pub struct SourceReference {
    pub source: Text,
    pub page: Option<Text>,
    pub offset: Option<Text>,
    pub location: Location,
}

/// A free-form `key: "value"` group
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Text,
    pub location: Location,
}

pub fn metadata_section(section: &Section, ctx: &mut ValidationContext) -> MetadataSection {
    let items = nested_groups(section, ctx)
        .into_iter()
        .filter_map(|group| metadata_item(group, ctx))
        .collect();
    MetadataSection {
        items,
        location: section.location,
    }
}

fn metadata_item(group: &Group, ctx: &mut ValidationContext) -> Option<MetadataItem> {
    forbid_id(group, ctx);
    match group.first_section_name() {
        Some("reference") => {
            let sections = identify_sections(group, &["reference"], ctx)?;
            let sources = nested_groups(sections.get("reference")?, ctx)
                .into_iter()
                .filter_map(|source| source_reference(source, ctx))
                .collect();
            Some(MetadataItem::Reference(ReferenceGroup {
                sources,
                location: group.location,
            }))
        }
        Some("tags") => {
            let sections = identify_sections(group, &["tags"], ctx)?;
            Some(MetadataItem::Tags(string_list(sections.get("tags")?, ctx)))
        }
        _ => field(group, ctx).map(MetadataItem::Field),
    }
}

fn source_reference(group: &Group, ctx: &mut ValidationContext) -> Option<SourceReference> {
    forbid_id(group, ctx);
    let sections = identify_sections(group, &["source", "page?", "offset?"], ctx)?;
    Some(SourceReference {
        source: single_text(sections.get("source")?, ctx),
        page: sections.get("page").map(|s| single_text(s, ctx)),
        offset: sections.get("offset").map(|s| single_text(s, ctx)),
        location: group.location,
    })
}

/// A single-section group whose one argument is a string
pub fn field(group: &Group, ctx: &mut ValidationContext) -> Option<Field> {
    forbid_id(group, ctx);
    match group.sections.as_slice() {
        [section] => Some(Field {
            key: section.name.text.clone(),
            value: single_text(section, ctx),
            location: group.location,
        }),
        _ => {
            ctx.error("Expected a single section", group.location);
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProvidingSection {
    pub items: Vec<ProvidingItem>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProvidingItem {
    View(ViewGroup),
    Member(MemberGroup),
}

/// `view:` / `as:` / `via?:` / `by?:`, declaring that a definition can be seen as another
#[derive(Debug, Clone, PartialEq)]
pub struct ViewGroup {
    pub as_: Statement,
    pub via: Option<Statement>,
    pub by: Option<Statement>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberGroup {
    pub targets: TargetList,
    pub means: ClauseList,
    pub location: Location,
}

impl ProvidingSection {
    pub fn views(&self) -> impl Iterator<Item = &ViewGroup> {
        self.items.iter().filter_map(|item| match item {
            ProvidingItem::View(view) => Some(view),
            ProvidingItem::Member(_) => None,
        })
    }

    pub fn statements(&self) -> Vec<&Statement> {
        let mut statements = Vec::new();
        for item in &self.items {
            match item {
                ProvidingItem::View(view) => {
                    statements.push(&view.as_);
                    statements.extend(view.via.iter());
                    statements.extend(view.by.iter());
                }
                ProvidingItem::Member(member) => statements.extend(member.means.statements()),
            }
        }
        statements
    }
}

pub fn providing_section(section: &Section, ctx: &mut ValidationContext) -> ProvidingSection {
    let items = nested_groups(section, ctx)
        .into_iter()
        .filter_map(|group| providing_item(group, ctx))
        .collect();
    ProvidingSection {
        items,
        location: section.location,
    }
}

fn providing_item(group: &Group, ctx: &mut ValidationContext) -> Option<ProvidingItem> {
    forbid_id(group, ctx);
    match group.first_section_name() {
        Some("view") => {
            let sections = identify_sections(group, &["view", "as", "via?", "by?"], ctx)?;
            expect_no_args(sections.get("view")?, ctx);
            Some(ProvidingItem::View(ViewGroup {
                as_: single_statement(sections.get("as")?, ctx),
                via: sections.get("via").map(|s| single_statement(s, ctx)),
                by: sections.get("by").map(|s| single_statement(s, ctx)),
                location: group.location,
            }))
        }
        Some("member") => {
            let sections = identify_sections(group, &["member", "means"], ctx)?;
            Some(ProvidingItem::Member(MemberGroup {
                targets: target_list(sections.get("member")?, ctx),
                means: clause_list(sections.get("means")?, ctx),
                location: group.location,
            }))
        }
        _ => {
            ctx.error("Expected a view or member group", group.location);
            None
        }
    }
}
