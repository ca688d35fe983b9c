//! `Topic:`, `Resource:`, `Foundation:` and `Mutually:` groups

use super::defines::{validate_defines, DefinesGroup};
use super::shared::{field, metadata_section, Field, MetadataSection};
use super::states::{validate_states, StatesGroup};
use crate::mathlingua::ast::Location;
use crate::mathlingua::parsing::nodes::{Id, StringList, Text};
use crate::mathlingua::parsing::sections::{
    forbid_id, group_id, identify_sections, nested_groups, single_arg, single_text, string_list,
    ValidationContext,
};
use crate::mathlingua::parsing::tree::{Argument, Group};

#[derive(Debug, Clone, PartialEq)]
pub struct TopicGroup {
    pub id: Id,
    pub names: StringList,
    pub content: Text,
    pub metadata: Option<MetadataSection>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceGroup {
    pub id: Id,
    pub items: Vec<Field>,
    pub metadata: Option<MetadataSection>,
    pub location: Location,
}

/// A Defines or States nested inside `Foundation:` or `Mutually:`
#[derive(Debug, Clone, PartialEq)]
pub enum FoundationItem {
    Defines(DefinesGroup),
    States(StatesGroup),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoundationGroup {
    pub item: Box<FoundationItem>,
    pub metadata: Option<MetadataSection>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutuallyGroup {
    pub items: Vec<FoundationItem>,
    pub metadata: Option<MetadataSection>,
    pub location: Location,
}

pub fn validate_topic(group: &Group, ctx: &mut ValidationContext) -> Option<TopicGroup> {
    let id = group_id(group, true, ctx);
    let sections = identify_sections(group, &["Topic", "content", "Metadata?"], ctx)?;
    Some(TopicGroup {
        id: id.unwrap_or_default(),
        names: string_list(sections.get("Topic")?, ctx),
        content: single_text(sections.get("content")?, ctx),
        metadata: sections.get("Metadata").map(|s| metadata_section(s, ctx)),
        location: group.location,
    })
}

pub fn validate_resource(group: &Group, ctx: &mut ValidationContext) -> Option<ResourceGroup> {
    let id = group_id(group, true, ctx);
    let sections = identify_sections(group, &["Resource", "Metadata?"], ctx)?;
    let items = nested_groups(sections.get("Resource")?, ctx)
        .into_iter()
        .filter_map(|item| field(item, ctx))
        .collect();
    Some(ResourceGroup {
        id: id.unwrap_or_default(),
        items,
        metadata: sections.get("Metadata").map(|s| metadata_section(s, ctx)),
        location: group.location,
    })
}

pub fn validate_foundation(group: &Group, ctx: &mut ValidationContext) -> Option<FoundationGroup> {
    forbid_id(group, ctx);
    let sections = identify_sections(group, &["Foundation", "Metadata?"], ctx)?;
    let item = match single_arg(sections.get("Foundation")?, ctx)? {
        Argument::Group(inner) => foundation_item(inner, ctx),
        Argument::Target(target) => {
            ctx.error("Expected a group", target.location());
            None
        }
    };
    let metadata = sections.get("Metadata").map(|s| metadata_section(s, ctx));
    Some(FoundationGroup {
        item: Box::new(item?),
        metadata,
        location: group.location,
    })
}

pub fn validate_mutually(group: &Group, ctx: &mut ValidationContext) -> Option<MutuallyGroup> {
    forbid_id(group, ctx);
    let sections = identify_sections(group, &["Mutually", "Metadata?"], ctx)?;
    let section = sections.get("Mutually")?;
    if section.args.is_empty() {
        ctx.error("Expected at least one argument", section.location);
    }
    let items = nested_groups(section, ctx)
        .into_iter()
        .filter_map(|inner| foundation_item(inner, ctx))
        .collect();
    Some(MutuallyGroup {
        items,
        metadata: sections.get("Metadata").map(|s| metadata_section(s, ctx)),
        location: group.location,
    })
}

fn foundation_item(group: &Group, ctx: &mut ValidationContext) -> Option<FoundationItem> {
    match group.first_section_name() {
        Some("Defines") => validate_defines(group, ctx).map(FoundationItem::Defines),
        Some("States") => validate_states(group, ctx).map(FoundationItem::States),
        _ => {
            ctx.error("Expected a Defines or States group", group.location);
            None
        }
    }
}
