//! `States:` groups, predicate-like definitions whose body is a `that:` section

use super::shared::{metadata_section, MetadataSection};
use crate::mathlingua::ast::Location;
use crate::mathlingua::parsing::clauses::{clause_list, ClauseList};
use crate::mathlingua::parsing::nodes::{Id, Statement, StringList, TargetList};
use crate::mathlingua::parsing::sections::{
    expect_no_args, group_id, identify_sections, string_list, target_list, ValidationContext,
};
use crate::mathlingua::parsing::tree::Group;

pub const STATES_SECTIONS: &[&str] = &[
    "States",
    "given?",
    "when?",
    "suchThat?",
    "that",
    "using?",
    "written?",
    "called?",
    "Metadata?",
];

#[derive(Debug, Clone, PartialEq)]
pub struct StatesGroup {
    pub id: Id,
    pub given: Option<TargetList>,
    pub when: Option<ClauseList>,
    pub such_that: Option<ClauseList>,
    pub that: ClauseList,
    pub using: Option<ClauseList>,
    pub written: Option<StringList>,
    pub called: Option<StringList>,
    pub metadata: Option<MetadataSection>,
    pub location: Location,
}

impl StatesGroup {
    pub fn clause_lists(&self) -> Vec<(&'static str, &ClauseList)> {
        [
            ("when", self.when.as_ref()),
            ("suchThat", self.such_that.as_ref()),
            ("that", Some(&self.that)),
            ("using", self.using.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, list)| list.map(|list| (name, list)))
        .collect()
    }

    pub fn statements(&self) -> Vec<&Statement> {
        self.clause_lists()
            .into_iter()
            .flat_map(|(_, list)| list.statements())
            .collect()
    }
}

pub fn validate_states(group: &Group, ctx: &mut ValidationContext) -> Option<StatesGroup> {
    let id = group_id(group, true, ctx);
    let sections = identify_sections(group, STATES_SECTIONS, ctx)?;
    expect_no_args(sections.get("States")?, ctx);

    Some(StatesGroup {
        id: id.unwrap_or_default(),
        given: sections.get("given").map(|s| target_list(s, ctx)),
        when: sections.get("when").map(|s| clause_list(s, ctx)),
        such_that: sections.get("suchThat").map(|s| clause_list(s, ctx)),
        that: clause_list(sections.get("that")?, ctx),
        using: sections.get("using").map(|s| clause_list(s, ctx)),
        written: sections.get("written").map(|s| string_list(s, ctx)),
        called: sections.get("called").map(|s| string_list(s, ctx)),
        metadata: sections.get("Metadata").map(|s| metadata_section(s, ctx)),
        location: group.location,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mathlingua::lexing::lex;
    use crate::mathlingua::parsing::tree::RootItem;
    use crate::mathlingua::parsing::tree_builder::build_tree;

    #[test]
    fn test_states_group() {
        let source = "[\\continuous{f}]\nStates:\ngiven: f\nthat: 'f is \\function'\nwritten: \"f? is continuous\"\n";
        let (root, errors) = build_tree(&lex(source).tokens);
        assert!(errors.is_empty(), "{errors:?}");
        let Some(RootItem::Group(group)) = root.items.first() else {
            panic!("expected a group");
        };
        let mut ctx = ValidationContext::new();
        let states = validate_states(group, &mut ctx).expect("states should validate");
        assert!(!ctx.has_errors());
        assert_eq!(states.that.clauses.len(), 1);
        assert_eq!(states.statements().len(), 1);
    }
}
