//! `Defines:` groups
//!
//!     [\function{f}]
//!     Defines: f
//!     given: A, B
//!     means: 'f is \relation{A, B}'
//!     expressing: ...
//!     written: "f?"
//!
//! A Defines with an `expressing:` section produces a value and may be used anywhere an
//! expression is expected. Without one it can only appear on the right of `is`/`in`.

use super::shared::{metadata_section, providing_section, MetadataSection, ProvidingSection};
use crate::mathlingua::ast::Location;
use crate::mathlingua::parsing::clauses::{clause_list, ClauseList};
use crate::mathlingua::parsing::nodes::{Id, Statement, StringList, TargetList};
use crate::mathlingua::parsing::sections::{
    group_id, identify_sections, single_target, string_list, target_list, ValidationContext,
};
use crate::mathlingua::parsing::tree::{Group, Target};

pub const DEFINES_SECTIONS: &[&str] = &[
    "Defines",
    "given?",
    "when?",
    "suchThat?",
    "means?",
    "satisfying?",
    "expressing?",
    "providing?",
    "using?",
    "written?",
    "called?",
    "Metadata?",
];

#[derive(Debug, Clone, PartialEq)]
pub struct DefinesGroup {
    pub id: Id,
    pub target: Target,
    pub given: Option<TargetList>,
    pub when: Option<ClauseList>,
    pub such_that: Option<ClauseList>,
    pub means: Option<ClauseList>,
    pub satisfying: Option<ClauseList>,
    pub expressing: Option<ClauseList>,
    pub providing: Option<ProvidingSection>,
    pub using: Option<ClauseList>,
    pub written: Option<StringList>,
    pub called: Option<StringList>,
    pub metadata: Option<MetadataSection>,
    pub location: Location,
}

impl DefinesGroup {
    pub fn has_expressing(&self) -> bool {
        self.expressing.is_some()
    }

    /// Clause lists in section order
    pub fn clause_lists(&self) -> Vec<(&'static str, &ClauseList)> {
        [
            ("when", &self.when),
            ("suchThat", &self.such_that),
            ("means", &self.means),
            ("satisfying", &self.satisfying),
            ("expressing", &self.expressing),
            ("using", &self.using),
        ]
        .into_iter()
        .filter_map(|(name, list)| list.as_ref().map(|list| (name, list)))
        .collect()
    }

    /// Every statement outside the id, in section order
    pub fn statements(&self) -> Vec<&Statement> {
        let mut statements: Vec<&Statement> = self
            .clause_lists()
            .into_iter()
            .flat_map(|(_, list)| list.statements())
            .collect();
        if let Some(providing) = &self.providing {
            statements.extend(providing.statements());
        }
        statements
    }
}

pub fn validate_defines(group: &Group, ctx: &mut ValidationContext) -> Option<DefinesGroup> {
    let id = group_id(group, true, ctx);
    let sections = identify_sections(group, DEFINES_SECTIONS, ctx)?;
    let target = single_target(sections.get("Defines")?, ctx);

    let defines = DefinesGroup {
        id: id.unwrap_or_default(),
        given: sections.get("given").map(|s| target_list(s, ctx)),
        when: sections.get("when").map(|s| clause_list(s, ctx)),
        such_that: sections.get("suchThat").map(|s| clause_list(s, ctx)),
        means: sections.get("means").map(|s| clause_list(s, ctx)),
        satisfying: sections.get("satisfying").map(|s| clause_list(s, ctx)),
        expressing: sections.get("expressing").map(|s| clause_list(s, ctx)),
        providing: sections.get("providing").map(|s| providing_section(s, ctx)),
        using: sections.get("using").map(|s| clause_list(s, ctx)),
        written: sections.get("written").map(|s| string_list(s, ctx)),
        called: sections.get("called").map(|s| string_list(s, ctx)),
        metadata: sections.get("Metadata").map(|s| metadata_section(s, ctx)),
        location: group.location,
        // Last, so the other sections are still checked when the target is malformed.
        target: target?,
    };
    Some(defines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mathlingua::lexing::lex;
    use crate::mathlingua::parsing::tree::RootItem;
    use crate::mathlingua::parsing::tree_builder::build_tree;

    fn validate(source: &str) -> (Option<DefinesGroup>, Vec<String>) {
        let (root, errors) = build_tree(&lex(source).tokens);
        assert!(errors.is_empty(), "{errors:?}");
        let Some(RootItem::Group(group)) = root.items.first() else {
            panic!("expected a group");
        };
        let mut ctx = ValidationContext::new();
        let defines = validate_defines(group, &mut ctx);
        let messages = ctx.into_diagnostics().into_iter().map(|d| d.message).collect();
        (defines, messages)
    }

    #[test]
    fn test_full_defines() {
        let source = "[\\function{f}]\nDefines: f\ngiven: A, B\nmeans: 'f is \\relation{A, B}'\nexpressing: 'f'\nwritten: \"f?\"\n";
        let (defines, errors) = validate(source);
        assert!(errors.is_empty(), "{errors:?}");
        let defines = defines.expect("defines should validate");
        assert_eq!(defines.id.text(), "\\function{f}");
        assert!(defines.has_expressing());
        assert_eq!(defines.given.map(|g| g.names()), Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(defines.written.map(|w| w.items.len()), Some(1));
    }

    #[test]
    fn test_defines_requires_an_id() {
        let (_, errors) = validate("Defines: x\nmeans: 'x'\n");
        assert_eq!(errors, vec!["Expected an id"]);
    }

    #[test]
    fn test_defines_takes_one_target() {
        let (defines, errors) = validate("[\\x]\nDefines: x, y\n");
        assert!(defines.is_none());
        assert_eq!(errors, vec!["Expected a single argument"]);
    }
}
