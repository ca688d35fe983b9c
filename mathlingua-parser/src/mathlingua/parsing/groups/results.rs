//! `Axiom:`, `Theorem:` and `Conjecture:` groups
//!
//! The three kinds share one shape; only a Theorem may carry a `Proof:`.

use super::shared::{metadata_section, MetadataSection};
use crate::mathlingua::ast::Location;
use crate::mathlingua::parsing::clauses::{clause_list, ClauseList};
use crate::mathlingua::parsing::nodes::{Id, Statement, StringList, TargetList};
use crate::mathlingua::parsing::sections::{
    group_id, identify_sections, string_list, target_list, ValidationContext,
};
use crate::mathlingua::parsing::tree::Group;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Axiom,
    Theorem,
    Conjecture,
}

impl ResultKind {
    pub fn from_section_name(name: &str) -> Option<Self> {
        match name {
            "Axiom" => Some(ResultKind::Axiom),
            "Theorem" => Some(ResultKind::Theorem),
            "Conjecture" => Some(ResultKind::Conjecture),
            _ => None,
        }
    }

    pub fn section_name(self) -> &'static str {
        match self {
            ResultKind::Axiom => "Axiom",
            ResultKind::Theorem => "Theorem",
            ResultKind::Conjecture => "Conjecture",
        }
    }

    fn expected_sections(self) -> &'static [&'static str] {
        match self {
            ResultKind::Axiom => &[
                "Axiom", "given?", "where?", "if?", "iff?", "then", "using?", "Metadata?",
            ],
            ResultKind::Theorem => &[
                "Theorem", "given?", "where?", "if?", "iff?", "then", "using?", "Proof?",
                "Metadata?",
            ],
            ResultKind::Conjecture => &[
                "Conjecture", "given?", "where?", "if?", "iff?", "then", "using?", "Metadata?",
            ],
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.section_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultGroup {
    pub kind: ResultKind,
    pub id: Option<Id>,
    pub names: StringList,
    pub given: Option<TargetList>,
    pub where_: Option<ClauseList>,
    pub if_: Option<ClauseList>,
    pub iff: Option<ClauseList>,
    pub then: ClauseList,
    pub using: Option<ClauseList>,
    pub proof: Option<ClauseList>,
    pub metadata: Option<MetadataSection>,
    pub location: Location,
}

impl ResultGroup {
    pub fn clause_lists(&self) -> Vec<(&'static str, &ClauseList)> {
        [
            ("where", self.where_.as_ref()),
            ("if", self.if_.as_ref()),
            ("iff", self.iff.as_ref()),
            ("then", Some(&self.then)),
            ("using", self.using.as_ref()),
            ("Proof", self.proof.as_ref()),
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

pub fn validate_result(
    kind: ResultKind,
    group: &Group,
    ctx: &mut ValidationContext,
) -> Option<ResultGroup> {
    let id = group_id(group, false, ctx);
    let sections = identify_sections(group, kind.expected_sections(), ctx)?;

    Some(ResultGroup {
        kind,
        id,
        names: string_list(sections.get(kind.section_name())?, ctx),
        given: sections.get("given").map(|s| target_list(s, ctx)),
        where_: sections.get("where").map(|s| clause_list(s, ctx)),
        if_: sections.get("if").map(|s| clause_list(s, ctx)),
        iff: sections.get("iff").map(|s| clause_list(s, ctx)),
        then: clause_list(sections.get("then")?, ctx),
        using: sections.get("using").map(|s| clause_list(s, ctx)),
        proof: sections.get("Proof").map(|s| clause_list(s, ctx)),
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
    use rstest::rstest;

    fn validate(kind: ResultKind, source: &str) -> (Option<ResultGroup>, Vec<String>) {
        let (root, errors) = build_tree(&lex(source).tokens);
        assert!(errors.is_empty(), "{errors:?}");
        let Some(RootItem::Group(group)) = root.items.first() else {
            panic!("expected a group");
        };
        let mut ctx = ValidationContext::new();
        let result = validate_result(kind, group, &mut ctx);
        let messages = ctx.into_diagnostics().into_iter().map(|d| d.message).collect();
        (result, messages)
    }

    #[rstest]
    #[case(ResultKind::Axiom, "Axiom:\nthen: 'x'\n")]
    #[case(ResultKind::Theorem, "Theorem: \"Name\"\ngiven: x\nthen: 'x'\nProof: \"trivial\"\n")]
    #[case(ResultKind::Conjecture, "[\\c]\nConjecture:\nif: 'a'\nthen: 'b'\n")]
    fn test_valid_results(#[case] kind: ResultKind, #[case] source: &str) {
        let (result, errors) = validate(kind, source);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(result.map(|r| r.kind), Some(kind));
    }

    #[test]
    fn test_only_theorems_have_proofs() {
        let (result, errors) = validate(ResultKind::Axiom, "Axiom:\nthen: 'x'\nProof: \"p\"\n");
        assert!(result.is_none());
        assert_eq!(errors, vec!["Unexpected section Proof"]);
    }
}
