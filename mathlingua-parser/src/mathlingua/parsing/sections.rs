//! Section identification and argument shapes
//!
//!     Every phase-2 validator starts by matching a group's sections against the list of
//!     sections it allows, written in order with a `?` suffix for optional ones:
//!
//!         identify_sections(group, &["Defines", "given?", "when?", "means?"], ctx)
//!
//!     and then converts each section's arguments to the shape it expects (a string list,
//!     a target list, a single statement, ...). Problems go into a shared
//!     [`ValidationContext`]; helpers return a default value on failure so sibling
//!     sections are still checked.

use super::nodes::{Id, Statement, StringList, TargetList, Text};
use super::tree::{Argument, Group, Section, Target};
use crate::mathlingua::ast::{Diagnostic, Location};
use crate::mathlingua::lexing::TokenKind;
use std::collections::HashMap;

/// Collects the diagnostics of a phase-2 pass
#[derive(Debug, Default)]
pub struct ValidationContext {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>, location: Location) {
        self.diagnostics
            .push(Diagnostic::structural(message, location));
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Sections of a group keyed by their expected name
#[derive(Debug)]
pub struct Sections<'a> {
    found: HashMap<&'static str, &'a Section>,
}

impl<'a> Sections<'a> {
    pub fn get(&self, name: &str) -> Option<&'a Section> {
        self.found.get(name).copied()
    }
}

/// Match `group`'s sections against `expected`, in order. Returns `None` after reporting
/// a missing, unexpected or duplicate section.
pub fn identify_sections<'a>(
    group: &'a Group,
    expected: &[&'static str],
    ctx: &mut ValidationContext,
) -> Option<Sections<'a>> {
    let specs: Vec<(&'static str, bool)> = expected
        .iter()
        .map(|name| match name.strip_suffix('?') {
            Some(stripped) => (stripped, true),
            None => (*name, false),
        })
        .collect();

    let errors_before = ctx.error_count();
    let mut found: HashMap<&'static str, &'a Section> = HashMap::new();
    let mut next = 0;

    for section in &group.sections {
        let name = section.name.text.as_str();
        if found.contains_key(name) {
            ctx.error(format!("Duplicate section {name}"), section.location);
            continue;
        }
        match specs[next..].iter().position(|(spec, _)| *spec == name) {
            Some(offset) => {
                for (skipped, optional) in &specs[next..next + offset] {
                    if !optional {
                        ctx.error(
                            format!("Expected a section named {skipped}"),
                            section.location,
                        );
                    }
                }
                found.insert(specs[next + offset].0, section);
                next += offset + 1;
            }
            None => ctx.error(format!("Unexpected section {name}"), section.location),
        }
    }

    for (missing, optional) in &specs[next..] {
        if !optional {
            ctx.error(format!("Expected a section named {missing}"), group.location);
        }
    }

    (ctx.error_count() == errors_before).then_some(Sections { found })
}

/// The target arguments of a section, reporting any nested group
pub fn targets<'a>(section: &'a Section, ctx: &mut ValidationContext) -> Vec<&'a Target> {
    section
        .args
        .iter()
        .filter_map(|arg| match arg {
            Argument::Target(target) => Some(target),
            Argument::Group(group) => {
                ctx.error("Expected a target", group.location);
                None
            }
        })
        .collect()
}

pub fn expect_no_args(section: &Section, ctx: &mut ValidationContext) {
    if let Some(arg) = section.args.first() {
        ctx.error("Expected no arguments", arg.location());
    }
}

pub fn single_arg<'a>(section: &'a Section, ctx: &mut ValidationContext) -> Option<&'a Argument> {
    match section.args.as_slice() {
        [arg] => Some(arg),
        _ => {
            ctx.error("Expected a single argument", section.location);
            None
        }
    }
}

pub fn to_statement(arg: &Argument, ctx: &mut ValidationContext) -> Statement {
    match arg {
        Argument::Target(target) => match target.token_of(TokenKind::Statement) {
            Some(token) => Statement::from_token(token),
            None => {
                ctx.error("Expected a statement", arg.location());
                Statement::default()
            }
        },
        Argument::Group(_) => {
            ctx.error("Expected a statement", arg.location());
            Statement::default()
        }
    }
}

pub fn to_text(arg: &Argument, ctx: &mut ValidationContext) -> Text {
    match arg {
        Argument::Target(target) => match target.token_of(TokenKind::String) {
            Some(token) => Text::from_token(token),
            None => {
                ctx.error("Expected a string", arg.location());
                Text::default()
            }
        },
        Argument::Group(_) => {
            ctx.error("Expected a string", arg.location());
            Text::default()
        }
    }
}

pub fn single_statement(section: &Section, ctx: &mut ValidationContext) -> Statement {
    match single_arg(section, ctx) {
        Some(arg) => to_statement(arg, ctx),
        None => Statement::default(),
    }
}

pub fn single_text(section: &Section, ctx: &mut ValidationContext) -> Text {
    match single_arg(section, ctx) {
        Some(arg) => to_text(arg, ctx),
        None => Text::default(),
    }
}

pub fn single_target(section: &Section, ctx: &mut ValidationContext) -> Option<Target> {
    match single_arg(section, ctx)? {
        Argument::Target(target) => Some(target.clone()),
        Argument::Group(group) => {
            ctx.error("Expected a target", group.location);
            None
        }
    }
}

pub fn string_list(section: &Section, ctx: &mut ValidationContext) -> StringList {
    StringList {
        items: section.args.iter().map(|arg| to_text(arg, ctx)).collect(),
        location: section.location,
    }
}

pub fn target_list(section: &Section, ctx: &mut ValidationContext) -> TargetList {
    if section.args.is_empty() {
        ctx.error("Expected at least one argument", section.location);
    }
    TargetList {
        items: targets(section, ctx).into_iter().cloned().collect(),
        location: section.location,
    }
}

/// The optional id line of a group, checked against whether the group kind wants one
pub fn group_id(group: &Group, required: bool, ctx: &mut ValidationContext) -> Option<Id> {
    match (&group.id, required) {
        (Some(token), _) => Some(Id::from_token(token)),
        (None, true) => {
            ctx.error("Expected an id", group.location);
            None
        }
        (None, false) => None,
    }
}

pub fn forbid_id(group: &Group, ctx: &mut ValidationContext) {
    if let Some(id) = &group.id {
        ctx.error("Unexpected id", id.location());
    }
}

/// The nested group arguments of a section
pub fn nested_groups<'a>(section: &'a Section, ctx: &mut ValidationContext) -> Vec<&'a Group> {
    section
        .args
        .iter()
        .filter_map(|arg| match arg {
            Argument::Group(group) => Some(group),
            Argument::Target(target) => {
                ctx.error("Expected a group", target.location());
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mathlingua::lexing::lex;
    use crate::mathlingua::parsing::tree::RootItem;
    use crate::mathlingua::parsing::tree_builder::build_tree;

    fn group(source: &str) -> Group {
        let (root, errors) = build_tree(&lex(source).tokens);
        assert!(errors.is_empty(), "{errors:?}");
        match root.items.into_iter().next() {
            Some(RootItem::Group(group)) => group,
            other => panic!("expected a group, found {other:?}"),
        }
    }

    fn messages(source: &str, expected: &[&'static str]) -> Vec<String> {
        let group = group(source);
        let mut ctx = ValidationContext::new();
        identify_sections(&group, expected, &mut ctx);
        ctx.into_diagnostics()
            .into_iter()
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn test_optional_sections_may_be_skipped() {
        let group = group("Defines: x\nmeans: 'y'\n");
        let mut ctx = ValidationContext::new();
        let sections = identify_sections(&group, &["Defines", "given?", "means?"], &mut ctx);
        let sections = sections.expect("sections should match");
        assert!(sections.get("given").is_none());
        assert_eq!(sections.get("means").map(|s| s.name.text.as_str()), Some("means"));
    }

    #[test]
    fn test_missing_required_section() {
        assert_eq!(
            messages("Theorem:\ngiven: x\n", &["Theorem", "given?", "then"]),
            vec!["Expected a section named then"]
        );
    }

    #[test]
    fn test_unexpected_and_misordered_sections() {
        assert_eq!(
            messages("Theorem:\nfoo: x\nthen: 'a'\n", &["Theorem", "then"]),
            vec!["Unexpected section foo"]
        );
        assert_eq!(
            messages("Theorem:\nthen: 'a'\ngiven: x\n", &["Theorem", "given?", "then"]),
            vec!["Unexpected section given"]
        );
    }

    #[test]
    fn test_duplicate_section() {
        assert_eq!(
            messages("Theorem:\nthen: 'a'\nthen: 'b'\n", &["Theorem", "then"]),
            vec!["Duplicate section then"]
        );
    }
}
