//! Clauses
//!
//!     A clause is one entry of a clause-list section such as `means:` or `then:`. It is
//!     either a statement, a text, or a nested clause group picked by its first section:
//!
//!         if/then             iff/then            for/suchThat?/then
//!         exists/suchThat?    existsUnique/suchThat?
//!         not                 or                  piecewise/when/then/else?
//!         matching            generated/from/when?

use super::nodes::{Statement, TargetList, Text};
use super::sections::{
    expect_no_args, forbid_id, identify_sections, single_arg, target_list, ValidationContext,
};
use super::tree::{Argument, Group, Section, Target};
use crate::mathlingua::ast::Location;
use crate::mathlingua::lexing::TokenKind;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClauseList {
    pub clauses: Vec<Clause>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Statement(Statement),
    Text(Text),
    If(IfGroup),
    Iff(IffGroup),
    ForAll(ForAllGroup),
    Exists(ExistsGroup),
    ExistsUnique(ExistsGroup),
    Not(NotGroup),
    Or(OrGroup),
    Piecewise(PiecewiseGroup),
    Matching(MatchingGroup),
    Generated(GeneratedGroup),
}

impl Default for Clause {
    fn default() -> Self {
        Clause::Statement(Statement::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfGroup {
    pub conditions: ClauseList,
    pub then: ClauseList,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IffGroup {
    pub conditions: ClauseList,
    pub then: ClauseList,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForAllGroup {
    pub targets: TargetList,
    pub such_that: Option<ClauseList>,
    pub then: ClauseList,
    pub location: Location,
}

/// Shared by `exists:` and `existsUnique:`
#[derive(Debug, Clone, PartialEq)]
pub struct ExistsGroup {
    pub targets: TargetList,
    pub such_that: Option<ClauseList>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotGroup {
    pub clause: Box<Clause>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrGroup {
    pub clauses: ClauseList,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseGroup {
    pub when: ClauseList,
    pub then: ClauseList,
    pub otherwise: Option<ClauseList>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchingGroup {
    pub clauses: ClauseList,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedGroup {
    pub from: TargetList,
    pub when: Option<ClauseList>,
    pub location: Location,
}

impl GeneratedGroup {
    /// Constructor names listed in `from:` (`succ` for `succ(n)`)
    pub fn constructors(&self) -> Vec<String> {
        self.from
            .items
            .iter()
            .filter_map(|target| match target {
                Target::Token(token) if token.kind == TokenKind::Name => Some(token.text.clone()),
                Target::Abstraction(abstraction) => {
                    abstraction.name.as_ref().map(|name| name.text.clone())
                }
                _ => None,
            })
            .collect()
    }
}

impl Clause {
    pub fn location(&self) -> Location {
        match self {
            Clause::Statement(statement) => statement.location,
            Clause::Text(text) => text.location,
            Clause::If(group) => group.location,
            Clause::Iff(group) => group.location,
            Clause::ForAll(group) => group.location,
            Clause::Exists(group) | Clause::ExistsUnique(group) => group.location,
            Clause::Not(group) => group.location,
            Clause::Or(group) => group.location,
            Clause::Piecewise(group) => group.location,
            Clause::Matching(group) => group.location,
            Clause::Generated(group) => group.location,
        }
    }

    /// Clause lists nested directly inside this clause
    pub fn lists(&self) -> Vec<&ClauseList> {
        match self {
            Clause::Statement(_) | Clause::Text(_) | Clause::Not(_) => vec![],
            Clause::If(group) => vec![&group.conditions, &group.then],
            Clause::Iff(group) => vec![&group.conditions, &group.then],
            Clause::ForAll(group) => group
                .such_that
                .iter()
                .chain(std::iter::once(&group.then))
                .collect(),
            Clause::Exists(group) | Clause::ExistsUnique(group) => {
                group.such_that.iter().collect()
            }
            Clause::Or(group) => vec![&group.clauses],
            Clause::Piecewise(group) => [Some(&group.when), Some(&group.then), group.otherwise.as_ref()]
                .into_iter()
                .flatten()
                .collect(),
            Clause::Matching(group) => vec![&group.clauses],
            Clause::Generated(group) => group.when.iter().collect(),
        }
    }

    /// Every statement in this clause, depth first
    pub fn statements(&self) -> Vec<&Statement> {
        match self {
            Clause::Statement(statement) => vec![statement],
            Clause::Not(group) => group.clause.statements(),
            other => other
                .lists()
                .into_iter()
                .flat_map(ClauseList::statements)
                .collect(),
        }
    }
}

impl ClauseList {
    pub fn statements(&self) -> Vec<&Statement> {
        self.clauses.iter().flat_map(Clause::statements).collect()
    }

    /// Statements that are direct entries of this list, skipping nested groups
    pub fn top_level_statements(&self) -> Vec<&Statement> {
        self.clauses
            .iter()
            .filter_map(|clause| match clause {
                Clause::Statement(statement) => Some(statement),
                _ => None,
            })
            .collect()
    }

    /// Every `generated:` group in this list, at any depth
    pub fn generated_groups(&self) -> Vec<&GeneratedGroup> {
        let mut found = Vec::new();
        for clause in &self.clauses {
            match clause {
                Clause::Generated(group) => found.push(group),
                Clause::Not(group) => {
                    if let Clause::Generated(inner) = group.clause.as_ref() {
                        found.push(inner);
                    }
                }
                other => {
                    for list in other.lists() {
                        found.extend(list.generated_groups());
                    }
                }
            }
        }
        found
    }
}

pub fn clause_list(section: &Section, ctx: &mut ValidationContext) -> ClauseList {
    ClauseList {
        clauses: section.args.iter().map(|arg| to_clause(arg, ctx)).collect(),
        location: section.location,
    }
}

pub fn to_clause(arg: &Argument, ctx: &mut ValidationContext) -> Clause {
    match arg {
        Argument::Target(target) => {
            if let Some(token) = target.token_of(TokenKind::Statement) {
                Clause::Statement(Statement::from_token(token))
            } else if let Some(token) = target.token_of(TokenKind::String) {
                Clause::Text(Text::from_token(token))
            } else {
                ctx.error("Expected a clause", target.location());
                Clause::default()
            }
        }
        Argument::Group(group) => clause_group(group, ctx).unwrap_or_default(),
    }
}

fn clause_group(group: &Group, ctx: &mut ValidationContext) -> Option<Clause> {
    forbid_id(group, ctx);
    let location = group.location;
    match group.first_section_name() {
        Some("if") => {
            let sections = identify_sections(group, &["if", "then"], ctx)?;
            Some(Clause::If(IfGroup {
                conditions: clause_list(sections.get("if")?, ctx),
                then: clause_list(sections.get("then")?, ctx),
                location,
            }))
        }
        Some("iff") => {
            let sections = identify_sections(group, &["iff", "then"], ctx)?;
            Some(Clause::Iff(IffGroup {
                conditions: clause_list(sections.get("iff")?, ctx),
                then: clause_list(sections.get("then")?, ctx),
                location,
            }))
        }
        Some("for") => {
            let sections = identify_sections(group, &["for", "suchThat?", "then"], ctx)?;
            Some(Clause::ForAll(ForAllGroup {
                targets: target_list(sections.get("for")?, ctx),
                such_that: sections.get("suchThat").map(|s| clause_list(s, ctx)),
                then: clause_list(sections.get("then")?, ctx),
                location,
            }))
        }
        Some(name @ ("exists" | "existsUnique")) => {
            let (head, expected): (&'static str, [&'static str; 2]) = if name == "exists" {
                ("exists", ["exists", "suchThat?"])
            } else {
                ("existsUnique", ["existsUnique", "suchThat?"])
            };
            let sections = identify_sections(group, &expected, ctx)?;
            let exists = ExistsGroup {
                targets: target_list(sections.get(head)?, ctx),
                such_that: sections.get("suchThat").map(|s| clause_list(s, ctx)),
                location,
            };
            Some(if head == "exists" {
                Clause::Exists(exists)
            } else {
                Clause::ExistsUnique(exists)
            })
        }
        Some("not") => {
            let sections = identify_sections(group, &["not"], ctx)?;
            let clause = match single_arg(sections.get("not")?, ctx) {
                Some(arg) => to_clause(arg, ctx),
                None => Clause::default(),
            };
            Some(Clause::Not(NotGroup {
                clause: Box::new(clause),
                location,
            }))
        }
        Some("or") => {
            let sections = identify_sections(group, &["or"], ctx)?;
            Some(Clause::Or(OrGroup {
                clauses: clause_list(sections.get("or")?, ctx),
                location,
            }))
        }
        Some("piecewise") => {
            let sections =
                identify_sections(group, &["piecewise", "when", "then", "else?"], ctx)?;
            expect_no_args(sections.get("piecewise")?, ctx);
            Some(Clause::Piecewise(PiecewiseGroup {
                when: clause_list(sections.get("when")?, ctx),
                then: clause_list(sections.get("then")?, ctx),
                otherwise: sections.get("else").map(|s| clause_list(s, ctx)),
                location,
            }))
        }
        Some("matching") => {
            let sections = identify_sections(group, &["matching"], ctx)?;
            Some(Clause::Matching(MatchingGroup {
                clauses: clause_list(sections.get("matching")?, ctx),
                location,
            }))
        }
        Some("generated") => {
            let sections = identify_sections(group, &["generated", "from", "when?"], ctx)?;
            expect_no_args(sections.get("generated")?, ctx);
            Some(Clause::Generated(GeneratedGroup {
                from: target_list(sections.get("from")?, ctx),
                when: sections.get("when").map(|s| clause_list(s, ctx)),
                location,
            }))
        }
        _ => {
            ctx.error("Expected a clause", location);
            None
        }
    }
}
