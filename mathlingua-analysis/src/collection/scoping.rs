//! Input/output scoping of `Defines:` groups
//!
//!     outputs   the `Defines:` targets
//!     inputs    names inside the id, plus `given:` targets
//!
//! `when:` may not describe an output. `means:`, `satisfying:` and `expressing:` may not
//! describe a name that is only an input.

use super::checks::PathDiagnostic;
use super::SourceCollection;
use crate::usage::{described_names, mentioned_names};
use mathlingua_parser::mathlingua::parsing::groups::DefinesGroup;
use mathlingua_parser::mathlingua::parsing::{ClauseList, Definition};
use mathlingua_parser::{Diagnostic, Location};
use std::collections::BTreeSet;

struct Scope {
    outputs: BTreeSet<String>,
    inputs: BTreeSet<String>,
}

impl Scope {
    fn of(defines: &DefinesGroup) -> Self {
        let outputs = defines.target.names().into_iter().collect();
        let mut inputs: BTreeSet<String> = defines
            .id
            .statement
            .value()
            .map(mentioned_names)
            .unwrap_or_default()
            .into_iter()
            .collect();
        if let Some(given) = &defines.given {
            inputs.extend(given.names());
        }
        Self { outputs, inputs }
    }
}

/// Names described by the statements of `list`, in file coordinates
fn described_in(list: &ClauseList) -> Vec<(String, Location)> {
    list.statements()
        .into_iter()
        .filter_map(|statement| {
            let origin = statement.text_origin();
            statement.value().map(|expression| {
                described_names(expression)
                    .into_iter()
                    .map(move |(name, location)| (name, location.offset_by(origin)))
            })
        })
        .flatten()
        .collect()
}

pub(super) fn scoping_errors(defines: &DefinesGroup) -> Vec<Diagnostic> {
    let scope = Scope::of(defines);
    let mut diagnostics = Vec::new();

    for (name, location) in defines.when.iter().flat_map(described_in) {
        if scope.outputs.contains(&name) {
            diagnostics.push(Diagnostic::semantic(
                format!(
                    "A `when:` section cannot describe a symbol introduced in a `Defines:` section but found '{name}'"
                ),
                location,
            ));
        }
    }

    for list in [&defines.means, &defines.satisfying, &defines.expressing]
        .into_iter()
        .flatten()
    {
        for (name, location) in described_in(list) {
            if scope.inputs.contains(&name) && !scope.outputs.contains(&name) {
                diagnostics.push(Diagnostic::semantic(
                    format!(
                        "A `satisfying:` or `expressing:` section cannot describe a symbol introduced in a [...] or `given:` section but found '{name}'"
                    ),
                    location,
                ));
            }
        }
    }
    diagnostics
}

impl SourceCollection {
    pub fn get_scoping_errors(&self) -> Vec<PathDiagnostic> {
        let mut diagnostics = Vec::new();
        for (_, located) in self.valid_groups() {
            for definition in located.group.definitions() {
                if let Definition::Defines(defines) = definition {
                    diagnostics.extend(
                        scoping_errors(defines)
                            .into_iter()
                            .map(|diagnostic| PathDiagnostic::new(located.path, diagnostic)),
                    );
                }
            }
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathlingua_parser::mathlingua::parsing::{parse, TopLevelGroup};

    fn errors(source: &str) -> Vec<Diagnostic> {
        let document = parse(source).into_result().expect("source parses");
        match &document.groups[0] {
            TopLevelGroup::Defines(defines) => scoping_errors(defines),
            other => panic!("expected a Defines, found {}", other.kind_name()),
        }
    }

    #[test]
    fn test_when_cannot_describe_outputs() {
        let found = errors("[\\f{A}]\nDefines: f\nwhen: 'f is \\set'\nmeans: 'f is \\thing'\n");
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].message,
            "A `when:` section cannot describe a symbol introduced in a `Defines:` section but found 'f'"
        );
        assert_eq!(found[0].location(), Location::new(2, 7));
    }

    #[test]
    fn test_body_cannot_describe_inputs() {
        let found = errors("[\\f{A}]\nDefines: f\ngiven: B\nwhen: 'A is \\set'\nmeans:\n. 'B is \\set'\n. 'A := \\thing'\n");
        let names: Vec<&str> = found
            .iter()
            .map(|d| d.message.rsplit('\'').nth(1).unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_outputs_may_be_described_in_the_body() {
        assert!(errors("[\\f{A}]\nDefines: f\nwhen: 'A is \\set'\nmeans: 'f is \\thing'\n").is_empty());
    }
}
