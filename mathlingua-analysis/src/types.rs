//! Type hierarchy
//!
//! Two relations are read off `Defines:` groups:
//!
//!     - is-a: a `means:` holding exactly one statement of the form `x is \parent...` makes
//!       the defined signature a child of `\parent`. Each signature has at most one parent;
//!       the last group added wins.
//!     - viewable-as: each `view:` under `providing:` adds an edge to the first signature of
//!       its `as:` statement. A signature can have many of these.
//!
//! Source files are not guaranteed to be acyclic, so both walks carry a visited set.

use mathlingua_parser::mathlingua::expression::{Expression, RelationKind};
use mathlingua_parser::mathlingua::parsing::groups::DefinesGroup;
use mathlingua_parser::mathlingua::parsing::Definition;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

#[derive(Debug, Clone, Default)]
pub struct TypeManager {
    parents: HashMap<String, String>,
    views: HashMap<String, BTreeSet<String>>,
}

fn parent_of(defines: &DefinesGroup) -> Option<String> {
    let statements = defines.means.as_ref()?.statements();
    let [statement] = statements.as_slice() else {
        return None;
    };
    match statement.value()? {
        Expression::Relation(relation) if relation.kind == RelationKind::Is => relation
            .rhs
            .iter()
            .flat_map(Expression::signatures_within)
            .next(),
        _ => None,
    }
}

fn view_targets(defines: &DefinesGroup) -> Vec<String> {
    defines
        .providing
        .iter()
        .flat_map(|providing| providing.views())
        .filter_map(|view| {
            view.as_
                .value()
                .and_then(|expression| expression.signatures_within().into_iter().next())
        })
        .collect()
}

impl TypeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, defines: &DefinesGroup) {
        let Some(signature) = Definition::Defines(defines).signature() else {
            return;
        };
        if let Some(parent) = parent_of(defines) {
            tracing::trace!(child = %signature.form, parent = %parent, "is-a edge");
            self.parents.insert(signature.form.clone(), parent);
        }
        for target in view_targets(defines) {
            tracing::trace!(from = %signature.form, to = %target, "viewable-as edge");
            self.views
                .entry(signature.form.clone())
                .or_default()
                .insert(target);
        }
    }

    /// Forget the edges leaving this group's signature. Edges from other signatures that
    /// point at it are left in place.
    pub fn remove(&mut self, defines: &DefinesGroup) {
        if let Some(signature) = Definition::Defines(defines).signature() {
            self.parents.remove(&signature.form);
            self.views.remove(&signature.form);
        }
    }

    pub fn parent(&self, signature: &str) -> Option<&str> {
        self.parents.get(signature).map(String::as_str)
    }

    /// Follow the parent chain up from `child` looking for `ancestor`.
    pub fn is_sig_descendent_of(&self, child: &str, ancestor: &str) -> bool {
        let mut visited = HashSet::new();
        let mut current = self.parent(child);
        while let Some(signature) = current {
            if signature == ancestor {
                return true;
            }
            if !visited.insert(signature) {
                return false;
            }
            current = self.parent(signature);
        }
        false
    }

    /// Breadth-first search over view edges from `from`.
    pub fn is_sig_viewable_as(&self, from: &str, to: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::from([from]);
        let mut queue: VecDeque<&str> = VecDeque::from([from]);
        while let Some(signature) = queue.pop_front() {
            if signature == to || self.is_sig_descendent_of(signature, to) {
                return true;
            }
            for next in self.views.get(signature).into_iter().flatten() {
                if visited.insert(next.as_str()) {
                    queue.push_back(next.as_str());
                }
            }
        }
        false
    }

    pub fn is_sig_is(&self, from: &str, to: &str) -> bool {
        self.is_sig_descendent_of(from, to) || self.is_sig_viewable_as(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathlingua_parser::mathlingua::parsing::{parse, TopLevelGroup};

    fn manager(source: &str) -> TypeManager {
        let document = parse(source).into_result().expect("source parses");
        let mut types = TypeManager::new();
        for group in &document.groups {
            if let TopLevelGroup::Defines(defines) = group {
                types.add(defines);
            }
        }
        types
    }

    const CHAIN: &str = "[\\A]\nDefines: a\nmeans: 'a is \\B'\n\n[\\B]\nDefines: b\nmeans: 'b is \\C'\n\n[\\C]\nDefines: c\nwritten: \"c\"\n";

    #[test]
    fn test_descendents_follow_the_chain() {
        let types = manager(CHAIN);
        assert!(types.is_sig_descendent_of("\\A", "\\C"));
        assert!(types.is_sig_descendent_of("\\A", "\\B"));
        assert!(!types.is_sig_descendent_of("\\C", "\\A"));
        assert!(!types.is_sig_descendent_of("\\A", "\\A"));
    }

    #[test]
    fn test_cycles_terminate() {
        let source = "[\\A]\nDefines: a\nmeans: 'a is \\B'\n\n[\\B]\nDefines: b\nmeans: 'b is \\A'\n";
        let types = manager(source);
        assert!(types.is_sig_descendent_of("\\A", "\\B"));
        assert!(types.is_sig_descendent_of("\\A", "\\A"));
        assert!(!types.is_sig_descendent_of("\\A", "\\D"));
        assert!(!types.is_sig_viewable_as("\\A", "\\D"));
    }

    #[test]
    fn test_multi_statement_means_has_no_parent() {
        let types = manager("[\\A]\nDefines: a\nmeans:\n. 'a is \\B'\n. 'a is \\C'\n");
        assert_eq!(types.parent("\\A"), None);
    }

    #[test]
    fn test_viewable_as_through_views_and_parents() {
        let source = "[\\A]\nDefines: a\nmeans: 'a is \\B'\nproviding:\n. view:\n  as: '\\V'\n\n[\\V]\nDefines: v\nmeans: 'v is \\W'\n";
        let types = manager(source);
        assert!(types.is_sig_viewable_as("\\A", "\\A"));
        assert!(types.is_sig_viewable_as("\\A", "\\V"));
        assert!(types.is_sig_viewable_as("\\A", "\\W"));
        assert!(types.is_sig_is("\\A", "\\B"));
        assert!(!types.is_sig_is("\\V", "\\A"));
    }

    #[test]
    fn test_remove_drops_outgoing_edges() {
        let document = parse(CHAIN).into_result().expect("source parses");
        let mut types = TypeManager::new();
        let mut defines = Vec::new();
        for group in &document.groups {
            if let TopLevelGroup::Defines(group) = group {
                types.add(group);
                defines.push(group);
            }
        }
        types.remove(defines[1]);
        assert!(types.is_sig_descendent_of("\\A", "\\B"));
        assert!(!types.is_sig_descendent_of("\\A", "\\C"));
    }
}
