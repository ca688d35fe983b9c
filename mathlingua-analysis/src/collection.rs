//! Source collection
//!
//!     The cross-file index over every source file of a corpus:
//!
//!         signature   -> defining groups (path, top-level index, location)
//!         words       -> autocomplete trie (lowercased) and search index
//!         signatures  -> autocomplete trie (case-sensitive)
//!         Defines     -> type hierarchy
//!         definitions -> expansion engine
//!
//!     Only files that parsed are indexed. A file that failed contributes its parse
//!     diagnostics to [`SourceCollection::check`] and nothing else.
//!
//!     Mutation goes through `&mut self`; [`SharedSourceCollection`] adds the
//!     single-writer/many-reader lock for callers that share one collection across threads.
//!     The render cache is the only state touched through `&self` and sits behind a mutex.

mod checks;
mod render;
mod scoping;
mod shared;

pub use checks::PathDiagnostic;
pub use render::{RenderMode, RenderOptions};
pub use shared::SharedSourceCollection;

use crate::completion::PrefixTrie;
use crate::error::CollectionError;
use crate::expansion::{ExpansionEngine, DEFAULT_MAX_ITERATIONS};
use crate::paths::{natural_cmp, sort_paths};
use crate::search::SearchIndex;
use crate::source::SourceFile;
use crate::types::TypeManager;
use crate::usage::used_signatures;
use mathlingua_parser::mathlingua::expression::Expression;
use mathlingua_parser::mathlingua::parsing::groups::ResultKind;
use mathlingua_parser::mathlingua::parsing::{Definition, Locatable, TopLevelGroup};
use mathlingua_parser::Location;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionOptions {
    /// Leave `+`, `*` and other non-backslash signatures out of the undefined check
    pub skip_operator_signatures: bool,
    pub max_expansion_iterations: usize,
    pub html_class_prefix: String,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            skip_operator_signatures: true,
            max_expansion_iterations: DEFAULT_MAX_ITERATIONS,
            html_class_prefix: "mathlingua".to_string(),
        }
    }
}

/// Where a signature is defined
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRef {
    pub path: String,
    pub index: usize,
    pub location: Location,
}

/// A top-level group together with the file it lives in
#[derive(Debug, Clone, Copy)]
pub struct LocatedGroup<'a> {
    pub path: &'a str,
    pub index: usize,
    pub group: &'a TopLevelGroup,
}

/// What kind of group a signature refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureKind {
    Defines { expressing: bool },
    States,
    Result(ResultKind),
    /// `<outer>.<ctor>` from a `generated:` clause
    Constructor,
}

#[derive(Debug, Clone)]
struct IndexedGroup {
    path: String,
    index: usize,
    kind: &'static str,
    normalized: TopLevelGroup,
}

#[derive(Debug, Default)]
pub struct SourceCollection {
    files: BTreeMap<String, SourceFile>,
    signatures: BTreeMap<String, Vec<GroupRef>>,
    groups: Vec<IndexedGroup>,
    words: PrefixTrie,
    signature_trie: PrefixTrie,
    search: SearchIndex,
    types: TypeManager,
    engine: ExpansionEngine,
    options: CollectionOptions,
    render_cache: Mutex<HashMap<(String, usize, RenderOptions), String>>,
}

impl SourceCollection {
    pub fn new() -> Self {
        Self::with_options(CollectionOptions::default())
    }

    pub fn with_options(options: CollectionOptions) -> Self {
        Self {
            engine: ExpansionEngine::new(options.max_expansion_iterations),
            options,
            ..Self::default()
        }
    }

    /// Parse every `(path, content)` pair in parallel, then index the results in path order.
    pub fn from_sources<P, C>(sources: Vec<(P, C)>, options: CollectionOptions) -> Self
    where
        P: Into<String> + Send,
        C: Into<String> + Send,
    {
        let parsed: Vec<SourceFile> = sources
            .into_par_iter()
            .map(|(path, content)| SourceFile::parse(path, content))
            .collect();
        let mut collection = Self::with_options(options);
        for file in parsed {
            collection.add_source(file);
        }
        collection
    }

    pub fn options(&self) -> &CollectionOptions {
        &self.options
    }

    /// Parse and add `content` under `path`.
    pub fn add_text(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.add_source(SourceFile::parse(path, content));
    }

    /// Add a parsed file, replacing any file already registered under its path.
    pub fn add_source(&mut self, file: SourceFile) {
        let path = file.path.clone();
        if self.files.contains_key(&path) {
            self.unindex(&path);
        }
        self.index(&file);
        self.files.insert(path.clone(), file);
        self.rebuild_engine();
        self.clear_render_cache();
        tracing::debug!(path = %path, files = self.files.len(), "added source");
    }

    /// Remove `path` and everything indexed from it.
    pub fn remove_source(&mut self, path: &str) -> Option<SourceFile> {
        if !self.files.contains_key(path) {
            return None;
        }
        self.unindex(path);
        let removed = self.files.remove(path);
        self.rebuild_engine();
        self.clear_render_cache();
        tracing::debug!(path = %path, files = self.files.len(), "removed source");
        removed
    }

    fn index(&mut self, file: &SourceFile) {
        let Some(document) = file.document() else {
            return;
        };
        let words = file.words();
        for word in &words {
            self.words.insert(word);
        }
        self.search.add(&file.path, &words);

        for (index, group) in document.groups.iter().enumerate() {
            for signature in group.signatures() {
                self.signature_trie.insert(&signature.form);
                self.signatures
                    .entry(signature.form)
                    .or_default()
                    .push(GroupRef {
                        path: file.path.clone(),
                        index,
                        location: signature.location,
                    });
            }
            for definition in group.definitions() {
                if let Definition::Defines(defines) = definition {
                    self.types.add(defines);
                }
            }
            self.groups.push(IndexedGroup {
                path: file.path.clone(),
                index,
                kind: group.kind_name(),
                normalized: group.clone().normalized(),
            });
        }
    }

    fn unindex(&mut self, path: &str) {
        let Some(file) = self.files.get(path) else {
            return;
        };
        let Some(document) = file.document() else {
            return;
        };
        for word in file.words() {
            self.words.remove(&word);
        }
        self.search.remove(path);
        for group in &document.groups {
            for signature in group.signatures() {
                self.signature_trie.remove(&signature.form);
                if let Some(refs) = self.signatures.get_mut(&signature.form) {
                    refs.retain(|r| r.path != path);
                    if refs.is_empty() {
                        self.signatures.remove(&signature.form);
                    }
                }
            }
            for definition in group.definitions() {
                if let Definition::Defines(defines) = definition {
                    self.types.remove(defines);
                }
            }
        }
        self.groups.retain(|group| group.path != path);
    }

    fn rebuild_engine(&mut self) {
        let mut engine = ExpansionEngine::new(self.options.max_expansion_iterations);
        for (_, located) in self.valid_groups() {
            for definition in located.group.definitions() {
                engine.add_definition(definition);
            }
        }
        self.engine = engine;
    }

    fn clear_render_cache(&self) {
        self.render_cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }

    pub fn file(&self, path: &str) -> Option<&SourceFile> {
        self.files.get(path)
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    pub fn types(&self) -> &TypeManager {
        &self.types
    }

    pub fn engine(&self) -> &ExpansionEngine {
        &self.engine
    }

    /// Top-level groups of every file that parsed, in natural path order
    fn valid_groups(&self) -> Vec<(&SourceFile, LocatedGroup<'_>)> {
        let mut files: Vec<&SourceFile> = self.files.values().collect();
        files.sort_by(|a, b| natural_cmp(&a.path, &b.path));
        files
            .into_iter()
            .filter_map(|file| file.document().map(|document| (file, document)))
            .flat_map(|(file, document)| {
                document.groups.iter().enumerate().map(move |(index, group)| {
                    (
                        file,
                        LocatedGroup {
                            path: &file.path,
                            index,
                            group,
                        },
                    )
                })
            })
            .collect()
    }

    pub fn group(&self, path: &str, index: usize) -> Result<&TopLevelGroup, CollectionError> {
        let file = self
            .files
            .get(path)
            .ok_or_else(|| CollectionError::UnknownPath(path.to_string()))?;
        let document = file
            .document()
            .ok_or_else(|| CollectionError::InvalidSource(path.to_string()))?;
        document
            .groups
            .get(index)
            .ok_or_else(|| CollectionError::UnknownGroup {
                path: path.to_string(),
                index,
            })
    }

    /// Every group defining `signature`, in the order they were added
    pub fn get_with_signature(&self, signature: &str) -> Result<Vec<LocatedGroup<'_>>, CollectionError> {
        let refs = self
            .signatures
            .get(signature)
            .ok_or_else(|| CollectionError::UnknownSignature(signature.to_string()))?;
        refs.iter()
            .map(|r| {
                let group = self.group(&r.path, r.index)?;
                Ok(LocatedGroup {
                    path: &r.path,
                    index: r.index,
                    group,
                })
            })
            .collect()
    }

    pub fn signature_refs(&self, signature: &str) -> &[GroupRef] {
        self.signatures
            .get(signature)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_defined(&self, signature: &str) -> bool {
        self.signatures.contains_key(signature)
    }

    pub fn defined_signatures(&self) -> impl Iterator<Item = &str> {
        self.signatures.keys().map(String::as_str)
    }

    /// The Defines or States introducing `signature` directly (constructors have none)
    pub fn definition(&self, signature: &str) -> Option<Definition<'_>> {
        let first = self.signatures.get(signature)?.first()?;
        self.group(&first.path, first.index)
            .ok()?
            .definitions()
            .into_iter()
            .find(|definition| {
                definition
                    .signature()
                    .is_some_and(|found| found.form == signature)
            })
    }

    /// The parsed id expression of the definition of `signature`
    pub fn definition_id(&self, signature: &str) -> Option<&Expression> {
        self.definition(signature)?.id().statement.value()
    }

    pub fn signature_kind(&self, signature: &str) -> Option<SignatureKind> {
        let first = self.signatures.get(signature)?.first()?;
        let group = self.group(&first.path, first.index).ok()?;
        if let Some(result) = group.as_result() {
            return Some(SignatureKind::Result(result.kind));
        }
        Some(match self.definition(signature) {
            Some(Definition::States(_)) => SignatureKind::States,
            Some(definition) => SignatureKind::Defines {
                expressing: definition.has_expressing(),
            },
            None => SignatureKind::Constructor,
        })
    }

    /// Every path in natural order
    pub fn get_all_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.files.keys().cloned().collect();
        sort_paths(&mut paths);
        paths
    }

    pub fn get_first_path(&self) -> Option<String> {
        self.get_all_paths().into_iter().next()
    }

    /// Signatures used by statements that sit on `row` of `path`
    pub fn get_used_signatures_at_row(&self, path: &str, row: i32) -> Vec<String> {
        let Some(document) = self.files.get(path).and_then(SourceFile::document) else {
            return Vec::new();
        };
        let mut found = BTreeSet::new();
        for group in &document.groups {
            for statement in group.statements() {
                let Some(expression) = statement.value() else {
                    continue;
                };
                let origin = statement.text_origin();
                for used in used_signatures(expression) {
                    if used.location.offset_by(origin).row == row {
                        found.insert(used.signature);
                    }
                }
            }
        }
        found.into_iter().collect()
    }

    /// Normalized top-level groups of one kind (`"Defines"`, `"Theorem"`, ...)
    pub fn groups_of_kind(&self, kind: &str) -> Vec<&TopLevelGroup> {
        self.groups
            .iter()
            .filter(|group| group.kind == kind)
            .map(|group| &group.normalized)
            .collect()
    }

    /// Completions of `prefix` among the words of every file, ignoring case
    pub fn find_word_suffixes(&self, prefix: &str) -> Vec<String> {
        self.words.find_suffixes(&prefix.to_lowercase())
    }

    pub fn find_signature_suffixes(&self, prefix: &str) -> Vec<String> {
        self.signature_trie.find_suffixes(prefix)
    }

    /// Files containing every word of `query`, in natural path order
    pub fn search(&self, query: &str) -> Vec<&SourceFile> {
        self.search
            .search(query)
            .iter()
            .filter_map(|path| self.files.get(path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETS: &str = "[\\set]\nDefines: X\nwritten: \"X\"\n\n[\\set.element]\nDefines: x\nmeans: 'x is \\set'\n";
    const THEOREM: &str = "[\\union.lemma]\nTheorem:\ngiven: A\nthen: 'A is \\set'\n";

    fn collection() -> SourceCollection {
        let mut collection = SourceCollection::new();
        collection.add_text("content/10_later.math", THEOREM);
        collection.add_text("content/2_sets.math", SETS);
        collection
    }

    #[test]
    fn test_indexes_signatures() {
        let collection = collection();
        let found = collection.get_with_signature("\\set").expect("indexed");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, "content/2_sets.math");
        assert_eq!(found[0].index, 0);
        assert!(collection.is_defined("\\union.lemma:given"));
        assert_eq!(
            collection.get_with_signature("\\missing").unwrap_err(),
            CollectionError::UnknownSignature("\\missing".to_string())
        );
    }

    #[test]
    fn test_signature_kinds() {
        let collection = collection();
        assert_eq!(
            collection.signature_kind("\\set"),
            Some(SignatureKind::Defines { expressing: false })
        );
        assert_eq!(
            collection.signature_kind("\\union.lemma"),
            Some(SignatureKind::Result(ResultKind::Theorem))
        );
        assert_eq!(collection.signature_kind("\\nope"), None);
        assert!(collection.types().is_sig_descendent_of("\\set.element", "\\set"));
    }

    #[test]
    fn test_paths_in_natural_order() {
        let collection = collection();
        assert_eq!(
            collection.get_all_paths(),
            vec!["content/2_sets.math", "content/10_later.math"]
        );
        assert_eq!(
            collection.get_first_path().as_deref(),
            Some("content/2_sets.math")
        );
    }

    #[test]
    fn test_remove_reverses_indexing() {
        let mut collection = collection();
        assert!(collection.remove_source("content/2_sets.math").is_some());
        assert!(!collection.is_defined("\\set"));
        assert!(collection.find_signature_suffixes("\\se").is_empty());
        assert!(collection.search("element").is_empty());
        assert!(!collection.types().is_sig_descendent_of("\\set.element", "\\set"));
        assert_eq!(collection.groups_of_kind("Defines").len(), 0);
        assert_eq!(collection.groups_of_kind("Theorem").len(), 1);
        assert!(collection.remove_source("content/2_sets.math").is_none());
    }

    #[test]
    fn test_adding_same_path_replaces() {
        let mut collection = collection();
        collection.add_text("content/2_sets.math", "[\\other]\nDefines: o\nwritten: \"o\"\n");
        assert!(!collection.is_defined("\\set"));
        assert!(collection.is_defined("\\other"));
        assert_eq!(collection.get_all_paths().len(), 2);
    }

    #[test]
    fn test_used_signatures_at_row() {
        let collection = collection();
        assert_eq!(
            collection.get_used_signatures_at_row("content/10_later.math", 3),
            vec!["\\set"]
        );
        assert!(collection
            .get_used_signatures_at_row("content/10_later.math", 0)
            .is_empty());
    }

    #[test]
    fn test_invalid_files_are_not_indexed() {
        let mut collection = SourceCollection::new();
        collection.add_text("bad.math", "Defines: x\nwritten: \"x\"\n");
        assert!(collection.file("bad.math").is_some());
        assert_eq!(collection.defined_signatures().count(), 0);
        assert!(collection.find_word_suffixes("writ").is_empty());
        assert_eq!(
            collection.group("bad.math", 0).unwrap_err(),
            CollectionError::InvalidSource("bad.math".to_string())
        );
    }

    #[test]
    fn test_from_sources_parses_in_parallel() {
        let collection = SourceCollection::from_sources(
            vec![("b.math", SETS), ("a.math", THEOREM)],
            CollectionOptions::default(),
        );
        assert_eq!(collection.get_all_paths(), vec!["a.math", "b.math"]);
        assert_eq!(
            collection.find_signature_suffixes("\\set"),
            vec!["", ".element"]
        );
        assert_eq!(collection.find_word_suffixes("ELEM"), vec!["ent"]);
    }
}
