//! Document printer
//!
//!     Typed groups are first flattened into a small layout model ([`Block`]: an optional
//!     id plus sections, each section holding inline leaves and block arguments), which is
//!     then written through a [`CodeWriter`]. The same walk serves plain source output and
//!     HTML output.
//!
//!     Layout rules:
//!         - target lists, string lists and single statements or texts stay on the header line
//!         - clause lists and nested groups go below the header, one `. ` argument per line
//!         - an argument at depth `n` is indented by `n` times two spaces before its `. `
//!         - top-level groups are separated by one blank line
//!
//! Printing then parsing yields a document equal to the original once locations are
//! normalized.

use super::clauses::{Clause, ClauseList};
use super::document::{Document, TopLevelGroup};
use super::groups::{
    DefinesGroup, FoundationItem, MetadataItem, MetadataSection, ProvidingItem, ProvidingSection,
    ResultGroup, StatesGroup,
};
use super::nodes::{Id, Statement, StringList, TargetList, Text};
use super::writer::{CodeWriter, HtmlWriter, PlainWriter};

/// Produces the text written between a statement's quotes
pub type StatementRenderer<'r> = dyn Fn(&Statement) -> String + 'r;

#[derive(Debug, Clone)]
pub struct Block<'a> {
    pub id: Option<&'a Id>,
    pub sections: Vec<BlockSection<'a>>,
}

#[derive(Debug, Clone)]
pub struct BlockSection<'a> {
    pub name: &'a str,
    pub inline: Vec<Leaf<'a>>,
    pub args: Vec<BlockArg<'a>>,
}

#[derive(Debug, Clone)]
pub enum Leaf<'a> {
    Statement(&'a Statement),
    Text(&'a Text),
    Target(String),
}

#[derive(Debug, Clone)]
pub enum BlockArg<'a> {
    Leaf(Leaf<'a>),
    Group(Block<'a>),
}

impl<'a> Block<'a> {
    fn new(sections: Vec<BlockSection<'a>>) -> Self {
        Self { id: None, sections }
    }

    fn with_id(id: Option<&'a Id>, sections: Vec<BlockSection<'a>>) -> Self {
        Self { id, sections }
    }
}

impl<'a> BlockSection<'a> {
    fn empty(name: &'a str) -> Self {
        Self {
            name,
            inline: Vec::new(),
            args: Vec::new(),
        }
    }

    fn inline(name: &'a str, inline: Vec<Leaf<'a>>) -> Self {
        Self {
            name,
            inline,
            args: Vec::new(),
        }
    }

    fn block(name: &'a str, args: Vec<BlockArg<'a>>) -> Self {
        Self {
            name,
            inline: Vec::new(),
            args,
        }
    }

    fn clauses(name: &'a str, list: &'a ClauseList) -> Self {
        Self::block(name, clause_args(list))
    }

    fn targets(name: &'a str, list: &'a TargetList) -> Self {
        Self::inline(name, target_leaves(list))
    }

    fn strings(name: &'a str, list: &'a StringList) -> Self {
        Self::inline(name, list.items.iter().map(Leaf::Text).collect())
    }

    fn statement(name: &'a str, statement: &'a Statement) -> Self {
        Self::inline(name, vec![Leaf::Statement(statement)])
    }

    fn text(name: &'a str, text: &'a Text) -> Self {
        Self::inline(name, vec![Leaf::Text(text)])
    }
}

fn target_leaves(list: &TargetList) -> Vec<Leaf<'_>> {
    list.items
        .iter()
        .map(|target| Leaf::Target(target.to_code()))
        .collect()
}

fn clause_args(list: &ClauseList) -> Vec<BlockArg<'_>> {
    list.clauses.iter().map(clause_arg).collect()
}

fn clause_arg(clause: &Clause) -> BlockArg<'_> {
    match clause {
        Clause::Statement(statement) => BlockArg::Leaf(Leaf::Statement(statement)),
        Clause::Text(text) => BlockArg::Leaf(Leaf::Text(text)),
        other => BlockArg::Group(clause_block(other)),
    }
}

fn clause_block(clause: &Clause) -> Block<'_> {
    let mut sections = Vec::new();
    match clause {
        Clause::Statement(_) | Clause::Text(_) => {}
        Clause::If(group) => {
            sections.push(BlockSection::clauses("if", &group.conditions));
            sections.push(BlockSection::clauses("then", &group.then));
        }
        Clause::Iff(group) => {
            sections.push(BlockSection::clauses("iff", &group.conditions));
            sections.push(BlockSection::clauses("then", &group.then));
        }
        Clause::ForAll(group) => {
            sections.push(BlockSection::targets("for", &group.targets));
            sections.extend(group.such_that.iter().map(|l| BlockSection::clauses("suchThat", l)));
            sections.push(BlockSection::clauses("then", &group.then));
        }
        Clause::Exists(group) | Clause::ExistsUnique(group) => {
            let name = if matches!(clause, Clause::Exists(_)) {
                "exists"
            } else {
                "existsUnique"
            };
            sections.push(BlockSection::targets(name, &group.targets));
            sections.extend(group.such_that.iter().map(|l| BlockSection::clauses("suchThat", l)));
        }
        Clause::Not(group) => {
            sections.push(BlockSection::block("not", vec![clause_arg(&group.clause)]));
        }
        Clause::Or(group) => sections.push(BlockSection::clauses("or", &group.clauses)),
        Clause::Piecewise(group) => {
            sections.push(BlockSection::empty("piecewise"));
            sections.push(BlockSection::clauses("when", &group.when));
            sections.push(BlockSection::clauses("then", &group.then));
            sections.extend(group.otherwise.iter().map(|l| BlockSection::clauses("else", l)));
        }
        Clause::Matching(group) => {
            sections.push(BlockSection::clauses("matching", &group.clauses));
        }
        Clause::Generated(group) => {
            sections.push(BlockSection::empty("generated"));
            sections.push(BlockSection::targets("from", &group.from));
            sections.extend(group.when.iter().map(|l| BlockSection::clauses("when", l)));
        }
    }
    Block::new(sections)
}

fn metadata_section(metadata: &MetadataSection) -> BlockSection<'_> {
    let items = metadata
        .items
        .iter()
        .map(|item| {
            let section = match item {
                MetadataItem::Reference(reference) => {
                    let sources = reference
                        .sources
                        .iter()
                        .map(|source| {
                            let mut sections = vec![BlockSection::text("source", &source.source)];
                            sections.extend(source.page.iter().map(|p| BlockSection::text("page", p)));
                            sections.extend(
                                source.offset.iter().map(|o| BlockSection::text("offset", o)),
                            );
                            BlockArg::Group(Block::new(sections))
                        })
                        .collect();
                    BlockSection::block("reference", sources)
                }
                MetadataItem::Tags(tags) => BlockSection::strings("tags", tags),
                MetadataItem::Field(field) => BlockSection::text(&field.key, &field.value),
            };
            BlockArg::Group(Block::new(vec![section]))
        })
        .collect();
    BlockSection::block("Metadata", items)
}

fn providing_section(providing: &ProvidingSection) -> BlockSection<'_> {
    let items = providing
        .items
        .iter()
        .map(|item| {
            let sections = match item {
                ProvidingItem::View(view) => {
                    let mut sections = vec![
                        BlockSection::empty("view"),
                        BlockSection::statement("as", &view.as_),
                    ];
                    sections.extend(view.via.iter().map(|s| BlockSection::statement("via", s)));
                    sections.extend(view.by.iter().map(|s| BlockSection::statement("by", s)));
                    sections
                }
                ProvidingItem::Member(member) => vec![
                    BlockSection::targets("member", &member.targets),
                    BlockSection::clauses("means", &member.means),
                ],
            };
            BlockArg::Group(Block::new(sections))
        })
        .collect();
    BlockSection::block("providing", items)
}

fn defines_block(defines: &DefinesGroup) -> Block<'_> {
    let mut sections = vec![BlockSection::inline(
        "Defines",
        vec![Leaf::Target(defines.target.to_code())],
    )];
    sections.extend(defines.given.iter().map(|l| BlockSection::targets("given", l)));
    let lists = [
        ("when", &defines.when),
        ("suchThat", &defines.such_that),
        ("means", &defines.means),
        ("satisfying", &defines.satisfying),
        ("expressing", &defines.expressing),
    ];
    for (name, list) in lists {
        sections.extend(list.iter().map(|l| BlockSection::clauses(name, l)));
    }
    sections.extend(defines.providing.iter().map(providing_section));
    sections.extend(defines.using.iter().map(|l| BlockSection::clauses("using", l)));
    sections.extend(defines.written.iter().map(|l| BlockSection::strings("written", l)));
    sections.extend(defines.called.iter().map(|l| BlockSection::strings("called", l)));
    sections.extend(defines.metadata.iter().map(metadata_section));
    Block::with_id(Some(&defines.id), sections)
}

fn states_block(states: &StatesGroup) -> Block<'_> {
    let mut sections = vec![BlockSection::empty("States")];
    sections.extend(states.given.iter().map(|l| BlockSection::targets("given", l)));
    sections.extend(states.when.iter().map(|l| BlockSection::clauses("when", l)));
    sections.extend(states.such_that.iter().map(|l| BlockSection::clauses("suchThat", l)));
    sections.push(BlockSection::clauses("that", &states.that));
    sections.extend(states.using.iter().map(|l| BlockSection::clauses("using", l)));
    sections.extend(states.written.iter().map(|l| BlockSection::strings("written", l)));
    sections.extend(states.called.iter().map(|l| BlockSection::strings("called", l)));
    sections.extend(states.metadata.iter().map(metadata_section));
    Block::with_id(Some(&states.id), sections)
}

fn result_block(result: &ResultGroup) -> Block<'_> {
    let mut sections = vec![BlockSection::strings(
        result.kind.section_name(),
        &result.names,
    )];
    sections.extend(result.given.iter().map(|l| BlockSection::targets("given", l)));
    let lists = [
        ("where", &result.where_),
        ("if", &result.if_),
        ("iff", &result.iff),
    ];
    for (name, list) in lists {
        sections.extend(list.iter().map(|l| BlockSection::clauses(name, l)));
    }
    sections.push(BlockSection::clauses("then", &result.then));
    sections.extend(result.using.iter().map(|l| BlockSection::clauses("using", l)));
    sections.extend(result.proof.iter().map(|l| BlockSection::clauses("Proof", l)));
    sections.extend(result.metadata.iter().map(metadata_section));
    Block::with_id(result.id.as_ref(), sections)
}

fn foundation_item_block(item: &FoundationItem) -> Block<'_> {
    match item {
        FoundationItem::Defines(defines) => defines_block(defines),
        FoundationItem::States(states) => states_block(states),
    }
}

/// Lay out one top-level group.
pub fn group_block(group: &TopLevelGroup) -> Block<'_> {
    match group {
        TopLevelGroup::Defines(defines) => defines_block(defines),
        TopLevelGroup::States(states) => states_block(states),
        TopLevelGroup::Axiom(result)
        | TopLevelGroup::Theorem(result)
        | TopLevelGroup::Conjecture(result) => result_block(result),
        TopLevelGroup::Topic(topic) => {
            let mut sections = vec![
                BlockSection::strings("Topic", &topic.names),
                BlockSection::text("content", &topic.content),
            ];
            sections.extend(topic.metadata.iter().map(metadata_section));
            Block::with_id(Some(&topic.id), sections)
        }
        TopLevelGroup::Resource(resource) => {
            let fields = resource
                .items
                .iter()
                .map(|field| {
                    BlockArg::Group(Block::new(vec![BlockSection::text(&field.key, &field.value)]))
                })
                .collect();
            let mut sections = vec![BlockSection::block("Resource", fields)];
            sections.extend(resource.metadata.iter().map(metadata_section));
            Block::with_id(Some(&resource.id), sections)
        }
        TopLevelGroup::Foundation(foundation) => {
            let item = BlockArg::Group(foundation_item_block(&foundation.item));
            let mut sections = vec![BlockSection::block("Foundation", vec![item])];
            sections.extend(foundation.metadata.iter().map(metadata_section));
            Block::new(sections)
        }
        TopLevelGroup::Mutually(mutually) => {
            let items = mutually
                .items
                .iter()
                .map(|item| BlockArg::Group(foundation_item_block(item)))
                .collect();
            let mut sections = vec![BlockSection::block("Mutually", items)];
            sections.extend(mutually.metadata.iter().map(metadata_section));
            Block::new(sections)
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn write_leaf(writer: &mut dyn CodeWriter, leaf: &Leaf<'_>, renderer: Option<&StatementRenderer>) {
    match leaf {
        Leaf::Statement(statement) => {
            let text = match renderer {
                Some(render) => render(statement),
                None => statement.text.clone(),
            };
            writer.write_statement(&format!("'{text}'"));
        }
        Leaf::Text(text) => writer.write_text(&format!("\"{}\"", text.text)),
        Leaf::Target(code) => writer.write_raw(code),
    }
}

/// Write `block` at `depth`. As an argument (`dotted`), its first line carries the `. `
/// marker and the remaining lines are indented one level deeper.
pub fn write_block(
    writer: &mut dyn CodeWriter,
    block: &Block<'_>,
    depth: usize,
    dotted: bool,
    renderer: Option<&StatementRenderer>,
) {
    let content_depth = if dotted { depth + 1 } else { depth };
    let mut first_line = true;
    let mut start_line = |writer: &mut dyn CodeWriter| {
        if first_line && dotted {
            writer.write_indent(&format!("{}. ", indent(depth)));
        } else {
            writer.write_indent(&indent(content_depth));
        }
        first_line = false;
    };

    if let Some(id) = block.id {
        start_line(writer);
        writer.write_id(&format!("[{}]", id.text()));
        writer.write_newline();
    }

    for section in &block.sections {
        start_line(writer);
        writer.write_header(section.name);
        for (index, leaf) in section.inline.iter().enumerate() {
            writer.write_raw(if index == 0 { " " } else { ", " });
            write_leaf(writer, leaf, renderer);
        }
        writer.write_newline();

        for arg in &section.args {
            match arg {
                BlockArg::Leaf(leaf) => {
                    writer.write_indent(&format!("{}. ", indent(content_depth)));
                    write_leaf(writer, leaf, renderer);
                    writer.write_newline();
                }
                BlockArg::Group(group) => {
                    write_block(writer, group, content_depth, true, renderer);
                }
            }
        }
    }
}

/// Write every group of `document`, one blank line apart.
pub fn write_document(
    writer: &mut dyn CodeWriter,
    document: &Document,
    renderer: Option<&StatementRenderer>,
) {
    for (index, group) in document.groups.iter().enumerate() {
        if index > 0 {
            writer.write_newline();
        }
        write_block(writer, &group_block(group), 0, false, renderer);
    }
}

impl Document {
    /// Canonical MathLingua source for this document
    pub fn to_code(&self) -> String {
        let mut writer = PlainWriter::new();
        write_document(&mut writer, self, None);
        writer.into_output()
    }

    /// HTML rendering with spans classed `{class_prefix}-header`, `-statement`, ...
    pub fn to_html(&self, class_prefix: &str) -> String {
        let mut writer = HtmlWriter::new(class_prefix);
        write_document(&mut writer, self, None);
        writer.into_output()
    }
}

impl TopLevelGroup {
    pub fn to_code(&self) -> String {
        let mut writer = PlainWriter::new();
        write_block(&mut writer, &group_block(self), 0, false, None);
        writer.into_output()
    }

    /// Print this group through `writer`, letting `renderer` rewrite each statement.
    pub fn write_to(&self, writer: &mut dyn CodeWriter, renderer: Option<&StatementRenderer>) {
        write_block(writer, &group_block(self), 0, false, renderer);
    }
}
