//! Rendering top-level groups for display
//!
//! Output is memoized per `(path, index, options)` until the collection next changes.

use super::SourceCollection;
use crate::error::CollectionError;
use mathlingua_parser::mathlingua::parsing::{HtmlWriter, PlainWriter, Statement, StatementRenderer};
use std::sync::PoisonError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    /// Statements exactly as they appear in the source
    Raw,
    /// Statements printed through their `written:` templates
    Literal,
    /// Definitions inlined to a fixed point, then printed as written
    #[default]
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderOptions {
    pub html: bool,
    pub mode: RenderMode,
}

impl SourceCollection {
    /// Render the top-level group at `index` of `path`. Statements that cannot be expanded
    /// are shown as written in the source.
    pub fn render(
        &self,
        path: &str,
        index: usize,
        options: RenderOptions,
    ) -> Result<String, CollectionError> {
        let key = (path.to_string(), index, options);
        if let Some(cached) = self
            .render_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            tracing::trace!(path, index, "render cache hit");
            return Ok(cached.clone());
        }
        tracing::trace!(path, index, "render cache miss");

        let group = self.group(path, index)?;
        let engine = self.engine.with_aliases(group.using());
        let render_statement = |statement: &Statement| -> String {
            let rendered = match options.mode {
                RenderMode::Raw => return statement.text.clone(),
                RenderMode::Literal => statement
                    .value()
                    .ok_or(())
                    .and_then(|expression| engine.expand_as_written(expression).map_err(|_| ())),
                RenderMode::Expanded => engine.expand(&statement.text).map_err(|_| ()),
            };
            rendered.unwrap_or_else(|_| statement.text.clone())
        };
        let renderer: &StatementRenderer = &render_statement;

        let output = if options.html {
            let mut writer = HtmlWriter::new(self.options.html_class_prefix.clone());
            group.write_to(&mut writer, Some(renderer));
            writer.into_output()
        } else {
            let mut writer = PlainWriter::new();
            group.write_to(&mut writer, Some(renderer));
            writer.into_output()
        };

        self.render_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, output.clone());
        Ok(output)
    }

    /// Render every top-level group of `path`, in order.
    pub fn render_file(
        &self,
        path: &str,
        options: RenderOptions,
    ) -> Result<Vec<String>, CollectionError> {
        let file = self
            .file(path)
            .ok_or_else(|| CollectionError::UnknownPath(path.to_string()))?;
        let document = file
            .document()
            .ok_or_else(|| CollectionError::InvalidSource(path.to_string()))?;
        (0..document.groups.len())
            .map(|index| self.render(path, index, options))
            .collect()
    }

    pub fn cached_renders(&self) -> usize {
        self.render_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
