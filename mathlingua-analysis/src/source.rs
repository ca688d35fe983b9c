//! A parsed source file

use crate::search::words_of;
use mathlingua_parser::mathlingua::parsing::{parse, Document};
use mathlingua_parser::{Diagnostic, Validation};
use std::collections::BTreeSet;

/// One file of the corpus. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
    pub validation: Validation<Document>,
}

impl SourceFile {
    pub fn parse(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let content = content.into();
        let validation = parse(&content);
        tracing::debug!(
            path = %path,
            diagnostics = validation.errors().len(),
            "parsed source file"
        );
        Self {
            path,
            content,
            validation,
        }
    }

    pub fn document(&self) -> Option<&Document> {
        self.validation.value()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        self.validation.errors()
    }

    /// Words offered by autocomplete and search
    pub fn words(&self) -> BTreeSet<String> {
        words_of(&self.content)
    }

    /// Every signature introduced by the file's groups
    pub fn signature_forms(&self) -> BTreeSet<String> {
        self.document()
            .map(|document| {
                document
                    .groups
                    .iter()
                    .flat_map(|group| group.signatures())
                    .map(|signature| signature.form)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `ERROR: <message> (<row>, <column>)` per diagnostic, 1-based
    pub fn error_report(&self) -> String {
        self.errors()
            .iter()
            .map(|diagnostic| format!("ERROR: {diagnostic}\n"))
            .collect()
    }

    pub fn error_report_html(&self) -> String {
        let items: String = self
            .errors()
            .iter()
            .map(|diagnostic| {
                format!(
                    "<li>ERROR: {}</li>",
                    mathlingua_parser::mathlingua::parsing::writer::escape_html(
                        &diagnostic.to_string()
                    )
                )
            })
            .collect();
        format!("<ul>{items}</ul>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_file_exposes_signatures() {
        let file = SourceFile::parse("a.math", "[\\set{X}]\nDefines: X\nwritten: \"X\"\n");
        assert!(file.document().is_some());
        assert_eq!(
            file.signature_forms().into_iter().collect::<Vec<_>>(),
            vec!["\\set"]
        );
        assert!(file.words().contains("defines"));
    }

    #[test]
    fn test_error_report() {
        let file = SourceFile::parse("bad.math", "Defines: X\nwritten: \"X\"\n");
        assert!(file.document().is_none());
        insta::assert_snapshot!(file.error_report(), @"ERROR: Expected an id (1, 1)");
        insta::assert_snapshot!(file.error_report_html(), @"<ul><li>ERROR: Expected an id (1, 1)</li></ul>");
    }
}
