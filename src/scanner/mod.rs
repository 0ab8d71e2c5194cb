//! Document scanning: finds the shell transcripts a document contains.
//!
//! reStructuredText documents are scanned for code directives and for
//! `.. autofunction::` directives, whose docstrings are scanned in turn.
//! Markdown documents are scanned for fenced code blocks.

pub mod docstring;
pub mod markdown;
pub mod rst;

use crate::block::{BlockOrigin, CodeBlock};
use crate::dialect::Dialect;
use crate::indent::{expand_tabs, is_blank, min_indent, strip_indent};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Markup language of a document, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Rst,
    Markdown,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "rst" | "rest" | "txt" => Some(DocumentKind::Rst),
            "md" | "markdown" => Some(DocumentKind::Markdown),
            _ => None,
        }
    }
}

/// A block of literal text and where it sits in its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralBlock {
    /// Language tag, empty if none was given.
    pub language: String,
    /// Content dedented by `indent`; blank lines are empty.
    pub lines: Vec<String>,
    /// 0-based index of the first content line.
    pub first_line: usize,
    /// Indentation stripped from the content.
    pub indent: usize,
}

impl LiteralBlock {
    /// Build a block from raw source lines, removing their common indentation.
    pub fn from_lines<S: AsRef<str>>(language: String, raw: &[S], first_line: usize) -> Self {
        let indent = min_indent(raw.iter().map(|l| l.as_ref())).unwrap_or(0);
        let lines = raw
            .iter()
            .map(|l| {
                let l = l.as_ref();
                if is_blank(l) {
                    String::new()
                } else {
                    strip_indent(l, indent).to_string()
                }
            })
            .collect();
        Self {
            language,
            lines,
            first_line,
            indent,
        }
    }
}

/// Finds code blocks tagged with one of the configured dialects.
#[derive(Debug, Clone)]
pub struct Scanner {
    dialects: BTreeSet<Dialect>,
    tab_width: usize,
    python_path: Vec<PathBuf>,
}

impl Scanner {
    pub fn new(dialects: BTreeSet<Dialect>, tab_width: usize, python_path: Vec<PathBuf>) -> Self {
        Self {
            dialects,
            tab_width,
            python_path,
        }
    }

    /// Dialect for a block's language tag, if it is one we lint.
    fn dialect_for(&self, language: &str) -> Option<Dialect> {
        let dialect = language.parse::<Dialect>().ok()?;
        self.dialects.contains(&dialect).then_some(dialect)
    }

    /// All blocks of `content` (the text of `path`) in document order.
    pub fn scan(&self, path: &Path, content: &str) -> Vec<CodeBlock> {
        let lines: Vec<String> = content.lines().map(|l| expand_tabs(l, self.tab_width)).collect();

        match DocumentKind::from_path(path) {
            Some(DocumentKind::Markdown) => {
                let expanded = lines.join("\n");
                markdown::scan(&expanded)
                    .into_iter()
                    .filter_map(|block| self.document_block(path, block))
                    .collect()
            }
            Some(DocumentKind::Rst) | None => {
                let mut blocks = Vec::new();
                for item in rst::scan(&lines) {
                    match item {
                        rst::RstItem::Literal(block) => blocks.extend(self.document_block(path, block)),
                        rst::RstItem::Autodoc { line, target } => {
                            blocks.extend(self.docstring_blocks(path, line, &target));
                        }
                    }
                }
                blocks
            }
        }
    }

    fn document_block(&self, path: &Path, block: LiteralBlock) -> Option<CodeBlock> {
        let dialect = self.dialect_for(&block.language)?;
        Some(CodeBlock {
            lines: block.lines,
            dialect,
            document: path.to_path_buf(),
            line: block.first_line.saturating_sub(1),
            indent: block.indent,
            origin: BlockOrigin::Document,
        })
    }

    /// Search roots for autodoc targets of `document`.
    fn search_roots(&self, document: &Path) -> Vec<PathBuf> {
        let mut roots = self.python_path.clone();
        if let Some(dir) = document.parent() {
            let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
            if !roots.iter().any(|r| r == dir) {
                roots.push(dir.to_path_buf());
            }
        }
        roots
    }

    fn docstring_blocks(&self, document: &Path, directive_line: usize, target: &str) -> Vec<CodeBlock> {
        let resolved = match docstring::resolve(target, &self.search_roots(document), self.tab_width) {
            Ok(resolved) => resolved,
            Err(e) => {
                log::warn!(
                    "{}:{}: cannot resolve autodoc target: {e}",
                    document.display(),
                    directive_line + 1
                );
                return Vec::new();
            }
        };

        let doc = &resolved.docstring;
        rst::scan(&doc.lines)
            .into_iter()
            .filter_map(|item| match item {
                rst::RstItem::Literal(block) => Some(block),
                rst::RstItem::Autodoc { .. } => None,
            })
            .filter_map(|block| {
                let dialect = self.dialect_for(&block.language)?;
                let first_source_line = doc.source_lines.get(block.first_line).copied();
                let def_line = first_source_line.map(|_| doc.def_line);
                // Relative to the definition line when it is known, otherwise
                // the literal line of the block in the cleaned docstring.
                let line = match first_source_line {
                    Some(abs) => abs.saturating_sub(1).saturating_sub(doc.def_line),
                    None => block.first_line.saturating_sub(1),
                };
                Some(CodeBlock {
                    lines: block.lines,
                    dialect,
                    document: document.to_path_buf(),
                    line,
                    indent: doc.margin + block.indent,
                    origin: BlockOrigin::Docstring {
                        file: resolved.file.clone(),
                        qualname: resolved.qualname.clone(),
                        def_line,
                    },
                })
            })
            .collect()
    }
}
