//! Code blocks handed from the document scanner to the lint engine.

use crate::dialect::Dialect;
use std::path::{Path, PathBuf};

/// Where the text of a code block physically lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOrigin {
    /// The block is part of the document itself.
    Document,
    /// The block comes from a Python docstring pulled in by an autodoc directive.
    Docstring {
        /// Python source file holding the docstring.
        file: PathBuf,
        /// Dotted name of the documented function.
        qualname: String,
        /// 0-based line of the function definition, if it could be located.
        def_line: Option<usize>,
    },
}

/// A shell transcript found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Block text, dedented by `indent`, one entry per line.
    pub lines: Vec<String>,
    pub dialect: Dialect,
    /// Document the block was found in.
    pub document: PathBuf,
    /// 0-based index of the line just above the first content line.
    ///
    /// For docstring blocks this is relative to the function definition line.
    /// The interpreter directive of the generated script stands in for this line,
    /// so script line `n` corresponds to source line `line + n` (1-based).
    pub line: usize,
    /// Width of the indentation stripped from every line of the block.
    pub indent: usize,
    pub origin: BlockOrigin,
}

impl CodeBlock {
    /// File that diagnostics for this block are attributed to.
    ///
    /// A docstring block whose definition line is unknown falls back to the
    /// document and its literal line numbers.
    pub fn source(&self) -> &Path {
        match &self.origin {
            BlockOrigin::Docstring {
                file,
                def_line: Some(_),
                ..
            } => file,
            _ => &self.document,
        }
    }

    /// Line delta between generated-script lines and source lines.
    pub fn line_offset(&self) -> usize {
        match self.origin {
            BlockOrigin::Docstring {
                def_line: Some(def_line),
                ..
            } => self.line + def_line,
            _ => self.line,
        }
    }
}
