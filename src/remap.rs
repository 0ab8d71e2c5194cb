//! Mapping linter findings back to document coordinates.

use crate::backend::{Finding, Severity};
use crate::block::CodeBlock;
use crate::synthesizer::CoordinateOffset;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A finding in source-file coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// File the finding points into: the document, or the Python file of a docstring.
    pub source: PathBuf,
    pub line: usize,
    pub column: usize,
    pub code: String,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    /// Map a script-relative finding through `offset`.
    pub fn from_finding(source: &Path, offset: CoordinateOffset, finding: Finding) -> Self {
        let (line, column) = offset.apply(finding.line, finding.column);
        Self {
            source: source.to_path_buf(),
            line,
            column,
            code: finding.code,
            message: finding.message,
            severity: finding.severity,
        }
    }

    fn key(&self) -> DiagnosticKey {
        (
            self.source.clone(),
            self.line,
            self.column,
            self.code.clone(),
            self.message.clone(),
        )
    }
}

type DiagnosticKey = (PathBuf, usize, usize, String, String);

/// State carried through the processing of one document.
///
/// Created when a document is opened and dropped when it is done; nothing in
/// here is shared between documents.
#[derive(Debug)]
pub struct DocumentContext {
    /// Document path as shown in report lines.
    pub docname: String,
    pub debug: bool,
    seen: HashSet<DiagnosticKey>,
    header: Option<PathBuf>,
}

impl DocumentContext {
    pub fn new(docname: impl Into<String>, debug: bool) -> Self {
        Self {
            docname: docname.into(),
            debug,
            seen: HashSet::new(),
            header: None,
        }
    }

    /// Remap the findings of one block, dropping any already reported for this document.
    pub fn remap(&mut self, block: &CodeBlock, offset: CoordinateOffset, findings: Vec<Finding>) -> Vec<Diagnostic> {
        let source = block.source();
        let mut fresh = Vec::new();
        for finding in findings {
            let diagnostic = Diagnostic::from_finding(source, offset, finding);
            if self.debug {
                log::debug!("info: {diagnostic:?}");
            }
            if self.seen.insert(diagnostic.key()) {
                fresh.push(diagnostic);
            } else {
                log::debug!(
                    "Dropping duplicate {} at {}:{}",
                    diagnostic.code,
                    diagnostic.line,
                    diagnostic.column
                );
            }
        }
        fresh
    }

    /// Returns true if a header line for `source` has to be written before its diagnostics.
    ///
    /// Consecutive blocks from the same source share one header.
    pub fn needs_header(&mut self, source: &Path) -> bool {
        if self.header.as_deref() == Some(source) {
            return false;
        }
        self.header = Some(source.to_path_buf());
        true
    }

    /// Number of distinct diagnostics recorded so far.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockOrigin;
    use crate::dialect::Dialect;

    fn block() -> CodeBlock {
        CodeBlock {
            lines: vec!["$ cd mydir".to_string()],
            dialect: Dialect::Bash,
            document: PathBuf::from("README.rst"),
            line: 10,
            indent: 4,
            origin: BlockOrigin::Document,
        }
    }

    fn finding(line: usize, column: usize, code: &str) -> Finding {
        Finding {
            line,
            column,
            code: code.to_string(),
            message: "Use 'cd ... || exit' or 'cd ... || return' in case cd fails.".to_string(),
            severity: Severity::Warning,
        }
    }

    #[test]
    fn test_remap_is_additive() {
        let mut ctx = DocumentContext::new("README.rst", false);
        let diags = ctx.remap(&block(), CoordinateOffset::new(10, 4), vec![finding(1, 1, "SC2164")]);
        assert_eq!(diags.len(), 1);
        assert_eq!((diags[0].line, diags[0].column), (11, 5));
        assert_eq!(diags[0].source, PathBuf::from("README.rst"));
        assert_eq!(diags[0].code, "SC2164");
    }

    #[test]
    fn test_identical_findings_are_reported_once() {
        let mut ctx = DocumentContext::new("README.rst", false);
        let offset = CoordinateOffset::new(10, 6);
        let first = ctx.remap(&block(), offset, vec![finding(2, 1, "2164"), finding(2, 1, "2164")]);
        assert_eq!(first.len(), 1);
        let again = ctx.remap(&block(), offset, vec![finding(2, 1, "2164")]);
        assert!(again.is_empty());
        assert_eq!(ctx.seen_count(), 1);
    }

    #[test]
    fn test_different_code_is_not_a_duplicate() {
        let mut ctx = DocumentContext::new("README.rst", false);
        let offset = CoordinateOffset::new(0, 0);
        let diags = ctx.remap(&block(), offset, vec![finding(2, 1, "2164"), finding(2, 1, "2154")]);
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_header_once_per_consecutive_source() {
        let mut ctx = DocumentContext::new("api.rst", false);
        assert!(ctx.needs_header(Path::new("api.rst")));
        assert!(!ctx.needs_header(Path::new("api.rst")));
        assert!(ctx.needs_header(Path::new("mymodule.py")));
        assert!(ctx.needs_header(Path::new("api.rst")));
    }
}
