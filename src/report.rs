//! The build report.
//!
//! Entries are appended one at a time as blocks are processed. When a report
//! file is configured it is truncated once at the start of the run and every
//! entry is then written with its own open/append/close, so no handle is held
//! while the linter runs.

use crate::remap::Diagnostic;
use serde::Serialize;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportEntry {
    /// Names the file the following diagnostics point into.
    Header { document: String, source: PathBuf },
    Diagnostic { document: String, diagnostic: Diagnostic },
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportEntry::Header { document, source } => write!(f, "{document}: {}", source.display()),
            ReportEntry::Diagnostic { document, diagnostic } => write!(
                f,
                "{document}: Line {}, column {} [{}]: {}",
                diagnostic.line, diagnostic.column, diagnostic.code, diagnostic.message
            ),
        }
    }
}

/// Append-only report shared by every document of a run.
#[derive(Debug, Default)]
pub struct Report {
    file: Option<PathBuf>,
    diagnostics: usize,
    documents_with_diagnostics: usize,
}

impl Report {
    /// Report that is only kept in memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that is also written to `path`, which is truncated now.
    pub fn with_file(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, "")?;
        Ok(Self {
            file: Some(path),
            ..Self::default()
        })
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Append `entry` to the report file, if any.
    pub fn append(&mut self, entry: &ReportEntry) -> io::Result<()> {
        if matches!(entry, ReportEntry::Diagnostic { .. }) {
            self.diagnostics += 1;
        }
        let Some(path) = &self.file else {
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{entry}")
    }

    /// Record that a document finished with at least one diagnostic.
    pub fn document_failed(&mut self) {
        self.documents_with_diagnostics += 1;
    }

    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics
    }

    pub fn documents_with_diagnostics(&self) -> usize {
        self.documents_with_diagnostics
    }

    /// True when nothing was ever recorded; the build passes.
    pub fn is_clean(&self) -> bool {
        self.diagnostics == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Severity;
    use tempfile::tempdir;

    fn diagnostic_entry() -> ReportEntry {
        ReportEntry::Diagnostic {
            document: "index".to_string(),
            diagnostic: Diagnostic {
                source: PathBuf::from("docs/index.rst"),
                line: 11,
                column: 5,
                code: "2164".to_string(),
                message: "Use 'cd ... || exit' or 'cd ... || return' in case cd fails.".to_string(),
                severity: Severity::Warning,
            },
        }
    }

    #[test]
    fn test_entry_lines() {
        let header = ReportEntry::Header {
            document: "index".to_string(),
            source: PathBuf::from("docs/index.rst"),
        };
        assert_eq!(header.to_string(), "index: docs/index.rst");
        assert_eq!(
            diagnostic_entry().to_string(),
            "index: Line 11, column 5 [2164]: Use 'cd ... || exit' or 'cd ... || return' in case cd fails."
        );
    }

    #[test]
    fn test_file_is_truncated_then_appended() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("report.txt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale content\n").unwrap();

        let mut report = Report::with_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        report.append(&diagnostic_entry()).unwrap();
        report.append(&diagnostic_entry()).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert_eq!(report.diagnostic_count(), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_memory_report_counts() {
        let mut report = Report::new();
        assert!(report.is_clean());
        report
            .append(&ReportEntry::Header {
                document: "a".to_string(),
                source: PathBuf::from("a.rst"),
            })
            .unwrap();
        assert!(report.is_clean());
        report.append(&diagnostic_entry()).unwrap();
        report.document_failed();
        assert_eq!(report.diagnostic_count(), 1);
        assert_eq!(report.documents_with_diagnostics(), 1);
    }
}
