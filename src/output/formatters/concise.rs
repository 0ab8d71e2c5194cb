//! Concise output formatter for easy parsing by editors

use crate::engine::DocumentResult;
use crate::output::OutputFormatter;

/// Concise formatter: source:line:col: [CODE] message
pub struct ConciseFormatter;

impl Default for ConciseFormatter {
    fn default() -> Self {
        Self
    }
}

impl ConciseFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for ConciseFormatter {
    fn format_document(&self, result: &DocumentResult) -> String {
        result
            .diagnostics()
            .map(|d| {
                format!(
                    "{}:{}:{}: [{}] {}",
                    d.source.display(),
                    d.line,
                    d.column,
                    d.code,
                    d.message
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_summary(&self, documents: usize, _documents_with_issues: usize, total_issues: usize) -> Option<String> {
        Some(format!("{total_issues} issue(s) in {documents} document(s)"))
    }
}
