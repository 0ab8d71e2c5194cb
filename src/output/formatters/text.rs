//! Default text output formatter: the report lines, optionally colored

use crate::engine::DocumentResult;
use crate::output::OutputFormatter;
use crate::report::ReportEntry;
use colored::*;

/// Prints the same lines the report file receives
pub struct TextFormatter {
    use_colors: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    fn format_entry(&self, entry: &ReportEntry) -> String {
        if !self.use_colors {
            return entry.to_string();
        }
        match entry {
            ReportEntry::Header { document, source } => {
                format!("{}: {}", document, source.display().to_string().blue().underline())
            }
            ReportEntry::Diagnostic { document, diagnostic } => format!(
                "{}: Line {}, column {} {}: {}",
                document,
                diagnostic.line.to_string().cyan(),
                diagnostic.column.to_string().cyan(),
                format!("[{}]", diagnostic.code).yellow(),
                diagnostic.message
            ),
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_document(&self, result: &DocumentResult) -> String {
        result
            .entries
            .iter()
            .map(|entry| self.format_entry(entry))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_summary(&self, documents: usize, documents_with_issues: usize, total_issues: usize) -> Option<String> {
        let summary = if total_issues == 0 {
            format!("No issues found in {documents} document(s)")
        } else {
            format!("Found {total_issues} issue(s) in {documents_with_issues} of {documents} document(s)")
        };
        if !self.use_colors {
            return Some(summary);
        }
        Some(if total_issues == 0 {
            summary.green().to_string()
        } else {
            summary.red().bold().to_string()
        })
    }

    fn use_colors(&self) -> bool {
        self.use_colors
    }
}
