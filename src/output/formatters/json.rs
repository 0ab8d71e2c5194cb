//! JSON output formatter

use crate::engine::DocumentResult;
use crate::output::OutputFormatter;
use serde_json::{Value, json};

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter {
    collect_all: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter that collects all diagnostics into a single JSON array
    pub fn new_collecting() -> Self {
        Self { collect_all: true }
    }
}

fn document_values(result: &DocumentResult) -> impl Iterator<Item = Value> + '_ {
    let document = result.document.display().to_string();
    result.diagnostics().map(move |d| {
        json!({
            "document": document,
            "source": d.source.display().to_string(),
            "line": d.line,
            "column": d.column,
            "code": d.code,
            "severity": d.severity.as_str(),
            "message": d.message,
        })
    })
}

impl OutputFormatter for JsonFormatter {
    fn format_document(&self, result: &DocumentResult) -> String {
        if self.collect_all {
            // The array is built once all documents are done
            return String::new();
        }

        let values: Vec<Value> = document_values(result).collect();
        serde_json::to_string_pretty(&values).unwrap_or_default()
    }
}

/// Helper to format the diagnostics of all documents as a single JSON document
pub fn format_all_diagnostics_as_json(results: &[DocumentResult]) -> String {
    let values: Vec<Value> = results.iter().flat_map(document_values).collect();
    serde_json::to_string_pretty(&values).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::formatters::fixtures;

    #[test]
    fn test_collecting_mode_defers_output() {
        assert_eq!(JsonFormatter::new_collecting().format_document(&fixtures::document()), "");
    }

    #[test]
    fn test_document_array() {
        let output = JsonFormatter::new().format_document(&fixtures::document());
        let parsed: Value = serde_json::from_str(&output).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["document"], "docs/api.rst");
        assert_eq!(items[0]["source"], "src/mymodule.py");
        assert_eq!(items[0]["line"], 12);
        assert_eq!(items[0]["code"], "2164");
        assert_eq!(items[1]["severity"], "info");
    }

    #[test]
    fn test_all_documents() {
        let mut clean = fixtures::document();
        clean.entries.clear();
        let output = format_all_diagnostics_as_json(&[fixtures::document(), clean, fixtures::document()]);
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 4);
        assert_eq!(format_all_diagnostics_as_json(&[]), "[]");
    }
}
