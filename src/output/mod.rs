//! Terminal output.
//!
//! Formatters render lint results for the user. The report file written
//! during the run always uses the plain report format; these formatters only
//! decide what the user sees.

use crate::engine::DocumentResult;
use std::io::{self, Write};
use std::str::FromStr;

pub mod formatters;

pub use formatters::*;

/// Renders document results for the terminal
pub trait OutputFormatter {
    /// Format the results of one document
    fn format_document(&self, result: &DocumentResult) -> String;

    /// Format a summary of results across all documents
    fn format_summary(&self, _documents: usize, _documents_with_issues: usize, _total_issues: usize) -> Option<String> {
        None
    }

    /// Whether this formatter should use colors
    fn use_colors(&self) -> bool {
        false
    }
}

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Report lines: `<doc>: <source>` headers and `<doc>: Line L, column C [code]: message`
    #[default]
    Text,
    /// Concise format: source:line:col: [CODE] message
    Concise,
    /// One JSON array with every diagnostic
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "full" => Ok(OutputFormat::Text),
            "concise" => Ok(OutputFormat::Concise),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl OutputFormat {
    /// Create a formatter instance for this format
    pub fn create_formatter(&self) -> Box<dyn OutputFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter::new()),
            OutputFormat::Concise => Box::new(ConciseFormatter::new()),
            OutputFormat::Json => Box::new(JsonFormatter::new_collecting()),
        }
    }
}

/// Destination of one kind of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
    Discard,
}

impl Stream {
    fn write_line(self, content: &str) -> io::Result<()> {
        match self {
            Stream::Stdout => line_to(io::stdout().lock(), content),
            Stream::Stderr => line_to(io::stderr().lock(), content),
            Stream::Discard => Ok(()),
        }
    }
}

fn line_to(mut out: impl Write, content: &str) -> io::Result<()> {
    writeln!(out, "{content}")?;
    out.flush()
}

/// Routes lint results and status messages to the terminal.
///
/// Results go to stdout (or stderr with `--stderr`); status messages such as
/// the summary always go to stderr. `--silent` discards both.
pub struct OutputWriter {
    results: Stream,
    messages: Stream,
}

impl OutputWriter {
    pub fn new(use_stderr: bool, silent: bool) -> Self {
        if silent {
            return Self {
                results: Stream::Discard,
                messages: Stream::Discard,
            };
        }
        Self {
            results: if use_stderr { Stream::Stderr } else { Stream::Stdout },
            messages: Stream::Stderr,
        }
    }

    /// Write lint results.
    pub fn writeln(&self, content: &str) -> io::Result<()> {
        self.results.write_line(content)
    }

    /// Write a status message.
    pub fn write_error(&self, content: &str) -> io::Result<()> {
        self.messages.write_line(content)
    }
}
