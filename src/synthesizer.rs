//! Script synthesis.
//!
//! Turns a classified transcript into a standalone shell script that a linter
//! accepts, together with the offsets that map the linter's coordinates back
//! into the source document.
//!
//! The generated script always has one interpreter directive followed by exactly
//! one line per transcript line. Output lines become [`PLACEHOLDER`] comments.
//! Because of that fixed shape a single additive offset is enough to translate a
//! script line into a document line.

use crate::block::CodeBlock;
use crate::dialect::Dialect;
use crate::indent::strip_indent;
use crate::transcript::{PLACEHOLDER, Transcript};
use std::path::PathBuf;

/// Interpreter used in the `#!` line of a generated script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpreter {
    /// Absolute path found on `PATH`.
    Resolved(PathBuf),
    /// The dialect could not be found; the directive goes through `env`.
    Fallback(Dialect),
}

impl Interpreter {
    /// Look the dialect's interpreter up on `PATH`.
    pub fn resolve(dialect: Dialect) -> Self {
        match which::which(dialect.as_str()) {
            Ok(path) => Interpreter::Resolved(path),
            Err(e) => {
                log::warn!("Interpreter for '{dialect}' not found ({e}); using /usr/bin/env");
                Interpreter::Fallback(dialect)
            }
        }
    }

    /// The `#!` line, without a trailing newline.
    pub fn directive(&self) -> String {
        match self {
            Interpreter::Resolved(path) => format!("#!{}", path.display()),
            Interpreter::Fallback(dialect) => format!("#!/usr/bin/env {dialect}"),
        }
    }
}

/// Additive delta from script coordinates to source coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinateOffset {
    pub line: usize,
    pub column: usize,
}

impl CoordinateOffset {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Map a 1-based `(line, column)` reported against the script to the source.
    pub fn apply(&self, line: usize, column: usize) -> (usize, usize) {
        (line + self.line, column + self.column)
    }
}

/// A generated script ready to be handed to the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticScript {
    /// Interpreter directive followed by one line per transcript line.
    pub lines: Vec<String>,
    pub offset: CoordinateOffset,
}

impl SyntheticScript {
    /// Script contents, newline terminated.
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Build the script for `block` from its parsed transcript.
///
/// Command lines lose `lmin` leading whitespace characters; placeholders are
/// emitted unindented. The prompt was already turned into a space, so the
/// column offset is the block indentation plus `lmin`.
pub fn synthesize(block: &CodeBlock, transcript: &Transcript, interpreter: &Interpreter) -> SyntheticScript {
    let mut lines = Vec::with_capacity(transcript.len() + 1);
    lines.push(interpreter.directive());

    for line in &transcript.lines {
        if line.kind.is_command() {
            lines.push(strip_indent(&line.body, transcript.lmin).to_string());
        } else {
            lines.push(PLACEHOLDER.to_string());
        }
    }

    let offset = CoordinateOffset::new(block.line_offset(), block.indent + transcript.lmin);
    log::debug!(
        "Synthesized {} line script for {} (offset {:?}):\n{}",
        lines.len(),
        block.source().display(),
        offset,
        lines.join("\n")
    );

    SyntheticScript { lines, offset }
}
