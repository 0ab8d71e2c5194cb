//! The per-document lint pipeline.
//!
//! Blocks of a document go through parse, synthesize, lint and remap strictly
//! one after the other: the next block is only started once the diagnostics of
//! the previous one are in the seen-set and the report.

use crate::backend::{BackendError, LintBackend, ShellcheckBackend};
use crate::config::ValidatedConfig;
use crate::block::CodeBlock;
use crate::dialect::Dialect;
use crate::executor::{ExecutorError, ToolExecutor};
use crate::remap::{Diagnostic, DocumentContext};
use crate::report::{Report, ReportEntry};
use crate::scanner::Scanner;
use crate::synthesizer::{Interpreter, synthesize};
use crate::transcript::Transcript;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("{}: {source}", document.display())]
    Executor {
        document: PathBuf,
        #[source]
        source: ExecutorError,
    },
    #[error("{}: {source}", document.display())]
    Backend {
        document: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Failed to write report: {0}")]
    Report(#[from] io::Error),
}

/// What linting one document produced.
#[derive(Debug, Clone, Default)]
pub struct DocumentResult {
    pub document: PathBuf,
    /// Number of shell blocks found.
    pub blocks: usize,
    /// Report lines written for this document, in order.
    pub entries: Vec<ReportEntry>,
}

impl DocumentResult {
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter_map(|entry| match entry {
            ReportEntry::Diagnostic { diagnostic, .. } => Some(diagnostic),
            ReportEntry::Header { .. } => None,
        })
    }

    pub fn has_diagnostics(&self) -> bool {
        self.diagnostics().next().is_some()
    }
}

/// Runs documents through scanner, synthesizer, linter and remapper.
pub struct LintEngine {
    backend: Box<dyn LintBackend>,
    executor: ToolExecutor,
    scanner: Scanner,
    debug: bool,
    interpreters: HashMap<Dialect, Interpreter>,
}

impl LintEngine {
    pub fn new(backend: Box<dyn LintBackend>, executor: ToolExecutor, scanner: Scanner, debug: bool) -> Self {
        Self {
            backend,
            executor,
            scanner,
            debug,
            interpreters: HashMap::new(),
        }
    }

    /// Engine running shellcheck with a validated configuration.
    pub fn from_config(config: &ValidatedConfig) -> Self {
        let backend = ShellcheckBackend::new(config.executable.clone(), config.dialects.clone(), config.prompt);
        let scanner = Scanner::new(config.dialects.clone(), config.tab_width, config.python_path.clone());
        Self::new(
            Box::new(backend),
            ToolExecutor::new(config.timeout_ms),
            scanner,
            config.debug,
        )
    }

    pub fn backend(&self) -> &dyn LintBackend {
        self.backend.as_ref()
    }

    /// Pre-seed the interpreter used for `dialect` instead of looking it up on `PATH`.
    pub fn with_interpreter(mut self, dialect: Dialect, interpreter: Interpreter) -> Self {
        self.interpreters.insert(dialect, interpreter);
        self
    }

    fn interpreter(&mut self, dialect: Dialect) -> Interpreter {
        self.interpreters
            .entry(dialect)
            .or_insert_with(|| Interpreter::resolve(dialect))
            .clone()
    }

    /// Read and lint the document at `path`.
    pub fn lint_file(&mut self, path: &Path, report: &mut Report) -> Result<DocumentResult, EngineError> {
        let content = fs::read_to_string(path).map_err(|source| EngineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.lint_document(path, &content, report)
    }

    /// Lint `content`, the text of the document at `path`.
    pub fn lint_document(
        &mut self,
        path: &Path,
        content: &str,
        report: &mut Report,
    ) -> Result<DocumentResult, EngineError> {
        let mut ctx = DocumentContext::new(path.display().to_string(), self.debug);
        let blocks = self.scanner.scan(path, content);
        log::info!("{}: {} shell block(s)", ctx.docname, blocks.len());

        let mut result = DocumentResult {
            document: path.to_path_buf(),
            blocks: blocks.len(),
            entries: Vec::new(),
        };

        for block in &blocks {
            let diagnostics = self.lint_block(&mut ctx, block)?;
            if diagnostics.is_empty() {
                continue;
            }

            if ctx.needs_header(block.source()) {
                let header = ReportEntry::Header {
                    document: ctx.docname.clone(),
                    source: absolute_source(block.source()),
                };
                report.append(&header)?;
                result.entries.push(header);
            }
            for diagnostic in diagnostics {
                let entry = ReportEntry::Diagnostic {
                    document: ctx.docname.clone(),
                    diagnostic,
                };
                report.append(&entry)?;
                result.entries.push(entry);
            }
        }

        if result.has_diagnostics() {
            report.document_failed();
        }
        Ok(result)
    }

    fn lint_block(&mut self, ctx: &mut DocumentContext, block: &CodeBlock) -> Result<Vec<Diagnostic>, EngineError> {
        if ctx.debug {
            log::debug!(
                "Block at {}:{} ({}):\n{}",
                block.source().display(),
                block.line_offset() + 2,
                block.dialect,
                block.lines.join("\n")
            );
        }

        let transcript = Transcript::parse(&block.lines, self.backend.prompt());
        let interpreter = self.interpreter(block.dialect);
        let script = synthesize(block, &transcript, &interpreter);

        let output = self
            .executor
            .lint_script(self.backend.as_ref(), block.dialect, &script.text())
            .map_err(|source| EngineError::Executor {
                document: block.document.clone(),
                source,
            })?;
        if !output.stderr.trim().is_empty() {
            log::debug!("{} stderr: {}", self.backend.name(), output.stderr.trim());
        }

        let findings = self
            .backend
            .parse_findings(&output.stdout)
            .map_err(|source| EngineError::Backend {
                document: block.document.clone(),
                source,
            })?;

        Ok(ctx.remap(block, script.offset, findings))
    }
}

/// Header lines name the source by its absolute path.
fn absolute_source(source: &Path) -> PathBuf {
    std::path::absolute(source).unwrap_or_else(|e| {
        log::debug!("Cannot make {} absolute: {e}", source.display());
        source.to_path_buf()
    })
}
