//! Lint the shell transcripts embedded in documentation.
//!
//! Code blocks tagged with a shell dialect are turned into standalone scripts,
//! run through shellcheck, and the findings are mapped back onto the lines and
//! columns of the document (or of the Python docstring the block came from).

pub mod backend;
pub mod block;
pub mod config;
pub mod dialect;
pub mod discovery;
pub mod engine;
pub mod executor;
pub mod exit_codes;
pub mod indent;
pub mod init;
pub mod output;
pub mod remap;
pub mod report;
pub mod scanner;
pub mod synthesizer;
pub mod transcript;

pub use crate::backend::{LintBackend, ShellcheckBackend};
pub use crate::block::{BlockOrigin, CodeBlock};
pub use crate::config::{Config, ConfigError, ValidatedConfig};
pub use crate::dialect::Dialect;
pub use crate::engine::{DocumentResult, EngineError, LintEngine};
pub use crate::remap::Diagnostic;
pub use crate::report::{Report, ReportEntry};
