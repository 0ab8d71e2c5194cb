//!
//! This module provides initialization utilities for shdoclint, such as creating default configuration files.

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Error type for initialization operations
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Failed to access file {path}: {source}")]
    IoError { source: io::Error, path: String },
}

/// Contents written by `shdoclint init`.
pub const DEFAULT_CONFIG: &str = r#"# shdoclint configuration file

# Language tags treated as shell transcripts (sh, bash, dash, ksh)
dialects = ["sh", "bash", "dash", "ksh"]

# shellcheck binary, looked up on PATH (version 0.4.0 or later)
executable = "shellcheck"

# Character that starts a command line in a transcript
prompt = "$"

# Trace blocks, generated scripts and linter output (0 or 1)
debug = 0

# Tab stop used when expanding tabs in documents and Python sources
tab-width = 8

# Linter timeout in milliseconds (0 disables it)
timeout = 30000

# Write the report to a file as well (truncated on every run)
# report-file = "_build/shellcheck/output.txt"

# Where modules named by `.. autofunction::` are looked up
python-path = ["."]

# Glob patterns skipped when searching directories
exclude = ["_build/**", ".tox/**", "node_modules/**"]
"#;

/// Create a default configuration file at the specified path.
///
/// Returns `true` if the file was created, or `false` if it already exists.
///
/// # Errors
///
/// Returns an error if the file cannot be created due to permissions or other I/O errors.
pub fn create_default_config(path: &str) -> Result<bool, InitError> {
    if Path::new(path).exists() {
        return Ok(false);
    }

    fs::write(path, DEFAULT_CONFIG).map_err(|e| InitError::IoError {
        source: e,
        path: path.to_string(),
    })?;

    Ok(true)
}
