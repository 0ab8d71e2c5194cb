//! Linter backends.
//!
//! The engine only talks to a [`LintBackend`]: it asks the backend which
//! dialects and prompt it handles, which argv to run for a script, and how to
//! read the tool's output back. [`ShellcheckBackend`] is the one implementation.

use crate::dialect::Dialect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Oldest shellcheck release with `--format=json`.
pub const MIN_SHELLCHECK_VERSION: Version = Version::new(0, 4, 0);

/// A finding as reported by the tool, in script coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub line: usize,
    pub column: usize,
    pub code: String,
    pub message: String,
    pub severity: Severity,
}

/// Severity levels reported by shellcheck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Warning,
    Info,
    Style,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Style => "style",
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{tool} produced malformed output: {reason}")]
    MalformedOutput { tool: String, reason: String },
}

/// Capability interface implemented once per concrete linter.
pub trait LintBackend {
    /// Short tool name used in messages.
    fn name(&self) -> &str;

    /// Full argv (program first) that lints the script at `script` as `dialect`.
    fn command(&self, dialect: Dialect, script: &Path) -> Vec<OsString>;

    /// Dialects whose code blocks this backend lints.
    fn supported_dialects(&self) -> &BTreeSet<Dialect>;

    /// Character that marks a command line in a transcript.
    fn prompt(&self) -> char;

    /// Parse the tool's standard output.
    fn parse_findings(&self, raw: &str) -> Result<Vec<Finding>, BackendError>;
}

/// shellcheck invoked with `--format=json`.
#[derive(Debug, Clone)]
pub struct ShellcheckBackend {
    executable: PathBuf,
    dialects: BTreeSet<Dialect>,
    prompt: char,
}

impl ShellcheckBackend {
    pub fn new(executable: PathBuf, dialects: BTreeSet<Dialect>, prompt: char) -> Self {
        Self {
            executable,
            dialects,
            prompt,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl LintBackend for ShellcheckBackend {
    fn name(&self) -> &str {
        "shellcheck"
    }

    fn command(&self, dialect: Dialect, script: &Path) -> Vec<OsString> {
        vec![
            self.executable.clone().into_os_string(),
            OsString::from(format!("--shell={dialect}")),
            OsString::from("--color=never"),
            OsString::from("--format=json"),
            script.as_os_str().to_owned(),
        ]
    }

    fn supported_dialects(&self) -> &BTreeSet<Dialect> {
        &self.dialects
    }

    fn prompt(&self) -> char {
        self.prompt
    }

    fn parse_findings(&self, raw: &str) -> Result<Vec<Finding>, BackendError> {
        let records: Vec<RawFinding> = serde_json::from_str(raw).map_err(|e| BackendError::MalformedOutput {
            tool: self.name().to_string(),
            reason: e.to_string(),
        })?;

        Ok(records
            .into_iter()
            .map(|r| Finding {
                line: r.line,
                column: r.column,
                code: r.code.to_string(),
                message: r.message,
                severity: r.level.unwrap_or_default(),
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct RawFinding {
    line: usize,
    column: usize,
    code: RawCode,
    message: String,
    #[serde(default)]
    level: Option<Severity>,
}

/// shellcheck emits numeric codes; other tools use strings like `SC2164`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCode {
    Number(u64),
    Text(String),
}

impl fmt::Display for RawCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCode::Number(n) => write!(f, "{n}"),
            RawCode::Text(s) => f.write_str(s),
        }
    }
}

/// A `major.minor.patch` tool version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Parse the first `x.y[.z]` token, ignoring a leading `v` and any suffix.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('v');
        let mut parts = s.split('.').map(|p| {
            let digits: String = p.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u32>().ok()
        });
        let major = parts.next()??;
        let minor = parts.next()??;
        let patch = parts.next().flatten().unwrap_or(0);
        Some(Self::new(major, minor, patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Extract the version from `shellcheck --version` output.
///
/// ```text
/// ShellCheck - shell script analysis tool
/// version: 0.9.0
/// license: GNU General Public License, version 3
/// ```
pub fn parse_version_output(output: &str) -> Option<Version> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("version:"))
        .and_then(Version::parse)
}

/// Run `<executable> --version` and parse the answer.
///
/// Returns `None` if the tool cannot be run or prints something unexpected.
pub fn query_version(executable: &Path) -> Option<Version> {
    let output = Command::new(executable).arg("--version").output().ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    log::debug!("{} --version:\n{stdout}", executable.display());
    parse_version_output(&stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> ShellcheckBackend {
        ShellcheckBackend::new(
            PathBuf::from("/usr/bin/shellcheck"),
            Dialect::ALL.into_iter().collect(),
            '$',
        )
    }

    #[test]
    fn test_command_line() {
        let argv = backend().command(Dialect::Dash, Path::new("/tmp/script.sh"));
        let argv: Vec<String> = argv.into_iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            argv,
            vec![
                "/usr/bin/shellcheck",
                "--shell=dash",
                "--color=never",
                "--format=json",
                "/tmp/script.sh"
            ]
        );
    }

    #[test]
    fn test_parse_findings() {
        let raw = r#"[
            {"file":"/tmp/x.sh","line":2,"endLine":2,"column":1,"endColumn":9,"level":"warning","code":2164,"message":"Use 'cd ... || exit' or 'cd ... || return' in case cd fails.","fix":null},
            {"file":"/tmp/x.sh","line":3,"column":6,"level":"info","code":"SC2086","message":"Double quote to prevent globbing and word splitting."}
        ]"#;
        let findings = backend().parse_findings(raw).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line, 2);
        assert_eq!(findings[0].column, 1);
        assert_eq!(findings[0].code, "2164");
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[1].code, "SC2086");
        assert_eq!(findings[1].severity, Severity::Info);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(backend().parse_findings("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_missing_key_is_malformed() {
        let raw = r#"[{"line":1,"column":1,"message":"no code"}]"#;
        let err = backend().parse_findings(raw).unwrap_err();
        assert!(err.to_string().contains("shellcheck produced malformed output"));
    }

    #[test]
    fn test_parse_non_json_is_malformed() {
        assert!(backend().parse_findings("").is_err());
        assert!(backend().parse_findings("In - line 1: oops").is_err());
    }

    #[test]
    fn test_parse_version_output() {
        let out = "ShellCheck - shell script analysis tool\nversion: 0.9.0\nlicense: GNU General Public License, version 3\n";
        assert_eq!(parse_version_output(out), Some(Version::new(0, 9, 0)));
        assert_eq!(parse_version_output("version: v0.4"), Some(Version::new(0, 4, 0)));
        assert_eq!(parse_version_output("nothing here"), None);
    }

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(0, 3, 8) < MIN_SHELLCHECK_VERSION);
        assert!(Version::new(0, 10, 0) > MIN_SHELLCHECK_VERSION);
        assert_eq!(Version::parse("1.2.3-rc1"), Some(Version::new(1, 2, 3)));
    }
}
