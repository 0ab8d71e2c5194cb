//! Configuration loading, command-line overrides and startup validation.
//!
//! Options come from `.shdoclint.toml`, `shdoclint.toml` or the
//! `[tool.shdoclint]` table of `pyproject.toml`. Everything is validated once,
//! before any document is opened; a configuration error aborts the run.

use crate::backend::{MIN_SHELLCHECK_VERSION, Version, query_version};
use crate::dialect::Dialect;
use crate::executor::DEFAULT_TIMEOUT_MS;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Config file names, in order of precedence.
pub const CONFIG_FILES: &[&str] = &[".shdoclint.toml", "shdoclint.toml", "pyproject.toml"];

/// Default tab stop used when expanding tabs in sources.
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config file at {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid dialect '{0}' (allowed: sh, bash, dash, ksh)")]
    InvalidDialect(String),

    #[error("Invalid prompt '{0}': the prompt must be exactly one character")]
    InvalidPrompt(String),

    #[error("Invalid debug value {0}: expected 0 or 1")]
    InvalidDebug(i64),

    #[error("Invalid tab width {0}: must be at least 1")]
    InvalidTabWidth(usize),

    #[error("Linter executable '{0}' not found")]
    ExecutableNotFound(String),

    #[error("Could not determine the version of {}", path.display())]
    UnknownVersion { path: PathBuf },

    #[error("{} is version {found}, at least {required} is required", path.display())]
    ExecutableTooOld {
        path: PathBuf,
        found: Version,
        required: Version,
    },
}

/// `debug` accepts `0`/`1` as well as booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DebugFlag {
    Bool(bool),
    Int(i64),
}

impl Default for DebugFlag {
    fn default() -> Self {
        DebugFlag::Int(0)
    }
}

impl DebugFlag {
    pub fn enabled(self) -> Result<bool, ConfigError> {
        match self {
            DebugFlag::Bool(b) => Ok(b),
            DebugFlag::Int(0) => Ok(false),
            DebugFlag::Int(1) => Ok(true),
            DebugFlag::Int(other) => Err(ConfigError::InvalidDebug(other)),
        }
    }
}

/// Configuration as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Language tags treated as shell transcripts
    pub dialects: Vec<String>,

    /// Name or path of the shellcheck binary
    pub executable: String,

    /// Character that starts a command line in a transcript
    pub prompt: String,

    /// Trace blocks, generated scripts and linter output
    pub debug: DebugFlag,

    /// Tab stop used when expanding tabs in sources
    pub tab_width: usize,

    /// Linter timeout in milliseconds (0 disables the timeout)
    pub timeout: u64,

    /// File the report is written to, truncated at the start of each run
    pub report_file: Option<PathBuf>,

    /// Directories searched for modules named by `.. autofunction::`
    pub python_path: Vec<PathBuf>,

    /// Glob patterns excluded from directory discovery
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialects: Dialect::ALL.iter().map(|d| d.as_str().to_string()).collect(),
            executable: "shellcheck".to_string(),
            prompt: "$".to_string(),
            debug: DebugFlag::default(),
            tab_width: DEFAULT_TAB_WIDTH,
            timeout: DEFAULT_TIMEOUT_MS,
            report_file: None,
            python_path: vec![PathBuf::from(".")],
            exclude: Vec::new(),
        }
    }
}

/// Values given on the command line; each one replaces the config file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub dialects: Option<Vec<String>>,
    pub executable: Option<String>,
    pub prompt: Option<String>,
    pub debug: bool,
    pub tab_width: Option<usize>,
    pub timeout: Option<u64>,
    pub report_file: Option<PathBuf>,
    pub exclude: Option<Vec<String>>,
}

/// Validated configuration the engine runs with.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub dialects: BTreeSet<Dialect>,
    pub executable: PathBuf,
    pub version: Version,
    pub prompt: char,
    pub debug: bool,
    pub tab_width: usize,
    pub timeout_ms: u64,
    pub report_file: Option<PathBuf>,
    pub python_path: Vec<PathBuf>,
    pub exclude: Vec<String>,
}

/// Options that do not depend on the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedOptions {
    pub dialects: BTreeSet<Dialect>,
    pub prompt: char,
    pub debug: bool,
    pub tab_width: usize,
}

impl Config {
    /// Parse a `.shdoclint.toml` style document.
    pub fn from_toml(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Parse the `[tool.shdoclint]` table of a `pyproject.toml`, if there is one.
    pub fn from_pyproject(content: &str, path: &str) -> Result<Option<Self>, ConfigError> {
        let parse_error = |message: String| ConfigError::ParseError {
            path: path.to_string(),
            message,
        };
        let doc: toml::Value = toml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
        let Some(table) = doc.get("tool").and_then(|t| t.get("shdoclint")) else {
            return Ok(None);
        };
        table
            .clone()
            .try_into()
            .map(Some)
            .map_err(|e: toml::de::Error| parse_error(e.to_string()))
    }

    /// Load the config file at `path`.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: path_str.clone(),
        })?;
        if path.file_name().is_some_and(|name| name == "pyproject.toml") {
            Ok(Self::from_pyproject(&content, &path_str)?.unwrap_or_default())
        } else {
            Self::from_toml(&content, &path_str)
        }
    }

    /// First config file in `dir`; a `pyproject.toml` only counts with a `[tool.shdoclint]` table.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        for name in CONFIG_FILES {
            let candidate = dir.join(name);
            if !candidate.is_file() {
                continue;
            }
            if *name == "pyproject.toml" {
                let has_section = fs::read_to_string(&candidate)
                    .map(|content| content.contains("tool.shdoclint"))
                    .unwrap_or(false);
                if !has_section {
                    log::debug!("Found pyproject.toml but no [tool.shdoclint] section");
                    continue;
                }
            }
            log::debug!("Found config file: {}", candidate.display());
            return Some(candidate);
        }
        None
    }

    /// Load the configuration for a run: an explicit file, a discovered one, or defaults.
    pub fn load(explicit: Option<&Path>, no_config: bool, dir: &Path) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if no_config {
            return Ok((Self::default(), None));
        }
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(dir),
        };
        match path {
            Some(path) => Ok((Self::load_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Replace file values with the ones given on the command line.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(dialects) = overrides.dialects {
            self.dialects = dialects;
        }
        if let Some(executable) = overrides.executable {
            self.executable = executable;
        }
        if let Some(prompt) = overrides.prompt {
            self.prompt = prompt;
        }
        if overrides.debug {
            self.debug = DebugFlag::Bool(true);
        }
        if let Some(tab_width) = overrides.tab_width {
            self.tab_width = tab_width;
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout;
        }
        if overrides.report_file.is_some() {
            self.report_file = overrides.report_file;
        }
        if let Some(exclude) = overrides.exclude {
            self.exclude = exclude;
        }
    }

    /// Validate the options that need no external tool.
    pub fn check_options(&self) -> Result<CheckedOptions, ConfigError> {
        let dialects = self
            .dialects
            .iter()
            .map(|name| {
                name.parse::<Dialect>()
                    .map_err(|_| ConfigError::InvalidDialect(name.clone()))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        let mut chars = self.prompt.chars();
        let prompt = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(ConfigError::InvalidPrompt(self.prompt.clone())),
        };

        let debug = self.debug.enabled()?;

        if self.tab_width == 0 {
            return Err(ConfigError::InvalidTabWidth(self.tab_width));
        }

        Ok(CheckedOptions {
            dialects,
            prompt,
            debug,
            tab_width: self.tab_width,
        })
    }

    /// Validate everything, including the linter executable and its version.
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let options = self.check_options()?;
        let (executable, version) = resolve_executable(&self.executable)?;
        log::info!("Using {} {version}", executable.display());

        Ok(ValidatedConfig {
            dialects: options.dialects,
            executable,
            version,
            prompt: options.prompt,
            debug: options.debug,
            tab_width: options.tab_width,
            timeout_ms: self.timeout,
            report_file: self.report_file.clone(),
            python_path: self.python_path.clone(),
            exclude: self.exclude.clone(),
        })
    }
}

/// Find the linter on `PATH` (or at the given path) and check its version.
pub fn resolve_executable(name: &str) -> Result<(PathBuf, Version), ConfigError> {
    let path = which::which(name).map_err(|e| {
        log::debug!("which({name}) failed: {e}");
        ConfigError::ExecutableNotFound(name.to_string())
    })?;
    let version = query_version(&path).ok_or_else(|| ConfigError::UnknownVersion { path: path.clone() })?;
    if version < MIN_SHELLCHECK_VERSION {
        return Err(ConfigError::ExecutableTooOld {
            path,
            found: version,
            required: MIN_SHELLCHECK_VERSION,
        });
    }
    Ok((path, version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let options = Config::default().check_options().unwrap();
        assert_eq!(options.dialects.len(), 4);
        assert_eq!(options.prompt, '$');
        assert!(!options.debug);
        assert_eq!(options.tab_width, 8);
    }

    #[test]
    fn test_unknown_dialect_is_fatal() {
        let config = Config {
            dialects: vec!["bash".to_string(), "xonsh".to_string()],
            ..Config::default()
        };
        let err = config.check_options().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDialect(ref d) if d == "xonsh"));
    }

    #[test]
    fn test_dialects_are_case_insensitive() {
        let config = Config {
            dialects: vec!["BASH".to_string(), "Sh".to_string()],
            ..Config::default()
        };
        let options = config.check_options().unwrap();
        assert_eq!(options.dialects, [Dialect::Bash, Dialect::Sh].into_iter().collect());
    }

    #[test]
    fn test_prompt_must_be_one_character() {
        for prompt in ["", ">>", "$ "] {
            let config = Config {
                prompt: prompt.to_string(),
                ..Config::default()
            };
            assert!(matches!(config.check_options(), Err(ConfigError::InvalidPrompt(_))));
        }
        let config = Config {
            prompt: "%".to_string(),
            ..Config::default()
        };
        assert_eq!(config.check_options().unwrap().prompt, '%');
    }

    #[test]
    fn test_debug_values() {
        assert!(!DebugFlag::Int(0).enabled().unwrap());
        assert!(DebugFlag::Int(1).enabled().unwrap());
        assert!(DebugFlag::Bool(true).enabled().unwrap());
        assert!(matches!(DebugFlag::Int(2).enabled(), Err(ConfigError::InvalidDebug(2))));
    }

    #[test]
    fn test_zero_tab_width_is_rejected() {
        let config = Config {
            tab_width: 0,
            ..Config::default()
        };
        assert!(matches!(config.check_options(), Err(ConfigError::InvalidTabWidth(0))));
    }

    #[test]
    fn test_parse_toml() {
        let content = r#"
dialects = ["bash"]
prompt = "%"
debug = 1
tab-width = 4
timeout = 0
report-file = "build/shellcheck.txt"
python-path = ["src"]
exclude = ["_build/**"]
"#;
        let config = Config::from_toml(content, ".shdoclint.toml").unwrap();
        assert_eq!(config.dialects, vec!["bash"]);
        assert_eq!(config.prompt, "%");
        assert_eq!(config.debug, DebugFlag::Int(1));
        assert_eq!(config.tab_width, 4);
        assert_eq!(config.timeout, 0);
        assert_eq!(config.report_file, Some(PathBuf::from("build/shellcheck.txt")));
        assert_eq!(config.python_path, vec![PathBuf::from("src")]);
        assert_eq!(config.executable, "shellcheck");
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = Config::from_toml("promt = \"$\"", "x.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_string_debug_is_parse_error() {
        assert!(Config::from_toml("debug = \"yes\"", "x.toml").is_err());
    }

    #[test]
    fn test_pyproject_section() {
        let content = "[project]\nname = \"demo\"\n\n[tool.shdoclint]\ndialects = [\"sh\"]\n";
        let config = Config::from_pyproject(content, "pyproject.toml").unwrap().unwrap();
        assert_eq!(config.dialects, vec!["sh"]);
        assert!(Config::from_pyproject("[project]\nname = \"demo\"\n", "pyproject.toml")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_discovery_order() {
        let dir = tempdir().unwrap();
        assert_eq!(Config::discover(dir.path()), None);

        fs::write(dir.path().join("pyproject.toml"), "[project]\nname = \"x\"\n").unwrap();
        assert_eq!(Config::discover(dir.path()), None);

        fs::write(dir.path().join("shdoclint.toml"), "").unwrap();
        assert_eq!(Config::discover(dir.path()), Some(dir.path().join("shdoclint.toml")));

        fs::write(dir.path().join(".shdoclint.toml"), "").unwrap();
        assert_eq!(Config::discover(dir.path()), Some(dir.path().join(".shdoclint.toml")));
    }

    #[test]
    fn test_load_no_config_ignores_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".shdoclint.toml"), "prompt = \"%\"").unwrap();
        let (config, path) = Config::load(None, true, dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.is_none());

        let (config, path) = Config::load(None, false, dir.path()).unwrap();
        assert_eq!(config.prompt, "%");
        assert_eq!(path, Some(dir.path().join(".shdoclint.toml")));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = Config::from_toml("dialects = [\"ksh\"]\ntimeout = 10", "x.toml").unwrap();
        config.apply_overrides(ConfigOverrides {
            dialects: Some(vec!["bash".to_string()]),
            debug: true,
            ..ConfigOverrides::default()
        });
        assert_eq!(config.dialects, vec!["bash"]);
        assert_eq!(config.debug, DebugFlag::Bool(true));
        assert_eq!(config.timeout, 10);
    }

    #[test]
    fn test_missing_executable_is_fatal() {
        let err = resolve_executable("shdoclint-no-such-linter").unwrap_err();
        assert!(matches!(err, ConfigError::ExecutableNotFound(_)));
    }
}
