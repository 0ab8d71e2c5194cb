//! Shell dialects understood by the linter backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A shell flavor declared on a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Sh,
    Bash,
    Dash,
    Ksh,
}

impl Dialect {
    /// Every dialect, in the order used for the default configuration.
    pub const ALL: [Dialect; 4] = [Dialect::Sh, Dialect::Bash, Dialect::Dash, Dialect::Ksh];

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Sh => "sh",
            Dialect::Bash => "bash",
            Dialect::Dash => "dash",
            Dialect::Ksh => "ksh",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for language tags that are not a known shell dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDialect(pub String);

impl fmt::Display for UnknownDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown shell dialect '{}'", self.0)
    }
}

impl std::error::Error for UnknownDialect {}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sh" => Ok(Dialect::Sh),
            "bash" => Ok(Dialect::Bash),
            "dash" => Ok(Dialect::Dash),
            "ksh" => Ok(Dialect::Ksh),
            _ => Err(UnknownDialect(s.trim().to_string())),
        }
    }
}
