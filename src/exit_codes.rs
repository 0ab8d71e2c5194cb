//! Process exit status of a shdoclint run.
//!
//! A documentation build treats 1 as "the docs need fixing" and 2 as "the run
//! itself is broken".

/// No shell block produced a diagnostic
pub const SUCCESS: i32 = 0;

/// The linter reported at least one issue in some document
pub const VIOLATIONS_FOUND: i32 = 1;

/// Configuration error, linter failure, malformed linter output or I/O failure
pub const TOOL_ERROR: i32 = 2;

pub mod exit {
    use super::{SUCCESS, TOOL_ERROR, VIOLATIONS_FOUND};

    /// Exit with success code (0)
    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    /// Exit with violations found code (1)
    pub fn violations_found() -> ! {
        std::process::exit(VIOLATIONS_FOUND);
    }

    /// Exit with tool error code (2)
    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
