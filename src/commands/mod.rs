//! Command handlers for the shdoclint CLI.
//!
//! Each subcommand has its own module with a public handler function
//! that `main()` dispatches to.

pub mod check;
pub mod completions;
pub mod init;
pub mod schema;
