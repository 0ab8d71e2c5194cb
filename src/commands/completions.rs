//! Handler for the `completions` command.

use clap::CommandFactory;
use clap_complete::{Shell, generate};
use colored::*;
use std::io::stdout;
use std::path::Path;

use shdoclint_lib::exit_codes::exit;

/// Print the completion script for `shell`, or for the shell named by `$SHELL`.
pub fn handle_completions(shell: Option<Shell>, list: bool) {
    if list {
        println!("Available shells:");
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            println!("  {shell}");
        }
        return;
    }

    let Some(shell) = shell.or_else(shell_from_env) else {
        eprintln!(
            "{}: Could not detect shell from $SHELL; pass one explicitly, e.g. `shdoclint completions bash`",
            "Error".red().bold()
        );
        exit::tool_error();
    };

    generate(shell, &mut crate::Cli::command(), "shdoclint", &mut stdout());
}

fn shell_from_env() -> Option<Shell> {
    let shell_path = std::env::var("SHELL").ok()?;
    let name = Path::new(&shell_path).file_name()?.to_str()?;
    match name {
        "pwsh" => Some(Shell::PowerShell),
        other => other.parse().ok(),
    }
}
