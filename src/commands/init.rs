//! Handler for the `init` command.

use colored::*;

use shdoclint_lib::exit_codes::exit;
use shdoclint_lib::init::create_default_config;

/// Write a default `.shdoclint.toml` in the current directory.
pub fn handle_init(quiet: bool) {
    const CONFIG_FILE: &str = ".shdoclint.toml";

    match create_default_config(CONFIG_FILE) {
        Ok(true) => {
            if !quiet {
                println!("Created default configuration file: {CONFIG_FILE}");
            }
        }
        Ok(false) => {
            eprintln!(
                "{}: {CONFIG_FILE} already exists; remove it first to regenerate",
                "Error".red().bold()
            );
            exit::tool_error();
        }
        Err(e) => {
            eprintln!("{}: Failed to create config file: {e}", "Error".red().bold());
            exit::tool_error();
        }
    }
}
