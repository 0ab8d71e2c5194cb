//! Handler for the `schema` command.

use colored::*;
use std::fs;
use std::path::PathBuf;

use shdoclint_lib::config::Config;
use shdoclint_lib::exit_codes::exit;

use crate::SchemaAction;

const SCHEMA_FILE: &str = "shdoclint.schema.json";

/// Handle the schema subcommand (print, generate, or check).
pub fn handle_schema(action: SchemaAction) {
    let schema = schemars::schema_for!(Config);
    let schema_json = serde_json::to_string_pretty(&schema).unwrap_or_else(|e| {
        eprintln!("{}: Failed to serialize schema: {e}", "Error".red().bold());
        exit::tool_error();
    });

    match action {
        SchemaAction::Print => println!("{schema_json}"),
        SchemaAction::Generate => {
            let path = schema_path();
            if fs::read_to_string(&path).is_ok_and(|existing| existing == schema_json) {
                println!("Schema is already up-to-date: {}", path.display());
                return;
            }
            fs::write(&path, &schema_json).unwrap_or_else(|e| {
                eprintln!("{}: Failed to write schema file: {e}", "Error".red().bold());
                exit::tool_error();
            });
            println!("Schema updated: {}", path.display());
        }
        SchemaAction::Check => {
            let path = schema_path();
            let Ok(existing) = fs::read_to_string(&path) else {
                eprintln!("Error: Schema file not found: {}", path.display());
                eprintln!("Run 'shdoclint schema generate' to create it.");
                exit::tool_error();
            };
            if existing != schema_json {
                eprintln!("Error: Schema is out of date: {}", path.display());
                eprintln!("Run 'shdoclint schema generate' to update it.");
                exit::tool_error();
            }
            println!("Schema is up-to-date: {}", path.display());
        }
    }
}

/// Schema file next to the nearest `Cargo.toml`, or in the current directory.
fn schema_path() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("{}: Failed to get current directory: {e}", "Error".red().bold());
        exit::tool_error();
    });
    cwd.ancestors()
        .find(|dir| dir.join("Cargo.toml").exists())
        .unwrap_or(cwd.as_path())
        .join(SCHEMA_FILE)
}
