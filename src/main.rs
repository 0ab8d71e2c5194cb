use clap::{Parser, Subcommand};
use clap_complete::Shell;
use colored::*;
use std::path::PathBuf;

use shdoclint_lib::exit_codes::exit;

mod cli_types;
mod commands;

use cli_types::CheckArgs;

#[derive(Parser)]
#[command(author, version, about = "Lint shell transcripts embedded in documentation with shellcheck", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Ignore all configuration files and use built-in defaults
    #[arg(long, global = true)]
    no_config: bool,

    /// Show detailed output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Without a subcommand, `check` runs with these arguments
    #[command(flatten)]
    check: CheckArgs,

    /// Command to run
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint the shell blocks of documents
    Check(CheckArgs),
    /// Create a default .shdoclint.toml
    Init {
        /// Do not print a confirmation
        #[arg(short, long)]
        quiet: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (detected from $SHELL if omitted)
        shell: Option<Shell>,
        /// List available shells
        #[arg(long)]
        list: bool,
    },
    /// Print or update the JSON schema of the configuration file
    Schema {
        #[command(subcommand)]
        action: SchemaAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
pub enum SchemaAction {
    /// Print the schema to stdout
    Print,
    /// Write the schema file next to Cargo.toml
    Generate,
    /// Fail if the schema file is out of date
    Check,
}

/// Set up `env_logger`; `RUST_LOG`, when set, takes precedence over `level`.
fn init_logging(level: log::LevelFilter) {
    let from_env = std::env::var_os("RUST_LOG").is_some();
    let mut builder = env_logger::Builder::new();
    if from_env {
        builder.parse_default_env();
    } else {
        // Filtering happens through the global max level so `debug` can raise it later
        builder.filter_level(log::LevelFilter::Trace);
    }
    builder.format_timestamp(None).format_target(false).init();
    if !from_env {
        log::set_max_level(level);
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging(if cli.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    });

    let command = cli.command.unwrap_or(Commands::Check(cli.check));

    match command {
        Commands::Check(args) => match commands::check::handle_check(&args, cli.config.as_deref(), cli.no_config) {
            Ok(outcome) if outcome.has_issues() => exit::violations_found(),
            Ok(_) => exit::success(),
            Err(e) => {
                eprintln!("{}: {e:#}", "Error".red().bold());
                exit::tool_error();
            }
        },
        Commands::Init { quiet } => commands::init::handle_init(quiet),
        Commands::Completions { shell, list } => commands::completions::handle_completions(shell, list),
        Commands::Schema { action } => commands::schema::handle_schema(action),
    }
}
