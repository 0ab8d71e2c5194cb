use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Documents or directories to lint (default: current directory)
    #[arg(required = false)]
    pub paths: Vec<PathBuf>,

    /// Shell dialects to lint (comma-separated: sh, bash, dash, ksh)
    #[arg(long, value_delimiter = ',')]
    pub dialects: Option<Vec<String>>,

    /// shellcheck executable (name on PATH or path)
    #[arg(long)]
    pub executable: Option<String>,

    /// Character that starts a command line in a transcript
    #[arg(long)]
    pub prompt: Option<String>,

    /// Trace blocks, generated scripts and linter output
    #[arg(long)]
    pub debug: bool,

    /// Also write the report to this file (truncated first)
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Tab stop used when expanding tabs
    #[arg(long)]
    pub tab_width: Option<usize>,

    /// Linter timeout in milliseconds (0 disables it)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Exclude specific files or directories (comma-separated glob patterns)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Output format for lint results
    #[arg(long, short = 'o', value_parser = ["text", "full", "concise", "json"], default_value = "text")]
    pub output_format: String,

    /// Output linting results to stderr instead of stdout
    #[arg(long, help = "Output diagnostics to stderr instead of stdout")]
    pub stderr: bool,

    /// Print diagnostics, but nothing else
    #[arg(short, long, help = "Print diagnostics, but nothing else")]
    pub quiet: bool,

    /// Disable all output (but still exit with status code upon detecting diagnostics)
    #[arg(
        short,
        long,
        help = "Disable all output (but still exit with status code upon detecting diagnostics)"
    )]
    pub silent: bool,
}
