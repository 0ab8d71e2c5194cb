//! Handler for the `check` command.

use anyhow::Context;
use std::path::Path;

use shdoclint_lib::config::{Config, ConfigOverrides};
use shdoclint_lib::discovery::find_documents;
use shdoclint_lib::output::json::format_all_diagnostics_as_json;
use shdoclint_lib::output::{OutputFormat, OutputWriter};
use shdoclint_lib::{DocumentResult, LintEngine, Report};

use crate::cli_types::CheckArgs;

/// What a check run found.
pub struct CheckOutcome {
    pub documents: usize,
    pub total_issues: usize,
}

impl CheckOutcome {
    pub fn has_issues(&self) -> bool {
        self.total_issues > 0
    }
}

fn overrides(args: &CheckArgs) -> ConfigOverrides {
    ConfigOverrides {
        dialects: args.dialects.clone(),
        executable: args.executable.clone(),
        prompt: args.prompt.clone(),
        debug: args.debug,
        tab_width: args.tab_width,
        timeout: args.timeout,
        report_file: args.report.clone(),
        exclude: args.exclude.clone(),
    }
}

/// Load and validate the configuration, then lint every document sequentially.
///
/// Configuration problems are reported before any document is read.
pub fn handle_check(args: &CheckArgs, config_path: Option<&Path>, no_config: bool) -> anyhow::Result<CheckOutcome> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let (mut config, config_file) = Config::load(config_path, no_config, &cwd)?;
    if let Some(path) = &config_file {
        log::info!("Using configuration from {}", path.display());
    }
    config.apply_overrides(overrides(args));
    let config = config.validate()?;

    if config.debug && std::env::var_os("RUST_LOG").is_none() {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let format: OutputFormat = args.output_format.parse().map_err(anyhow::Error::msg)?;
    let formatter = format.create_formatter();
    let writer = OutputWriter::new(args.stderr, args.silent);

    let documents = find_documents(&args.paths, &config.exclude).context("Failed to find documents")?;
    log::info!("Checking {} document(s)", documents.len());

    let mut report = match &config.report_file {
        Some(path) => Report::with_file(path)
            .with_context(|| format!("Failed to create report file {}", path.display()))?,
        None => Report::new(),
    };

    let mut engine = LintEngine::from_config(&config);
    let mut results: Vec<DocumentResult> = Vec::with_capacity(documents.len());

    for document in &documents {
        let result = engine.lint_file(document, &mut report)?;
        let rendered = formatter.format_document(&result);
        if !rendered.is_empty() {
            writer.writeln(&rendered)?;
        }
        results.push(result);
    }

    if format == OutputFormat::Json {
        writer.writeln(&format_all_diagnostics_as_json(&results))?;
    }

    let outcome = CheckOutcome {
        documents: documents.len(),
        total_issues: report.diagnostic_count(),
    };

    if !args.quiet
        && let Some(summary) =
            formatter.format_summary(outcome.documents, report.documents_with_diagnostics(), outcome.total_issues)
    {
        writer.write_error(&summary)?;
    }

    Ok(outcome)
}
