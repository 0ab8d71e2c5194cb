//! Locating Python docstrings referenced by `.. autofunction::` directives.
//!
//! This is a line-oriented reader, not a Python parser: it finds a top-level
//! `def` by name and reads the triple-quoted string that opens its body.

use crate::indent::{expand_tabs, is_blank, min_indent, strip_indent};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static STRING_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[rRuU]{0,2}("""|''')"#).expect("valid regex"));

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("'{0}' is not a dotted module.function name")]
    InvalidTarget(String),
    #[error("module '{module}' not found in python path")]
    ModuleNotFound { module: String },
    #[error("function '{function}' not found in {}", file.display())]
    FunctionNotFound { function: String, file: PathBuf },
    #[error("function '{function}' in {} has no docstring", file.display())]
    NoDocstring { function: String, file: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
}

/// A cleaned docstring with the position of each of its lines in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Docstring {
    /// Lines after `inspect.cleandoc`-style cleaning.
    pub lines: Vec<String>,
    /// 0-based source line of every entry in `lines`.
    pub source_lines: Vec<usize>,
    /// Indentation removed from every line but the first.
    pub margin: usize,
    /// 0-based line of the `def` statement.
    pub def_line: usize,
}

/// A docstring resolved from an autodoc target.
#[derive(Debug, Clone)]
pub struct ResolvedDocstring {
    pub file: PathBuf,
    pub qualname: String,
    pub docstring: Docstring,
}

/// Candidate files for `module` (dotted) below `root`.
fn module_candidates(root: &Path, module: &str) -> [PathBuf; 2] {
    let rel: PathBuf = module.split('.').collect();
    [root.join(&rel).with_extension("py"), root.join(rel).join("__init__.py")]
}

/// Resolve `pkg.module.function` against the given search roots.
pub fn resolve(target: &str, roots: &[PathBuf], tab_width: usize) -> Result<ResolvedDocstring, ResolveError> {
    let Some((module, function)) = target.rsplit_once('.') else {
        return Err(ResolveError::InvalidTarget(target.to_string()));
    };
    if module.is_empty() || function.is_empty() {
        return Err(ResolveError::InvalidTarget(target.to_string()));
    }

    let file = roots
        .iter()
        .flat_map(|root| module_candidates(root, module))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ResolveError::ModuleNotFound {
            module: module.to_string(),
        })?;
    log::debug!("Resolved module '{module}' to {}", file.display());

    let content = std::fs::read_to_string(&file).map_err(|source| ResolveError::Io {
        path: file.clone(),
        source,
    })?;
    let lines: Vec<String> = content.lines().map(|l| expand_tabs(l, tab_width)).collect();

    let def_line = find_function(&lines, function).ok_or_else(|| ResolveError::FunctionNotFound {
        function: function.to_string(),
        file: file.clone(),
    })?;
    let docstring = read_docstring(&lines, def_line).ok_or_else(|| ResolveError::NoDocstring {
        function: function.to_string(),
        file: file.clone(),
    })?;

    Ok(ResolvedDocstring {
        file,
        qualname: target.to_string(),
        docstring,
    })
}

/// 0-based line of the top-level `def name(` statement.
pub fn find_function<S: AsRef<str>>(lines: &[S], name: &str) -> Option<usize> {
    let pattern = Regex::new(&format!(r"^(?:async\s+)?def\s+{}\s*\(", regex::escape(name))).ok()?;
    lines.iter().position(|l| pattern.is_match(l.as_ref()))
}

/// Read the docstring of the function defined at `def_line`.
pub fn read_docstring<S: AsRef<str>>(lines: &[S], def_line: usize) -> Option<Docstring> {
    // The signature may span several lines; the body starts after the line ending in ':'
    let header_end = (def_line..lines.len()).find(|&i| strip_comment(lines[i].as_ref()).trim_end().ends_with(':'))?;
    let open = (header_end + 1..lines.len()).find(|&i| !is_blank(lines[i].as_ref()))?;

    let opening = lines[open].as_ref();
    let trimmed = opening.trim_start();
    let prefix = STRING_PREFIX.captures(trimmed)?;
    let quote = prefix.get(1)?.as_str();
    let after_quote = &trimmed[prefix.get(0)?.end()..];

    let mut raw: Vec<(usize, String)> = Vec::new();
    if let Some(end) = after_quote.find(quote) {
        raw.push((open, after_quote[..end].to_string()));
    } else {
        raw.push((open, after_quote.to_string()));
        let mut closed = false;
        for (i, line) in lines.iter().enumerate().skip(open + 1) {
            let line = line.as_ref();
            if let Some(end) = line.find(quote) {
                raw.push((i, line[..end].to_string()));
                closed = true;
                break;
            }
            raw.push((i, line.to_string()));
        }
        if !closed {
            return None;
        }
    }

    Some(cleandoc(raw, def_line))
}

/// Python's `inspect.cleandoc`, keeping track of source lines.
fn cleandoc(raw: Vec<(usize, String)>, def_line: usize) -> Docstring {
    let margin = min_indent(raw.iter().skip(1).map(|(_, l)| l.as_str())).unwrap_or(0);

    let mut entries: Vec<(usize, String)> = raw
        .into_iter()
        .enumerate()
        .map(|(n, (line_no, text))| {
            let cleaned = if n == 0 {
                text.trim_start().to_string()
            } else if is_blank(&text) {
                String::new()
            } else {
                strip_indent(&text, margin).trim_end().to_string()
            };
            (line_no, cleaned)
        })
        .collect();

    while entries.first().is_some_and(|(_, l)| l.is_empty()) {
        entries.remove(0);
    }
    while entries.last().is_some_and(|(_, l)| l.is_empty()) {
        entries.pop();
    }

    let (source_lines, lines) = entries.into_iter().unzip();
    Docstring {
        lines,
        source_lines,
        margin,
        def_line,
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}
