//! reStructuredText directive scanning.
//!
//! Only the pieces needed to find tagged literal blocks are parsed:
//!
//! ```rst
//! .. code-block:: bash
//!    :linenos:
//!
//!    $ echo hello
//!    hello
//! ```
//!
//! and autodoc directives that pull a docstring into the document:
//!
//! ```rst
//! .. autofunction:: mypackage.mymodule.func
//! ```

use super::LiteralBlock;
use crate::indent::{indent_width, is_blank};
use regex::Regex;
use std::sync::LazyLock;

static CODE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)\.\.\s+(?:code-block|code|sourcecode)::(?:\s+(\S+))?\s*$").expect("valid regex")
});

static AUTODOC_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)\.\.\s+autofunction::\s+(\S+)\s*$").expect("valid regex"));

/// Something of interest found while scanning a reST source, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RstItem {
    Literal(LiteralBlock),
    /// `.. autofunction::` directive on the given 0-based line.
    Autodoc { line: usize, target: String },
}

/// Scan `lines` (already tab-expanded) for code and autodoc directives.
pub fn scan<S: AsRef<str>>(lines: &[S]) -> Vec<RstItem> {
    let mut items = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].as_ref();

        if let Some(caps) = AUTODOC_DIRECTIVE.captures(line) {
            items.push(RstItem::Autodoc {
                line: i,
                target: caps[2].to_string(),
            });
            i += 1;
            continue;
        }

        let Some(caps) = CODE_DIRECTIVE.captures(line) else {
            i += 1;
            continue;
        };

        let directive_indent = caps[1].chars().count();
        let language = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
        let (block, next) = read_body(lines, i + 1, directive_indent);
        if let Some(mut block) = block {
            block.language = language;
            items.push(RstItem::Literal(block));
        }
        i = next;
    }

    items
}

/// Read the body of a directive whose first line follows `start`.
///
/// Returns the block (if it has any content) and the index to continue scanning at.
fn read_body<S: AsRef<str>>(lines: &[S], start: usize, directive_indent: usize) -> (Option<LiteralBlock>, usize) {
    let nested = |l: &str| is_blank(l) || indent_width(l) > directive_indent;

    let mut j = start;
    // Options like `:linenos:` directly below the directive
    while j < lines.len() {
        let l = lines[j].as_ref();
        if is_blank(l) || indent_width(l) <= directive_indent || !l.trim_start().starts_with(':') {
            break;
        }
        j += 1;
    }
    while j < lines.len() && is_blank(lines[j].as_ref()) {
        j += 1;
    }

    let first = j;
    while j < lines.len() && nested(lines[j].as_ref()) {
        j += 1;
    }
    let mut last = j;
    while last > first && is_blank(lines[last - 1].as_ref()) {
        last -= 1;
    }

    if first == last {
        return (None, j.max(start));
    }

    (Some(LiteralBlock::from_lines(String::new(), &lines[first..last], first)), j)
}
