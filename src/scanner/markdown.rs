//! Fenced code blocks in Markdown documents.

use super::LiteralBlock;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

struct OpenFence {
    line: usize,
    language: String,
    marker: String,
}

/// Extract all fenced code blocks from `content` (already tab-expanded).
pub fn scan(content: &str) -> Vec<LiteralBlock> {
    let lines: Vec<&str> = content.lines().collect();
    let mut blocks = Vec::new();
    let mut current: Option<OpenFence> = None;

    let parser = Parser::new_ext(content, Options::all()).into_offset_iter();
    for (event, range) in parser {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let language = info.split_whitespace().next().unwrap_or("").to_string();
                let line = line_of(content, range.start);

                let fence_line = lines.get(line).copied().unwrap_or("").trim_start();
                let fence_char = if fence_line.starts_with('~') { '~' } else { '`' };
                let marker: String = fence_line.chars().take_while(|&c| c == fence_char).collect();

                current = Some(OpenFence { line, language, marker });
            }
            Event::End(TagEnd::CodeBlock) => {
                let Some(fence) = current.take() else {
                    continue;
                };

                let mut last = line_of(content, range.end);
                if content[..range.end].ends_with('\n') {
                    last = last.saturating_sub(1);
                }
                // An unclosed fence runs to the end of its container
                let closing = match lines.get(last) {
                    Some(l) if last > fence.line && l.trim_start().starts_with(&fence.marker) => last,
                    _ => last + 1,
                };

                let first = fence.line + 1;
                let end = closing.min(lines.len());
                if first < end {
                    blocks.push(LiteralBlock::from_lines(fence.language, &lines[first..end], first));
                }
            }
            _ => {}
        }
    }

    blocks
}

/// 0-based line containing byte `offset`.
fn line_of(content: &str, offset: usize) -> usize {
    content[..offset.min(content.len())].bytes().filter(|&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_backtick_fence() {
        let content = "# Usage\n\n```bash\n$ cd mydir\n$ echo \"HELLO\"\nHELLO\n```\n\nDone.\n";
        let blocks = scan(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, "bash");
        assert_eq!(blocks[0].first_line, 3);
        assert_eq!(blocks[0].indent, 0);
        assert_eq!(blocks[0].lines, vec!["$ cd mydir", "$ echo \"HELLO\"", "HELLO"]);
    }

    #[test]
    fn test_tilde_fence_with_info_attributes() {
        let content = "~~~sh {.numberLines}\n$ ls\n~~~\n";
        let blocks = scan(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, "sh");
        assert_eq!(blocks[0].lines, vec!["$ ls"]);
    }

    #[test]
    fn test_fence_inside_list_item() {
        let content = "1. Run:\n\n   ```bash\n   $ make\n   ```\n";
        let blocks = scan(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].first_line, 3);
        assert_eq!(blocks[0].indent, 3);
        assert_eq!(blocks[0].lines, vec!["$ make"]);
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let content = "```bash\n$ echo one\n$ echo two";
        let blocks = scan(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines, vec!["$ echo one", "$ echo two"]);
    }

    #[test]
    fn test_indented_code_and_empty_fences_are_ignored() {
        let content = "Text\n\n    $ not a fence\n\n```bash\n```\n";
        assert!(scan(content).is_empty());
    }
}
