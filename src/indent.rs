//! Indentation helpers shared by the scanner, the transcript parser and the synthesizer.
//!
//! All widths are counted in characters after tab expansion, which is also the
//! unit shellcheck reports columns in.

/// Width of the leading whitespace of `line`.
pub fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Returns true if the line contains nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Minimal indentation over the non-blank lines, or `None` when every line is blank.
pub fn min_indent<'a, I>(lines: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().filter(|l| !is_blank(l)).map(indent_width).min()
}

/// Remove up to `width` leading whitespace characters.
///
/// Stops early at the first non-whitespace character, so a line is never cut
/// into its content.
pub fn strip_indent(line: &str, width: usize) -> &str {
    let mut cut = 0;
    for (taken, (idx, ch)) in line.char_indices().enumerate() {
        if taken == width || !ch.is_whitespace() {
            return &line[idx..];
        }
        cut = idx + ch.len_utf8();
    }
    &line[cut..]
}

/// Expand tab characters to the next multiple of `tab_width`.
pub fn expand_tabs(line: &str, tab_width: usize) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let tab_width = tab_width.max(1);
    let mut out = String::with_capacity(line.len() + tab_width);
    let mut col = 0;
    for ch in line.chars() {
        match ch {
            '\t' => {
                let pad = tab_width - (col % tab_width);
                out.extend(std::iter::repeat_n(' ', pad));
                col += pad;
            }
            '\n' | '\r' => {
                out.push(ch);
                col = 0;
            }
            _ => {
                out.push(ch);
                col += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_width() {
        assert_eq!(indent_width("foo"), 0);
        assert_eq!(indent_width("    foo"), 4);
        assert_eq!(indent_width("   "), 3);
        assert_eq!(indent_width(""), 0);
    }

    #[test]
    fn test_min_indent_skips_blank_lines() {
        let lines = ["    a", "", "  b", "      c", "   "];
        assert_eq!(min_indent(lines.iter().copied()), Some(2));
        assert_eq!(min_indent(["", "  "].iter().copied()), None);
    }

    #[test]
    fn test_strip_indent_never_cuts_content() {
        assert_eq!(strip_indent("    foo", 2), "  foo");
        assert_eq!(strip_indent("  foo", 4), "foo");
        assert_eq!(strip_indent("foo", 3), "foo");
        assert_eq!(strip_indent("   ", 5), "");
    }

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_tabs("\tfoo", 8), "        foo");
        assert_eq!(expand_tabs("ab\tc", 4), "ab  c");
        assert_eq!(expand_tabs("no tabs", 8), "no tabs");
        assert_eq!(expand_tabs("\t", 0), " ");
    }
}
