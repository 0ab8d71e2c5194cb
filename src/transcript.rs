//! Transcript parsing.
//!
//! A transcript is the text of a shell code block that mixes prompted commands
//! with their captured output:
//!
//! ```text
//! $ ls -l \
//!     /tmp
//! total 0
//! $ echo done
//! ```
//!
//! Every line is classified on its own, using only its content and whether the
//! line before it left a command continued with a trailing backslash. Lines that
//! are not part of a command are later replaced by a placeholder comment so the
//! generated script keeps exactly one line per transcript line.

use crate::indent::{indent_width, is_blank};

/// Comment emitted in place of every non-command transcript line.
pub const PLACEHOLDER: &str = "# Output line";

/// Classification of a single transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// First non-whitespace character is the prompt marker.
    CommandStart,
    /// Follows a command line that ended with a trailing backslash.
    Continuation,
    /// Captured output, or anything else that is not part of a command.
    Output,
    /// Whitespace-only line outside of a continued command.
    Blank,
}

impl LineKind {
    /// Returns true for lines that carry shell source into the generated script.
    pub fn is_command(self) -> bool {
        matches!(self, LineKind::CommandStart | LineKind::Continuation)
    }
}

/// One transcript line with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub kind: LineKind,
    /// Shell source for command lines, before dedent. Empty for output and blank lines.
    pub body: String,
}

impl ClassifiedLine {
    fn command(kind: LineKind, body: String) -> Self {
        Self { kind, body }
    }

    fn non_command(kind: LineKind) -> Self {
        Self {
            kind,
            body: String::new(),
        }
    }
}

/// A fully classified transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub lines: Vec<ClassifiedLine>,
    /// Minimal leading whitespace over all non-blank command bodies.
    pub lmin: usize,
}

impl Transcript {
    /// Classify the lines of a code block using `prompt` as the command marker.
    pub fn parse<S: AsRef<str>>(lines: &[S], prompt: char) -> Self {
        let mut classified = Vec::with_capacity(lines.len());
        let mut continued = false;

        for line in lines {
            let line = line.as_ref();
            let trimmed = line.trim_start();

            let entry = if trimmed.starts_with(prompt) {
                ClassifiedLine::command(LineKind::CommandStart, strip_prompt(line, prompt))
            } else if continued {
                // A blank line here ends the continued command (and resets state below)
                // instead of becoming a placeholder.
                ClassifiedLine::command(LineKind::Continuation, line.to_string())
            } else if is_blank(line) {
                ClassifiedLine::non_command(LineKind::Blank)
            } else {
                ClassifiedLine::non_command(LineKind::Output)
            };

            continued = entry.kind.is_command() && line.trim_end().ends_with('\\');
            classified.push(entry);
        }

        let lmin = classified
            .iter()
            .filter(|l| l.kind.is_command() && !is_blank(&l.body))
            .map(|l| indent_width(&l.body))
            .min()
            .unwrap_or(0);

        Self {
            lines: classified,
            lmin,
        }
    }

    /// Number of lines that belong to a command.
    pub fn command_count(&self) -> usize {
        self.lines.iter().filter(|l| l.kind.is_command()).count()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Replace the prompt character with a space.
///
/// Every command and continuation line then keeps its original columns, so
/// one column shift serves the whole block.
fn strip_prompt(line: &str, prompt: char) -> String {
    let lead = line.len() - line.trim_start().len();
    let mut body = String::with_capacity(line.len());
    body.push_str(&line[..lead]);
    body.push(' ');
    body.push_str(&line[lead + prompt.len_utf8()..]);
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(t: &Transcript) -> Vec<LineKind> {
        t.lines.iter().map(|l| l.kind).collect()
    }

    #[test]
    fn test_commands_and_output() {
        let t = Transcript::parse(&["$ echo hello", "hello", "$ ls"], '$');
        assert_eq!(
            kinds(&t),
            vec![LineKind::CommandStart, LineKind::Output, LineKind::CommandStart]
        );
        assert_eq!(t.lines[0].body, "  echo hello");
        assert_eq!(t.lines[1].body, "");
        assert_eq!(t.lmin, 2);
        assert_eq!(t.command_count(), 2);
    }

    #[test]
    fn test_continuation_is_part_of_command() {
        let t = Transcript::parse(&["$ cmd \\", "  more args"], '$');
        assert_eq!(kinds(&t), vec![LineKind::CommandStart, LineKind::Continuation]);
        assert_eq!(t.lines[1].body, "  more args");
    }

    #[test]
    fn test_continuation_chain_ends_on_unterminated_line() {
        let t = Transcript::parse(&["$ a \\", "  b \\", "  c", "output"], '$');
        assert_eq!(
            kinds(&t),
            vec![
                LineKind::CommandStart,
                LineKind::Continuation,
                LineKind::Continuation,
                LineKind::Output
            ]
        );
    }

    #[test]
    fn test_output_line_with_backslash_does_not_continue() {
        let t = Transcript::parse(&["$ printf 'a\\\\'", "a\\", "next output"], '$');
        assert_eq!(
            kinds(&t),
            vec![LineKind::CommandStart, LineKind::Output, LineKind::Output]
        );
    }

    #[test]
    fn test_blank_line_outside_command() {
        let t = Transcript::parse(&["$ ls", "", "   ", "$ pwd"], '$');
        assert_eq!(
            kinds(&t),
            vec![
                LineKind::CommandStart,
                LineKind::Blank,
                LineKind::Blank,
                LineKind::CommandStart
            ]
        );
    }

    /// Documented quirk: a blank line right after a continued command is kept as an
    /// empty command line (terminating the continuation) rather than a placeholder,
    /// and the continuation state is reset.
    #[test]
    fn test_blank_line_terminates_continuation_quirk() {
        let t = Transcript::parse(&["$ echo a \\", "", "b"], '$');
        assert_eq!(
            kinds(&t),
            vec![LineKind::CommandStart, LineKind::Continuation, LineKind::Output]
        );
        assert_eq!(t.lines[1].body, "");
    }

    #[test]
    fn test_prompt_not_first_character_is_output() {
        let t = Transcript::parse(&["output $ not a command"], '$');
        assert_eq!(kinds(&t), vec![LineKind::Output]);
        assert_eq!(t.command_count(), 0);
        assert_eq!(t.lmin, 0);
    }

    #[test]
    fn test_indented_prompt_keeps_relative_indent() {
        let t = Transcript::parse(&["$ if true; then", "  $   echo x", "$ fi"], '$');
        assert_eq!(t.lines[1].body, "      echo x");
        assert_eq!(t.lmin, 2);
    }

    #[test]
    fn test_unindented_continuation_sets_lmin() {
        let t = Transcript::parse(&["$ ls \\", "/tmp"], '$');
        assert_eq!(t.lines[0].body, "  ls \\");
        assert_eq!(t.lines[1].body, "/tmp");
        assert_eq!(t.lmin, 0);
    }

    #[test]
    fn test_custom_prompt() {
        let t = Transcript::parse(&["% make", "$ not a command"], '%');
        assert_eq!(kinds(&t), vec![LineKind::CommandStart, LineKind::Output]);
    }

    #[test]
    fn test_empty_transcript() {
        let lines: [&str; 0] = [];
        let t = Transcript::parse(&lines, '$');
        assert!(t.is_empty());
        assert_eq!(t.lmin, 0);
    }
}
