use similar::{ChangeTag, TextDiff};
use std::fmt;

/// How a file changed between the two sides of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Add,
    Edit,
    Delete,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::Edit => "edit",
            ChangeKind::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reviewed file: its path, how it changed, and the changed lines.
///
/// `diff` is `None` for deletions; for additions and edits it holds the
/// added/removed lines produced by [`line_diff`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
    pub diff: Option<String>,
}

impl FileChange {
    pub fn new(path: impl Into<String>, kind: ChangeKind, diff: Option<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            diff,
        }
    }
}

/// Compute the line-level difference between two file contents.
///
/// Returns only lines that were purely added or purely removed, prefixed
/// with `+ ` or `- `, one per output line and in diff order. Unchanged
/// lines are discarded. An empty string means the contents are identical
/// line-for-line.
pub fn line_diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);

    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => continue,
        };
        out.push(sign);
        out.push(' ');
        out.push_str(change.value().trim_end_matches('\n'));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_contents_produce_empty_diff() {
        let text = "fn main() {}\n";
        assert_eq!(line_diff(text, text), "");
    }

    #[test]
    fn added_lines_are_prefixed_with_plus() {
        let old = "a\nb\n";
        let new = "a\nb\nc\nd\n";
        assert_eq!(line_diff(old, new), "+ c\n+ d\n");
    }

    #[test]
    fn removed_lines_are_prefixed_with_minus() {
        let old = "a\nb\nc\n";
        let new = "a\nc\n";
        assert_eq!(line_diff(old, new), "- b\n");
    }

    #[test]
    fn replaced_line_shows_removal_then_addition() {
        let old = "let x = 1;\n";
        let new = "let x = 2;\n";
        let diff = line_diff(old, new);
        assert!(diff.contains("- let x = 1;\n"));
        assert!(diff.contains("+ let x = 2;\n"));
        // No unchanged lines leak through.
        for line in diff.lines() {
            assert!(line.starts_with("+ ") || line.starts_with("- "));
        }
    }

    #[test]
    fn diff_against_empty_content_lists_every_line_as_added() {
        let new = "one\ntwo\nthree\n";
        assert_eq!(line_diff("", new), "+ one\n+ two\n+ three\n");
    }

    #[test]
    fn line_diff_is_idempotent() {
        let old = "a\nb\nc\nd\n";
        let new = "a\nx\nc\ny\n";
        let first = line_diff(old, new);
        let second = line_diff(old, new);
        assert_eq!(first, second);
    }
}
