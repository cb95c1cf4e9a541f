//! Comment Preservation
//!
//! Comments are not part of the syntax tree proper. The scanner collects the
//! comments found in the trivia before each token, and the parser attaches
//! them to the statement or property they precede (leading) or follow on the
//! same line (trailing). The codemod moves them explicitly when it replaces a
//! node, so rewrites never drop a comment silently.

use serde::{Deserialize, Serialize};

/// Kind of comment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentKind {
    /// `// ...`
    SingleLine,
    /// `/* ... */`
    MultiLine,
}

/// A comment found in source trivia.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub kind: CommentKind,
    /// Full comment text including the delimiters.
    pub text: String,
    /// A line break separates this comment from the preceding token or comment.
    pub has_preceding_line_break: bool,
    /// An empty line separates this comment from the preceding token or comment.
    pub has_preceding_blank_line: bool,
}

impl Comment {
    pub fn new(kind: CommentKind, text: impl Into<String>) -> Self {
        Comment {
            kind,
            text: text.into(),
            has_preceding_line_break: true,
            has_preceding_blank_line: false,
        }
    }

    pub fn is_multi_line(&self) -> bool {
        self.kind == CommentKind::MultiLine
    }

    /// A single-line comment always needs a line break after it.
    pub fn requires_trailing_line_break(&self) -> bool {
        self.kind == CommentKind::SingleLine
    }
}

/// Re-indent the continuation lines of a multi-line comment.
///
/// The first line is written at the current output column; the remaining
/// lines have their common leading whitespace replaced by `indent`.
pub fn format_multi_line_comment(text: &str, indent: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= 1 {
        return text.to_string();
    }

    let common = lines[1..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut result = String::with_capacity(text.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            result.push_str(line);
            continue;
        }
        result.push('\n');
        if line.trim().is_empty() {
            continue;
        }
        result.push_str(indent);
        // Keep the ` * ` alignment of block comments.
        let stripped = &line[common.min(line.len() - line.trim_start().len())..];
        if stripped.starts_with('*') {
            result.push(' ');
        }
        result.push_str(stripped);
    }
    result
}
