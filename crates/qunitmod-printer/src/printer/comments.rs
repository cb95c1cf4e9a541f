//! Comment emission.
//!
//! Leading comments go on their own lines above the node. Trailing comments
//! stay on the node's last line unless they started on a new line in the
//! source. Dangling comments are written before the closing brace of the
//! container that owns them.

use super::Printer;
use qunitmod_common::comments::{Comment, format_multi_line_comment};
use qunitmod_parser::parser::NodeIndex;

impl<'a> Printer<'a> {
    fn write_comment_text(&mut self, comment: &Comment) {
        if comment.is_multi_line() {
            let indent = self.current_indent();
            let text = format_multi_line_comment(&comment.text, &indent);
            self.write(&text);
        } else {
            self.write(comment.text.trim_end());
        }
    }

    /// Leading comments of a statement-like node, each on its own indented
    /// line. Assumes the output is at the start of a line.
    pub(super) fn print_leading_comment_lines(&mut self, node: NodeIndex) {
        let arena = self.arena;
        for (i, comment) in arena.leading_comments(node).iter().enumerate() {
            if i > 0 && comment.has_preceding_blank_line {
                self.write_line();
            }
            self.write_indent();
            self.write_comment_text(comment);
            self.write_line();
        }
    }

    /// Trailing comments of a statement-like node.
    pub(super) fn print_trailing_comments(&mut self, node: NodeIndex) {
        let arena = self.arena;
        for comment in arena.trailing_comments(node) {
            if comment.has_preceding_line_break {
                self.write_line();
                self.write_indent();
            } else {
                self.write_space();
            }
            self.write_comment_text(comment);
        }
    }

    /// Leading comments in expression position, written inline.
    pub(super) fn print_inline_leading_comments(&mut self, node: NodeIndex) {
        let arena = self.arena;
        for comment in arena.leading_comments(node) {
            self.write_comment_text(comment);
            if comment.requires_trailing_line_break() {
                self.write_line();
                self.write_indent();
            } else {
                self.write_space();
            }
        }
    }

    /// Dangling comments of a container, one per line at the current indent.
    /// Assumes the output is at the start of a line.
    pub(super) fn print_dangling_comment_lines(&mut self, container: NodeIndex) {
        let arena = self.arena;
        for (i, comment) in arena.dangling_comments(container).iter().enumerate() {
            if comment.has_preceding_blank_line && (i > 0 || !self.follows_blank_or_open_brace()) {
                self.write_line();
            }
            self.write_indent();
            self.write_comment_text(comment);
            self.write_line();
        }
    }

    pub(super) fn has_comments(&self, node: NodeIndex) -> bool {
        self.arena.comments(node).is_some_and(|c| !c.is_empty())
    }

    fn follows_blank_or_open_brace(&self) -> bool {
        self.output.is_empty() || self.output.ends_with("\n\n") || self.output.ends_with("{\n")
    }
}
