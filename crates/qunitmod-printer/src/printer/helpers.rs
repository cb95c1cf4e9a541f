use super::Printer;
use qunitmod_parser::parser::{NodeIndex, NodeList};

impl<'a> Printer<'a> {
    // =========================================================================
    // Output Helpers
    // =========================================================================

    pub(super) fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub(super) fn write_char(&mut self, ch: char) {
        self.output.push(ch);
    }

    pub(super) fn write_space(&mut self) {
        self.output.push(' ');
    }

    /// Write a newline. Indentation is written lazily by `write_indent` so
    /// blank lines carry no trailing whitespace.
    pub(super) fn write_line(&mut self) {
        self.output.push('\n');
    }

    pub(super) fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.indent_str);
        }
    }

    pub(super) fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub(super) fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Indentation string for the current level.
    pub(super) fn current_indent(&self) -> String {
        self.indent_str.repeat(self.indent_level as usize)
    }

    /// Column of the next character written, counted in bytes.
    pub(super) fn current_column(&self) -> usize {
        match memchr::memrchr(b'\n', self.output.as_bytes()) {
            Some(newline) => self.output.len() - newline - 1,
            None => self.output.len(),
        }
    }

    // =========================================================================
    // Layout Helpers
    // =========================================================================

    /// Render `f` with a measuring sub-printer and return its output.
    pub(super) fn render_candidate(&self, f: impl FnOnce(&mut Printer<'a>)) -> String {
        let mut sub = self.measuring_printer();
        f(&mut sub);
        sub.output
    }

    /// Whether `candidate` can be written at the current column without
    /// breaking the line or passing the wrap column.
    pub(super) fn fits_on_line(&self, candidate: &str) -> bool {
        !candidate.contains('\n')
            && self.current_column() + candidate.len() <= self.options.wrap_column
    }

    pub(super) fn is_measuring(&self) -> bool {
        self.measuring
    }

    /// Print `nodes` separated by `, ` at assignment precedence.
    pub(super) fn print_comma_list(&mut self, nodes: &NodeList) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_expression(node, super::expressions::PREC_ASSIGNMENT);
        }
    }

    /// `(a, b)` parameter or argument list.
    pub(super) fn print_parenthesized_list(&mut self, nodes: &NodeList) {
        self.write_char('(');
        self.print_comma_list(nodes);
        self.write_char(')');
    }

    pub(super) fn print_optional(&mut self, prefix: &str, node: NodeIndex) {
        if node.is_some() {
            self.write(prefix);
            self.print_expression(node, super::expressions::PREC_ASSIGNMENT);
        }
    }
}
