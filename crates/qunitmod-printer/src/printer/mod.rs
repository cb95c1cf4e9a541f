//! Printer state and entry points.
//!
//! The printer walks the tree once, writing into a `String`. Layout
//! decisions that depend on width (objects, arrays, import clauses) render
//! the candidate single-line form with a measuring sub-printer first and fall
//! back to one element per line when it does not fit.

use qunitmod_parser::parser::node::NodeData;
use qunitmod_parser::parser::{NodeArena, NodeIndex, NodeKind};
use serde::{Deserialize, Serialize};

mod comments;
mod expressions;
mod helpers;
mod literals;
mod statements;

pub use literals::quote_string;

/// Quote character for strings the printer has to invent.
///
/// Strings that came from the source keep their original quotes and escapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
}

impl QuoteStyle {
    pub fn quote_char(self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }
}

/// Formatting options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrintOptions {
    pub quote: QuoteStyle,
    /// Objects, arrays, and import clauses longer than this are broken
    /// across lines.
    pub wrap_column: usize,
    /// Spaces per indentation level.
    pub indent_width: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            quote: QuoteStyle::Single,
            wrap_column: 100,
            indent_width: 2,
        }
    }
}

/// Output of a print run.
#[derive(Clone, Debug, Default)]
pub struct PrintResult {
    pub code: String,
}

pub struct Printer<'a> {
    pub(crate) arena: &'a NodeArena,
    pub(crate) options: PrintOptions,
    output: String,
    indent_level: u32,
    indent_str: String,
    /// Set on sub-printers that render a candidate single-line layout. Nested
    /// containers then follow their own flags only, which keeps measuring
    /// linear in the size of the tree.
    measuring: bool,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a NodeArena, options: PrintOptions) -> Self {
        let indent_str = " ".repeat(options.indent_width);
        Printer {
            arena,
            options,
            output: String::new(),
            indent_level: 0,
            indent_str,
            measuring: false,
        }
    }

    /// Print `root`: a source file, a statement, or an expression.
    pub fn print(&mut self, root: NodeIndex) {
        match self.arena.data(root) {
            Some(NodeData::SourceFile(_)) => self.print_source_file(root),
            Some(_) if is_statement_kind(self.arena.kind(root)) => self.print_statement(root),
            Some(_) => self.print_expression(root, 0),
            None => {}
        }
    }

    pub fn finish(self) -> PrintResult {
        PrintResult { code: self.output }
    }

    /// A fresh printer at the same indentation that records a single-line
    /// candidate rendering.
    fn measuring_printer(&self) -> Printer<'a> {
        Printer {
            arena: self.arena,
            options: self.options.clone(),
            output: String::new(),
            indent_level: self.indent_level,
            indent_str: self.indent_str.clone(),
            measuring: true,
        }
    }
}

fn is_statement_kind(kind: Option<NodeKind>) -> bool {
    matches!(
        kind,
        Some(
            NodeKind::ExpressionStatement
                | NodeKind::VariableStatement
                | NodeKind::Block
                | NodeKind::EmptyStatement
                | NodeKind::ReturnStatement
                | NodeKind::ThrowStatement
                | NodeKind::IfStatement
                | NodeKind::ForStatement
                | NodeKind::ForInStatement
                | NodeKind::ForOfStatement
                | NodeKind::WhileStatement
                | NodeKind::DoStatement
                | NodeKind::BreakStatement
                | NodeKind::ContinueStatement
                | NodeKind::TryStatement
                | NodeKind::SwitchStatement
                | NodeKind::LabeledStatement
                | NodeKind::DebuggerStatement
                | NodeKind::FunctionDeclaration
                | NodeKind::ClassDeclaration
                | NodeKind::ImportDeclaration
                | NodeKind::ExportDeclaration
        )
    )
}
