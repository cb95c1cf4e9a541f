//! Diagnostic types reported by the scanner and parser.
//!
//! Diagnostics are collected as data rather than returned as errors, so a
//! caller can decide whether a file with problems is still worth rewriting.

use serde::Serialize;

use crate::position::LineMap;

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Message = 2,
}

/// A scanner or parser diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(start: u32, length: u32, message: impl Into<String>, code: u32) -> Self {
        Self {
            start,
            length,
            message_text: message.into(),
            category: DiagnosticCategory::Error,
            code,
        }
    }

    /// Render as `file:line:col - error QM<code>: message`.
    pub fn format(&self, file_name: &str, line_map: &LineMap) -> String {
        let position = line_map.position_of(self.start);
        let category = match self.category {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Message => "message",
        };
        format!(
            "{}:{}:{} - {} QM{}: {}",
            file_name,
            position.line + 1,
            position.character + 1,
            category,
            self.code,
            self.message_text
        )
    }
}

pub mod diagnostic_codes {
    pub const INVALID_CHARACTER: u32 = 1001;
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1002;
    pub const UNTERMINATED_TEMPLATE_LITERAL: u32 = 1003;
    pub const UNTERMINATED_REGULAR_EXPRESSION: u32 = 1004;
    pub const UNTERMINATED_COMMENT: u32 = 1005;
    pub const TOKEN_EXPECTED: u32 = 1101;
    pub const EXPRESSION_EXPECTED: u32 = 1102;
    pub const IDENTIFIER_EXPECTED: u32 = 1103;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1104;
    pub const PROPERTY_ASSIGNMENT_EXPECTED: u32 = 1105;
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: u32 = 1106;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_uses_one_based_line_and_column() {
        let text = "let a;\nlet = 1;";
        let map = LineMap::build(text);
        let diag = Diagnostic::error(11, 1, "Identifier expected.", diagnostic_codes::IDENTIFIER_EXPECTED);
        assert_eq!(
            diag.format("a.js", &map),
            "a.js:2:5 - error QM1103: Identifier expected."
        );
    }
}
