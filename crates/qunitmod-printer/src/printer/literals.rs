use std::fmt::Write;

use super::{Printer, QuoteStyle};
use qunitmod_parser::parser::node::{LiteralData, TemplateData};

impl<'a> Printer<'a> {
    // =========================================================================
    // Literals
    // =========================================================================

    /// Parsed strings are written exactly as they appeared; synthesized ones
    /// are quoted with the configured style.
    pub(super) fn print_string_literal(&mut self, literal: &LiteralData) {
        match &literal.raw {
            Some(raw) => self.write(raw),
            None => {
                let quoted = quote_string(&literal.text, self.options.quote);
                self.write(&quoted);
            }
        }
    }

    /// Numbers and regexes keep their source spelling.
    pub(super) fn print_verbatim_literal(&mut self, literal: &LiteralData) {
        let text = literal.raw.as_deref().unwrap_or(&literal.text);
        self.write(text);
    }

    pub(super) fn print_template(&mut self, template: &TemplateData) {
        self.write_char('`');
        for (i, quasi) in template.quasis.iter().enumerate() {
            self.write(quasi);
            if let Some(expression) = template.expressions.get(i) {
                self.write("${");
                self.print_expression(expression, 0);
                self.write_char('}');
            }
        }
        self.write_char('`');
    }
}

/// Quote `value` as a JavaScript string literal.
pub fn quote_string(value: &str, style: QuoteStyle) -> String {
    let quote = style.quote_char();
    let mut result = String::with_capacity(value.len() + 2);
    result.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\u{2028}' | '\u{2029}' => {
                let _ = write!(result, "\\u{:04x}", ch as u32);
            }
            c if c == quote => {
                result.push('\\');
                result.push(c);
            }
            c if (c as u32) < 0x20 => {
                let _ = write!(result, "\\x{:02x}", c as u32);
            }
            c => result.push(c),
        }
    }
    result.push(quote);
    result
}
