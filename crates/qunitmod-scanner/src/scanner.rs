//! Tokenizer state machine.
//!
//! The scanner runs once over the whole source text and produces a token
//! vector. Each token records the comments and line breaks found in the trivia
//! before it, which is all the parser needs for ASI and comment attachment.
//! Regex-versus-division is decided from the previous significant token, and
//! template literal substitutions are tracked with a brace stack so `}` can
//! resume the enclosing template.

use memchr::{memchr2, memmem};
use qunitmod_common::comments::{Comment, CommentKind};
use qunitmod_common::diagnostics::{Diagnostic, diagnostic_codes};
use tracing::trace;

use crate::char_codes::{
    is_identifier_part, is_identifier_start, is_line_break, is_white_space_single_line,
};
use crate::syntax_kind::{SyntaxKind, keyword_from_str};

pub mod token_flags {
    pub const NONE: u8 = 0;
    pub const PRECEDING_LINE_BREAK: u8 = 1 << 0;
    pub const PRECEDING_BLANK_LINE: u8 = 1 << 1;
    pub const UNTERMINATED: u8 = 1 << 2;
}

/// A scanned token.
#[derive(Clone, Debug)]
pub struct Token {
    pub kind: SyntaxKind,
    pub pos: u32,
    pub end: u32,
    pub flags: u8,
    /// Identifier text, cooked string value, or raw text for numeric,
    /// regex, and template tokens.
    pub value: String,
    /// Comments found in the trivia before this token.
    pub leading_comments: Vec<Comment>,
}

impl Token {
    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags & token_flags::PRECEDING_LINE_BREAK != 0
    }

    #[inline]
    pub fn has_preceding_blank_line(&self) -> bool {
        self.flags & token_flags::PRECEDING_BLANK_LINE != 0
    }
}

/// Output of a full scan.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

const PUNCTUATION: &[(&str, SyntaxKind)] = &[
    (">>>=", SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken),
    ("...", SyntaxKind::DotDotDotToken),
    ("===", SyntaxKind::EqualsEqualsEqualsToken),
    ("!==", SyntaxKind::ExclamationEqualsEqualsToken),
    ("**=", SyntaxKind::AsteriskAsteriskEqualsToken),
    ("<<=", SyntaxKind::LessThanLessThanEqualsToken),
    (">>=", SyntaxKind::GreaterThanGreaterThanEqualsToken),
    (">>>", SyntaxKind::GreaterThanGreaterThanGreaterThanToken),
    ("&&=", SyntaxKind::AmpersandAmpersandEqualsToken),
    ("||=", SyntaxKind::BarBarEqualsToken),
    ("??=", SyntaxKind::QuestionQuestionEqualsToken),
    ("=>", SyntaxKind::EqualsGreaterThanToken),
    ("==", SyntaxKind::EqualsEqualsToken),
    ("!=", SyntaxKind::ExclamationEqualsToken),
    ("<=", SyntaxKind::LessThanEqualsToken),
    (">=", SyntaxKind::GreaterThanEqualsToken),
    ("**", SyntaxKind::AsteriskAsteriskToken),
    ("++", SyntaxKind::PlusPlusToken),
    ("--", SyntaxKind::MinusMinusToken),
    ("<<", SyntaxKind::LessThanLessThanToken),
    (">>", SyntaxKind::GreaterThanGreaterThanToken),
    ("&&", SyntaxKind::AmpersandAmpersandToken),
    ("||", SyntaxKind::BarBarToken),
    ("??", SyntaxKind::QuestionQuestionToken),
    ("?.", SyntaxKind::QuestionDotToken),
    ("+=", SyntaxKind::PlusEqualsToken),
    ("-=", SyntaxKind::MinusEqualsToken),
    ("*=", SyntaxKind::AsteriskEqualsToken),
    ("/=", SyntaxKind::SlashEqualsToken),
    ("%=", SyntaxKind::PercentEqualsToken),
    ("&=", SyntaxKind::AmpersandEqualsToken),
    ("|=", SyntaxKind::BarEqualsToken),
    ("^=", SyntaxKind::CaretEqualsToken),
    ("(", SyntaxKind::OpenParenToken),
    (")", SyntaxKind::CloseParenToken),
    ("[", SyntaxKind::OpenBracketToken),
    ("]", SyntaxKind::CloseBracketToken),
    (".", SyntaxKind::DotToken),
    (";", SyntaxKind::SemicolonToken),
    (",", SyntaxKind::CommaToken),
    ("<", SyntaxKind::LessThanToken),
    (">", SyntaxKind::GreaterThanToken),
    ("+", SyntaxKind::PlusToken),
    ("-", SyntaxKind::MinusToken),
    ("*", SyntaxKind::AsteriskToken),
    ("/", SyntaxKind::SlashToken),
    ("%", SyntaxKind::PercentToken),
    ("&", SyntaxKind::AmpersandToken),
    ("|", SyntaxKind::BarToken),
    ("^", SyntaxKind::CaretToken),
    ("!", SyntaxKind::ExclamationToken),
    ("~", SyntaxKind::TildeToken),
    ("?", SyntaxKind::QuestionToken),
    (":", SyntaxKind::ColonToken),
    ("=", SyntaxKind::EqualsToken),
    ("@", SyntaxKind::AtToken),
];

pub struct ScannerState<'a> {
    text: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    /// One entry per open `{` or `${`; `true` marks a template substitution.
    brace_stack: Vec<bool>,
    pending_flags: u8,
}

impl<'a> ScannerState<'a> {
    pub fn new(text: &'a str) -> ScannerState<'a> {
        ScannerState {
            text,
            pos: 0,
            tokens: Vec::with_capacity(text.len() / 4),
            diagnostics: Vec::new(),
            brace_stack: Vec::new(),
            pending_flags: token_flags::NONE,
        }
    }

    /// Scan the whole text. The last token is always `EndOfFileToken`.
    pub fn scan_all(mut self) -> ScanResult {
        loop {
            let (leading_comments, trivia_flags) = self.scan_trivia();
            let start = self.pos;
            if self.pos >= self.text.len() {
                self.tokens.push(Token {
                    kind: SyntaxKind::EndOfFileToken,
                    pos: start as u32,
                    end: start as u32,
                    flags: trivia_flags,
                    value: String::new(),
                    leading_comments,
                });
                break;
            }

            self.pending_flags = token_flags::NONE;
            let (kind, value) = self.scan_token();
            self.tokens.push(Token {
                kind,
                pos: start as u32,
                end: self.pos as u32,
                flags: trivia_flags | self.pending_flags,
                value,
                leading_comments,
            });
        }

        trace!(tokens = self.tokens.len(), "scan complete");
        ScanResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    // =========================================================================
    // Character access
    // =========================================================================

    #[inline]
    fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[inline]
    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.text.get(self.pos + offset..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes().get(self.pos + offset).copied()
    }

    fn error(&mut self, start: usize, message: &str, code: u32) {
        let length = self.pos.saturating_sub(start).max(1) as u32;
        self.diagnostics
            .push(Diagnostic::error(start as u32, length, message, code));
    }

    // =========================================================================
    // Trivia
    // =========================================================================

    fn scan_trivia(&mut self) -> (Vec<Comment>, u8) {
        let mut comments = Vec::new();
        let mut flags = token_flags::NONE;
        // Line breaks since the previous token or comment.
        let mut line_breaks = 0u32;
        let at_file_start = self.tokens.is_empty();

        while let Some(ch) = self.peek_char() {
            if ch == '\r' {
                self.pos += 1;
                if self.byte_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
                line_breaks += 1;
                flags |= token_flags::PRECEDING_LINE_BREAK;
                continue;
            }
            if is_line_break(ch) {
                self.pos += ch.len_utf8();
                line_breaks += 1;
                flags |= token_flags::PRECEDING_LINE_BREAK;
                continue;
            }
            if is_white_space_single_line(ch) {
                self.pos += ch.len_utf8();
                continue;
            }

            let start = self.pos;
            let kind = match (ch, self.byte_at(1)) {
                ('/', Some(b'/')) => CommentKind::SingleLine,
                ('#', Some(b'!')) if start == 0 => CommentKind::SingleLine,
                ('/', Some(b'*')) => CommentKind::MultiLine,
                _ => break,
            };

            match kind {
                CommentKind::SingleLine => {
                    let rest = &self.bytes()[start..];
                    self.pos = start + memchr2(b'\n', b'\r', rest).unwrap_or(rest.len());
                }
                CommentKind::MultiLine => {
                    let body = &self.bytes()[start + 2..];
                    match memmem::find(body, b"*/") {
                        Some(offset) => self.pos = start + 2 + offset + 2,
                        None => {
                            self.pos = self.text.len();
                            self.error(
                                start,
                                "'*/' expected.",
                                diagnostic_codes::UNTERMINATED_COMMENT,
                            );
                        }
                    }
                }
            }

            let text = &self.text[start..self.pos];
            if kind == CommentKind::MultiLine && text.contains('\n') {
                flags |= token_flags::PRECEDING_LINE_BREAK;
            }
            comments.push(Comment {
                kind,
                text: text.to_string(),
                has_preceding_line_break: line_breaks > 0 || at_file_start,
                has_preceding_blank_line: line_breaks > 1,
            });
            line_breaks = 0;
        }

        if line_breaks > 1 {
            flags |= token_flags::PRECEDING_BLANK_LINE;
        }
        (comments, flags)
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    fn scan_token(&mut self) -> (SyntaxKind, String) {
        let Some(ch) = self.peek_char() else {
            return (SyntaxKind::EndOfFileToken, String::new());
        };

        if is_identifier_start(ch) {
            return self.scan_identifier();
        }
        if ch.is_ascii_digit() || (ch == '.' && self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit())) {
            return self.scan_number();
        }

        match ch {
            '"' | '\'' => self.scan_string(ch),
            '`' => {
                self.pos += 1;
                self.scan_template_part(true)
            }
            '#' if self.peek_char_at(1).is_some_and(is_identifier_start) => {
                self.pos += 1;
                let (_, name) = self.scan_identifier();
                (SyntaxKind::PrivateIdentifier, format!("#{name}"))
            }
            '/' if self.regex_allowed() => self.scan_regex(),
            '}' => {
                if self.brace_stack.pop() == Some(true) {
                    self.pos += 1;
                    self.scan_template_part(false)
                } else {
                    self.pos += 1;
                    (SyntaxKind::CloseBraceToken, String::new())
                }
            }
            '{' => {
                self.brace_stack.push(false);
                self.pos += 1;
                (SyntaxKind::OpenBraceToken, String::new())
            }
            _ => self.scan_punctuation(ch),
        }
    }

    fn regex_allowed(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(token) => !token.kind.ends_expression(),
        }
    }

    fn scan_identifier(&mut self) -> (SyntaxKind, String) {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        let text = &self.text[start..self.pos];
        match keyword_from_str(text) {
            Some(keyword) => (keyword, text.to_string()),
            None => (SyntaxKind::Identifier, text.to_string()),
        }
    }

    fn scan_number(&mut self) -> (SyntaxKind, String) {
        let start = self.pos;
        let radix_prefix = self.byte_at(0) == Some(b'0')
            && matches!(self.byte_at(1), Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B'));

        if radix_prefix {
            self.pos += 2;
            while self
                .byte_at(0)
                .is_some_and(|b| b.is_ascii_hexdigit() || b == b'_')
            {
                self.pos += 1;
            }
        } else {
            self.skip_decimal_digits();
            if self.byte_at(0) == Some(b'.') {
                self.pos += 1;
                self.skip_decimal_digits();
            }
            if matches!(self.byte_at(0), Some(b'e' | b'E')) {
                let sign = usize::from(matches!(self.byte_at(1), Some(b'+' | b'-')));
                if self.byte_at(1 + sign).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1 + sign;
                    self.skip_decimal_digits();
                }
            }
        }
        if self.byte_at(0) == Some(b'n') {
            self.pos += 1;
        }

        (SyntaxKind::NumericLiteral, self.text[start..self.pos].to_string())
    }

    fn skip_decimal_digits(&mut self) {
        while self
            .byte_at(0)
            .is_some_and(|b| b.is_ascii_digit() || b == b'_')
        {
            self.pos += 1;
        }
    }

    fn scan_string(&mut self, quote: char) -> (SyntaxKind, String) {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();

        loop {
            let Some(ch) = self.peek_char() else {
                self.pending_flags |= token_flags::UNTERMINATED;
                self.error(
                    start,
                    "Unterminated string literal.",
                    diagnostic_codes::UNTERMINATED_STRING_LITERAL,
                );
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == '\\' {
                self.pos += 1;
                self.scan_escape(&mut value);
                continue;
            }
            if ch == '\n' || ch == '\r' {
                self.pending_flags |= token_flags::UNTERMINATED;
                self.error(
                    start,
                    "Unterminated string literal.",
                    diagnostic_codes::UNTERMINATED_STRING_LITERAL,
                );
                break;
            }
            value.push(ch);
            self.pos += ch.len_utf8();
        }

        (SyntaxKind::StringLiteral, value)
    }

    /// Cook one escape sequence; `self.pos` is just past the backslash.
    fn scan_escape(&mut self, out: &mut String) {
        let Some(ch) = self.peek_char() else {
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' if !self.byte_at(0).is_some_and(|b| b.is_ascii_digit()) => out.push('\0'),
            'x' => {
                let code = self.scan_hex_digits(2, 2);
                out.push(code.and_then(char::from_u32).unwrap_or('\u{FFFD}'));
            }
            'u' => {
                let code = if self.byte_at(0) == Some(b'{') {
                    self.pos += 1;
                    let code = self.scan_hex_digits(1, 6);
                    if self.byte_at(0) == Some(b'}') {
                        self.pos += 1;
                    }
                    code
                } else {
                    self.scan_hex_digits(4, 4)
                };
                out.push(code.and_then(char::from_u32).unwrap_or('\u{FFFD}'));
            }
            // Line continuation
            '\r' => {
                if self.byte_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }

    fn scan_hex_digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let start = self.pos;
        while self.pos - start < max && self.byte_at(0).is_some_and(|b| b.is_ascii_hexdigit()) {
            self.pos += 1;
        }
        if self.pos - start < min {
            return None;
        }
        u32::from_str_radix(&self.text[start..self.pos], 16).ok()
    }

    /// Scan template text after `` ` `` (`from_backtick`) or after the `}`
    /// closing a substitution.
    fn scan_template_part(&mut self, from_backtick: bool) -> (SyntaxKind, String) {
        let content_start = self.pos;
        loop {
            let Some(ch) = self.peek_char() else {
                self.pending_flags |= token_flags::UNTERMINATED;
                self.error(
                    content_start.saturating_sub(1),
                    "Unterminated template literal.",
                    diagnostic_codes::UNTERMINATED_TEMPLATE_LITERAL,
                );
                let raw = self.text[content_start..].to_string();
                let kind = if from_backtick {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
                return (kind, raw);
            };

            match ch {
                '`' => {
                    let raw = self.text[content_start..self.pos].to_string();
                    self.pos += 1;
                    let kind = if from_backtick {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                    return (kind, raw);
                }
                '$' if self.byte_at(1) == Some(b'{') => {
                    let raw = self.text[content_start..self.pos].to_string();
                    self.pos += 2;
                    self.brace_stack.push(true);
                    let kind = if from_backtick {
                        SyntaxKind::TemplateHead
                    } else {
                        SyntaxKind::TemplateMiddle
                    };
                    return (kind, raw);
                }
                '\\' => {
                    self.pos += 1;
                    if let Some(escaped) = self.peek_char() {
                        self.pos += escaped.len_utf8();
                    }
                }
                _ => self.pos += ch.len_utf8(),
            }
        }
    }

    fn scan_regex(&mut self) -> (SyntaxKind, String) {
        let start = self.pos;
        self.pos += 1;
        let mut in_class = false;

        loop {
            let Some(ch) = self.peek_char() else {
                self.pending_flags |= token_flags::UNTERMINATED;
                self.error(
                    start,
                    "Unterminated regular expression literal.",
                    diagnostic_codes::UNTERMINATED_REGULAR_EXPRESSION,
                );
                break;
            };
            if is_line_break(ch) {
                self.pending_flags |= token_flags::UNTERMINATED;
                self.error(
                    start,
                    "Unterminated regular expression literal.",
                    diagnostic_codes::UNTERMINATED_REGULAR_EXPRESSION,
                );
                break;
            }
            self.pos += ch.len_utf8();
            match ch {
                '\\' => {
                    if let Some(escaped) = self.peek_char() {
                        if !is_line_break(escaped) {
                            self.pos += escaped.len_utf8();
                        }
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => {
                    while let Some(flag) = self.peek_char() {
                        if !is_identifier_part(flag) {
                            break;
                        }
                        self.pos += flag.len_utf8();
                    }
                    break;
                }
                _ => {}
            }
        }

        (
            SyntaxKind::RegularExpressionLiteral,
            self.text[start..self.pos].to_string(),
        )
    }

    fn scan_punctuation(&mut self, ch: char) -> (SyntaxKind, String) {
        let rest = &self.text[self.pos..];
        for &(text, kind) in PUNCTUATION {
            if !rest.starts_with(text) {
                continue;
            }
            // `a?.5:b` is a conditional, not optional chaining.
            if kind == SyntaxKind::QuestionDotToken
                && self.byte_at(2).is_some_and(|b| b.is_ascii_digit())
            {
                continue;
            }
            self.pos += text.len();
            return (kind, String::new());
        }
        let start = self.pos;
        self.pos += ch.len_utf8();
        self.error(
            start,
            "Invalid character.",
            diagnostic_codes::INVALID_CHARACTER,
        );
        (SyntaxKind::Unknown, ch.to_string())
    }
}

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod tests;
