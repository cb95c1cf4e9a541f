//! Parser state: token cursor, context flags, diagnostics, and comment
//! attachment helpers shared by the statement and expression parsers.

use qunitmod_common::comments::Comment;
use qunitmod_common::diagnostics::{Diagnostic, diagnostic_codes};
use qunitmod_common::limits::{MAX_PARSER_RECURSION_DEPTH, MAX_RECOVERY_SKIPS};
use qunitmod_scanner::{ScannerState, SyntaxKind, Token, token_text};
use tracing::{debug, trace};

use super::base::NodeIndex;
use super::node::{IdentifierData, NodeArena, NodeData, node_flags};

pub(crate) const CONTEXT_FLAG_ASYNC: u8 = 1 << 0;
pub(crate) const CONTEXT_FLAG_GENERATOR: u8 = 1 << 1;
pub(crate) const CONTEXT_FLAG_IN_FUNCTION: u8 = 1 << 2;
pub(crate) const CONTEXT_FLAG_DISALLOW_IN: u8 = 1 << 3;

/// Recursive-descent parser over a pre-scanned token vector.
pub struct ParserState {
    pub(crate) file_name: String,
    pub(crate) source_text: String,
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    pub(crate) prev_end: u32,
    pub(crate) arena: NodeArena,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) context_flags: u8,
    pub(crate) recursion_depth: u32,
    pub(crate) recovery_skips: u32,
    pub(crate) case_clause_depth: u32,
    /// Comments on tokens that were consumed without a node taking them.
    pub(crate) orphan_comments: Vec<Comment>,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        let scan = ScannerState::new(&source_text).scan_all();
        trace!(file = %file_name, tokens = scan.tokens.len(), "scanned");
        ParserState {
            file_name,
            arena: NodeArena::with_capacity(scan.tokens.len()),
            tokens: scan.tokens,
            diagnostics: scan.diagnostics,
            source_text,
            pos: 0,
            prev_end: 0,
            context_flags: 0,
            recursion_depth: 0,
            recovery_skips: 0,
            case_clause_depth: 0,
            orphan_comments: Vec::new(),
        }
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn get_diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn get_source_text(&self) -> &str {
        &self.source_text
    }

    pub fn get_file_name(&self) -> &str {
        &self.file_name
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> &Token {
        // The token vector always ends with EndOfFileToken and the cursor
        // never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    #[inline]
    pub(crate) fn token_kind(&self) -> SyntaxKind {
        self.token().kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.token().pos
    }

    pub(crate) fn peek_token(&self, offset: usize) -> &Token {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    #[inline]
    pub(crate) fn peek_kind(&self, offset: usize) -> SyntaxKind {
        self.peek_token(offset).kind
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.token_kind() == kind
    }

    /// Current token is an identifier with the given text (contextual keyword).
    pub(crate) fn is_contextual(&self, text: &str) -> bool {
        let token = self.token();
        token.kind == SyntaxKind::Identifier && token.value == text
    }

    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        let kind = self.token_kind();
        kind == SyntaxKind::Identifier || kind.is_keyword()
    }

    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.token().has_preceding_line_break()
    }

    /// Advance past the current token.
    pub(crate) fn next_token(&mut self) {
        if self.pos >= self.tokens.len() - 1 {
            return;
        }
        let token = &mut self.tokens[self.pos];
        if !token.leading_comments.is_empty() {
            self.orphan_comments
                .append(&mut token.leading_comments);
        }
        self.prev_end = self.tokens[self.pos].end;
        self.pos += 1;
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        self.error_at_current(
            &format!("'{}' expected.", token_text(kind)),
            diagnostic_codes::TOKEN_EXPECTED,
        );
        false
    }

    /// Automatic semicolon insertion is allowed before `}`, at end of file,
    /// or after a line break.
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.token_kind(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return;
        }
        if !self.can_parse_semicolon() {
            self.error_at_current("';' expected.", diagnostic_codes::TOKEN_EXPECTED);
        }
    }

    /// Raw source text of a token.
    pub(crate) fn token_source_text(&self, token: &Token) -> String {
        self.source_text
            .get(token.pos as usize..token.end as usize)
            .unwrap_or_default()
            .to_string()
    }

    // =========================================================================
    // Diagnostics and recovery
    // =========================================================================

    pub(crate) fn error_at_current(&mut self, message: &str, code: u32) {
        let token = self.token();
        let start = token.pos;
        let length = token.end.saturating_sub(token.pos).max(1);
        // One diagnostic per position keeps cascades readable.
        if self.diagnostics.last().is_some_and(|d| d.start == start) {
            return;
        }
        debug!(start, code, message, "parse error");
        self.diagnostics
            .push(Diagnostic::error(start, length, message, code));
    }

    /// Skip the current token after an error. Returns false once the skip
    /// budget is exhausted or the end of the file is reached.
    pub(crate) fn skip_for_recovery(&mut self) -> bool {
        if self.is_token(SyntaxKind::EndOfFileToken) {
            return false;
        }
        self.recovery_skips += 1;
        if self.recovery_skips > MAX_RECOVERY_SKIPS {
            self.pos = self.tokens.len() - 1;
            return false;
        }
        self.next_token();
        true
    }

    /// Track recursion. Returns false when the nesting limit is hit; the
    /// caller must still call `exit_recursion`.
    pub(crate) fn enter_recursion(&mut self) -> bool {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_PARSER_RECURSION_DEPTH {
            self.error_at_current(
                "Maximum nesting depth exceeded.",
                diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED,
            );
            self.pos = self.tokens.len() - 1;
            return false;
        }
        true
    }

    #[inline]
    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    /// Placeholder identifier for a missing expression or name.
    pub(crate) fn create_missing_node(&mut self, message: &str, code: u32) -> NodeIndex {
        self.error_at_current(message, code);
        let pos = self.token_pos();
        self.arena.add_node(
            pos,
            pos,
            node_flags::NONE,
            NodeData::Identifier(IdentifierData {
                escaped_text: String::new(),
            }),
        )
    }

    // =========================================================================
    // Context
    // =========================================================================

    #[inline]
    pub(crate) fn in_context(&self, flag: u8) -> bool {
        self.context_flags & flag != 0
    }

    /// Run `f` with `flags` replacing the function-related context bits.
    pub(crate) fn with_function_context<T>(
        &mut self,
        is_async: bool,
        is_generator: bool,
        f: impl FnOnce(&mut ParserState) -> T,
    ) -> T {
        let saved = self.context_flags;
        let mut flags = CONTEXT_FLAG_IN_FUNCTION;
        if is_async {
            flags |= CONTEXT_FLAG_ASYNC;
        }
        if is_generator {
            flags |= CONTEXT_FLAG_GENERATOR;
        }
        self.context_flags = flags;
        let result = f(self);
        self.context_flags = saved;
        result
    }

    pub(crate) fn with_context_flag<T>(
        &mut self,
        flag: u8,
        enabled: bool,
        f: impl FnOnce(&mut ParserState) -> T,
    ) -> T {
        let saved = self.context_flags;
        if enabled {
            self.context_flags |= flag;
        } else {
            self.context_flags &= !flag;
        }
        let result = f(self);
        self.context_flags = saved;
        result
    }

    // =========================================================================
    // Comment attachment
    // =========================================================================

    /// Take the comments in front of the current token.
    pub(crate) fn take_leading_comments(&mut self) -> Vec<Comment> {
        let index = self.pos.min(self.tokens.len() - 1);
        std::mem::take(&mut self.tokens[index].leading_comments)
    }

    /// Take the comments in front of the current token that sit on the same
    /// line as the previous token.
    pub(crate) fn take_same_line_comments(&mut self) -> Vec<Comment> {
        let index = self.pos.min(self.tokens.len() - 1);
        let comments = &mut self.tokens[index].leading_comments;
        let count = comments
            .iter()
            .take_while(|c| !c.has_preceding_line_break)
            .count();
        comments.drain(..count).collect()
    }

    /// Whether the current token starts after a blank line, looking past any
    /// comments still attached to it.
    pub(crate) fn current_starts_after_blank_line(&self) -> bool {
        let token = self.token();
        match token.leading_comments.first() {
            Some(first) => first.has_preceding_blank_line,
            None => token.has_preceding_blank_line(),
        }
    }

    /// Attach leading comments and the blank-line flag taken before a
    /// statement, property, or member was parsed.
    pub(crate) fn finish_list_element(
        &mut self,
        node: NodeIndex,
        leading: Vec<Comment>,
        blank_line_before: bool,
    ) {
        self.arena.add_leading_comments(node, leading);
        if blank_line_before {
            self.arena.set_blank_line_before(node, true);
        }
    }

    /// Trailing comments for a statement: anything orphaned inside it, then
    /// comments on the rest of its last line.
    pub(crate) fn attach_statement_trailing_comments(&mut self, node: NodeIndex) {
        let mut trailing = std::mem::take(&mut self.orphan_comments);
        trailing.extend(self.take_same_line_comments());
        self.arena.add_trailing_comments(node, trailing);
    }

    /// Comments in front of a closing token, to become dangling comments of
    /// the container being closed once it is allocated.
    pub(crate) fn take_dangling_comments(&mut self) -> Vec<Comment> {
        let mut dangling = std::mem::take(&mut self.orphan_comments);
        dangling.extend(self.take_leading_comments());
        dangling
    }
}
