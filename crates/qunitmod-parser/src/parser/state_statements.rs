//! Parser state - source file, statement, and declaration parsing methods

use qunitmod_common::diagnostics::diagnostic_codes;
use qunitmod_scanner::SyntaxKind;
use tracing::debug;

use super::base::{NodeIndex, NodeList};
use super::node::{
    BlockData, CaseClauseData, CatchClauseData, ClassData, ClassMemberData, ClassMemberKind,
    ExportDeclData, ForData, ForInOfData, FunctionData, FunctionFlavor, IfStatementData,
    ImportDeclData, JumpData, LabeledData, LoopData, NodeData, SourceFileData, SpecifierData,
    SwitchData, TryData, UnaryLikeData, VariableData, VariableDeclarationData, VariableKind,
    node_flags,
};
use super::state::{CONTEXT_FLAG_DISALLOW_IN, ParserState};

impl ParserState {
    // =========================================================================
    // Source file and statement lists
    // =========================================================================

    /// Parse the whole file and return the `SourceFile` node.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        let statements = self.parse_statement_list(true);
        let dangling = self.take_dangling_comments();
        let end = self.token().end;
        let root = self.arena.add_node(
            0,
            end,
            node_flags::NONE,
            NodeData::SourceFile(SourceFileData {
                file_name: self.file_name.clone(),
                statements,
            }),
        );
        self.arena.add_dangling_comments(root, dangling);
        debug!(
            file = %self.file_name,
            nodes = self.arena.len(),
            diagnostics = self.diagnostics.len(),
            "parsed source file"
        );
        root
    }

    /// Parse statements until `}` (or end of file when `top_level`).
    pub(crate) fn parse_statement_list(&mut self, top_level: bool) -> NodeList {
        let mut statements = Vec::new();
        loop {
            match self.token_kind() {
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::CloseBraceToken if !top_level => break,
                SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword
                    if !top_level && self.in_case_clause() =>
                {
                    break;
                }
                _ => {}
            }
            let start = self.pos;
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
            if self.pos == start {
                self.error_at_current(
                    "Declaration or statement expected.",
                    diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                );
                if !self.skip_for_recovery() {
                    break;
                }
            }
        }
        NodeList::with_nodes(statements)
    }

    fn in_case_clause(&self) -> bool {
        self.case_clause_depth > 0
    }

    /// Parse one statement with its comments and blank-line flag.
    pub fn parse_statement(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            self.exit_recursion();
            return NodeIndex::NONE;
        }
        let blank_line_before = self.current_starts_after_blank_line();
        let leading = self.take_leading_comments();
        let statement = self.parse_statement_worker();
        if statement.is_some() {
            self.finish_list_element(statement, leading, blank_line_before);
            self.attach_statement_trailing_comments(statement);
        } else {
            let mut restored = leading;
            restored.append(&mut self.orphan_comments);
            self.orphan_comments = restored;
        }
        self.exit_recursion();
        statement
    }

    fn parse_statement_worker(&mut self) -> NodeIndex {
        match self.token_kind() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => {
                let pos = self.token_pos();
                self.next_token();
                self.finish_node(pos, NodeData::Empty)
            }
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => self.parse_variable_statement(),
            SyntaxKind::Identifier if self.is_let_declaration() => self.parse_variable_statement(),
            SyntaxKind::FunctionKeyword => self.parse_function(FunctionFlavor::Declaration, false),
            SyntaxKind::Identifier if self.is_async_function() => {
                self.next_token();
                self.parse_function(FunctionFlavor::Declaration, true)
            }
            SyntaxKind::ClassKeyword => self.parse_class(true),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_or_throw(true),
            SyntaxKind::ThrowKeyword => self.parse_return_or_throw(false),
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => self.parse_jump_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::DebuggerKeyword => {
                let pos = self.token_pos();
                self.next_token();
                self.parse_semicolon();
                self.finish_node(pos, NodeData::Debugger)
            }
            SyntaxKind::ImportKeyword
                if !matches!(
                    self.peek_kind(1),
                    SyntaxKind::OpenParenToken | SyntaxKind::DotToken
                ) =>
            {
                self.parse_import_declaration()
            }
            SyntaxKind::ExportKeyword => self.parse_export_declaration(),
            SyntaxKind::Identifier if self.peek_kind(1) == SyntaxKind::ColonToken => {
                self.parse_labeled_statement()
            }
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken => NodeIndex::NONE,
            _ => self.parse_expression_statement(),
        }
    }

    pub(crate) fn finish_node(&mut self, pos: u32, data: NodeData) -> NodeIndex {
        let end = self.prev_end.max(pos);
        self.arena.add_node(pos, end, node_flags::NONE, data)
    }

    fn is_let_declaration(&self) -> bool {
        self.is_contextual("let")
            && matches!(
                self.peek_kind(1),
                SyntaxKind::Identifier | SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken
            )
    }

    pub(crate) fn is_async_function(&self) -> bool {
        self.is_contextual("async")
            && self.peek_kind(1) == SyntaxKind::FunctionKeyword
            && !self.peek_token(1).has_preceding_line_break()
    }

    fn parse_expression_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let expression = self.parse_expression();
        self.parse_semicolon();
        self.finish_node(pos, NodeData::ExpressionStatement(UnaryLikeData { expression }))
    }

    /// `{ statements }`
    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let statements = self.parse_statement_list(false);
        let multi_line = self.has_preceding_line_break() || !statements.is_empty();
        let dangling = self.take_dangling_comments();
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let block = self.finish_node(
            pos,
            NodeData::Block(BlockData {
                statements,
                multi_line,
            }),
        );
        self.arena.add_dangling_comments(block, dangling);
        block
    }

    fn parse_labeled_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let label = self.parse_identifier();
        self.parse_expected(SyntaxKind::ColonToken);
        let statement = self.parse_statement();
        self.finish_node(pos, NodeData::Labeled(LabeledData { label, statement }))
    }

    // =========================================================================
    // Variables
    // =========================================================================

    fn parse_variable_statement(&mut self) -> NodeIndex {
        let statement = self.parse_variable_declaration_list();
        self.parse_semicolon();
        statement
    }

    /// `var|let|const declarators`, without the terminating semicolon.
    pub(crate) fn parse_variable_declaration_list(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let kind = match self.token_kind() {
            SyntaxKind::ConstKeyword => VariableKind::Const,
            SyntaxKind::VarKeyword => VariableKind::Var,
            _ => VariableKind::Let,
        };
        self.next_token();

        let mut declarations = Vec::new();
        loop {
            let decl_pos = self.token_pos();
            let name = self.parse_binding_target();
            let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_assignment_expression()
            } else {
                NodeIndex::NONE
            };
            declarations.push(self.finish_node(
                decl_pos,
                NodeData::VariableDeclaration(VariableDeclarationData { name, initializer }),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }

        self.finish_node(
            pos,
            NodeData::VariableStatement(VariableData {
                kind,
                declarations: NodeList::with_nodes(declarations),
            }),
        )
    }

    /// Identifier, object pattern, or array pattern.
    pub(crate) fn parse_binding_target(&mut self) -> NodeIndex {
        match self.token_kind() {
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            _ => self.parse_identifier(),
        }
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    /// `function [*] [name] (params) { body }`, current token at `function`.
    pub(crate) fn parse_function(&mut self, flavor: FunctionFlavor, is_async: bool) -> NodeIndex {
        let pos = if is_async {
            self.tokens[self.pos.saturating_sub(1)].pos
        } else {
            self.token_pos()
        };
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        let name = if self.is_identifier_or_keyword() && !self.is_token(SyntaxKind::OpenParenToken) {
            self.parse_identifier_name()
        } else {
            if flavor == FunctionFlavor::Declaration {
                self.error_at_current("Identifier expected.", diagnostic_codes::IDENTIFIER_EXPECTED);
            }
            NodeIndex::NONE
        };
        let (parameters, body) = self.with_function_context(is_async, is_generator, |p| {
            let parameters = p.parse_parameter_list();
            let body = p.parse_block();
            (parameters, body)
        });
        self.finish_node(
            pos,
            NodeData::Function(FunctionData {
                name,
                parameters,
                body,
                is_async,
                is_generator,
                flavor,
                parenthesized_params: true,
            }),
        )
    }

    /// `( params )`. Parameters are binding targets with optional defaults,
    /// represented as expressions (`a`, `a = 1`, `{ b }`, `...rest`).
    pub(crate) fn parse_parameter_list(&mut self) -> NodeList {
        let mut parameters = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return NodeList::new();
        }
        while !matches!(
            self.token_kind(),
            SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken
        ) {
            let start = self.pos;
            parameters.push(self.parse_parameter());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
            if self.pos == start {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        NodeList::with_nodes(parameters)
    }

    fn parse_parameter(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::DotDotDotToken) {
            let pos = self.token_pos();
            self.next_token();
            let expression = self.parse_binding_target();
            return self.finish_node(pos, NodeData::Spread(UnaryLikeData { expression }));
        }
        self.parse_assignment_expression()
    }

    /// `class [name] [extends expr] { members }`
    pub(crate) fn parse_class(&mut self, is_declaration: bool) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = if self.is_token(SyntaxKind::Identifier) {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        let heritage = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            self.parse_left_hand_side_expression()
        } else {
            NodeIndex::NONE
        };

        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut members = Vec::new();
        while !matches!(
            self.token_kind(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            let start = self.pos;
            let blank_line_before = self.current_starts_after_blank_line();
            let leading = self.take_leading_comments();
            let member = self.parse_class_member();
            self.finish_list_element(member, leading, blank_line_before);
            self.attach_statement_trailing_comments(member);
            members.push(member);
            if self.pos == start && !self.skip_for_recovery() {
                break;
            }
        }
        let dangling = self.take_dangling_comments();
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let class = self.finish_node(
            pos,
            NodeData::Class(ClassData {
                name,
                heritage,
                members: NodeList::with_nodes(members),
                is_declaration,
            }),
        );
        self.arena.add_dangling_comments(class, dangling);
        class
    }

    fn parse_class_member(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let is_static = self.is_contextual("static")
            && !matches!(
                self.peek_kind(1),
                SyntaxKind::OpenParenToken | SyntaxKind::EqualsToken | SyntaxKind::SemicolonToken
            );
        if is_static {
            self.next_token();
            if self.is_token(SyntaxKind::OpenBraceToken) {
                let value = self.with_function_context(false, false, |p| p.parse_block());
                return self.finish_node(
                    pos,
                    NodeData::ClassMember(ClassMemberData {
                        name: NodeIndex::NONE,
                        value,
                        kind: ClassMemberKind::StaticBlock,
                        is_static: true,
                        computed: false,
                    }),
                );
            }
        }

        let (accessor, is_async, is_generator) = self.parse_method_modifiers();
        let (name, computed) = self.parse_property_name();

        if self.is_token(SyntaxKind::OpenParenToken) {
            let flavor_kind = match accessor {
                Some(true) => ClassMemberKind::Getter,
                Some(false) => ClassMemberKind::Setter,
                None => ClassMemberKind::Method,
            };
            let value = self.parse_method_function(pos, is_async, is_generator);
            return self.finish_node(
                pos,
                NodeData::ClassMember(ClassMemberData {
                    name,
                    value,
                    kind: flavor_kind,
                    is_static,
                    computed,
                }),
            );
        }

        let value = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.with_function_context(false, false, |p| p.parse_assignment_expression())
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.finish_node(
            pos,
            NodeData::ClassMember(ClassMemberData {
                name,
                value,
                kind: ClassMemberKind::Field,
                is_static,
                computed,
            }),
        )
    }

    /// `get`/`set`, `async`, and `*` prefixes of a method. The accessor is
    /// `Some(true)` for getters and `Some(false)` for setters.
    pub(crate) fn parse_method_modifiers(&mut self) -> (Option<bool>, bool, bool) {
        let next_is_name = |p: &ParserState| {
            let next = p.peek_token(1);
            !next.has_preceding_line_break()
                && (next.kind == SyntaxKind::Identifier
                    || next.kind.is_keyword()
                    || matches!(
                        next.kind,
                        SyntaxKind::StringLiteral
                            | SyntaxKind::NumericLiteral
                            | SyntaxKind::OpenBracketToken
                            | SyntaxKind::PrivateIdentifier
                            | SyntaxKind::AsteriskToken
                    ))
        };

        let mut accessor = None;
        let mut is_async = false;
        if (self.is_contextual("get") || self.is_contextual("set")) && next_is_name(self) {
            accessor = Some(self.is_contextual("get"));
            self.next_token();
        } else if self.is_contextual("async") && next_is_name(self) {
            is_async = true;
            self.next_token();
        }
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        (accessor, is_async, is_generator)
    }

    /// Parameters and body of a method; the name is already consumed.
    pub(crate) fn parse_method_function(
        &mut self,
        pos: u32,
        is_async: bool,
        is_generator: bool,
    ) -> NodeIndex {
        let (parameters, body) = self.with_function_context(is_async, is_generator, |p| {
            let parameters = p.parse_parameter_list();
            let body = p.parse_block();
            (parameters, body)
        });
        self.finish_node(
            pos,
            NodeData::Function(FunctionData {
                name: NodeIndex::NONE,
                parameters,
                body,
                is_async,
                is_generator,
                flavor: FunctionFlavor::Method,
                parenthesized_params: true,
            }),
        )
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_parenthesized_condition(&mut self) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        expression
    }

    fn parse_if_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition();
        let then_statement = self.parse_statement();
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_statement()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(
            pos,
            NodeData::If(IfStatementData {
                expression,
                then_statement,
                else_statement,
            }),
        )
    }

    fn parse_for_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let await_modifier = if self.is_contextual("await") {
            self.next_token();
            true
        } else {
            false
        };
        self.parse_expected(SyntaxKind::OpenParenToken);

        let initializer = self.with_context_flag(CONTEXT_FLAG_DISALLOW_IN, true, |p| {
            match p.token_kind() {
                SyntaxKind::SemicolonToken => NodeIndex::NONE,
                SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => {
                    p.parse_variable_declaration_list()
                }
                SyntaxKind::Identifier if p.is_let_declaration() => {
                    p.parse_variable_declaration_list()
                }
                _ => p.parse_expression(),
            }
        });

        let is_of = self.is_contextual("of");
        if is_of || self.is_token(SyntaxKind::InKeyword) {
            self.next_token();
            let expression = if is_of {
                self.parse_assignment_expression()
            } else {
                self.parse_expression()
            };
            self.parse_expected(SyntaxKind::CloseParenToken);
            let statement = self.parse_statement();
            return self.finish_node(
                pos,
                NodeData::ForInOf(ForInOfData {
                    initializer,
                    expression,
                    statement,
                    is_of,
                    await_modifier,
                }),
            );
        }

        self.parse_expected(SyntaxKind::SemicolonToken);
        let condition = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        let incrementor = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.finish_node(
            pos,
            NodeData::For(ForData {
                initializer,
                condition,
                incrementor,
                statement,
            }),
        )
    }

    fn parse_while_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let condition = self.parse_parenthesized_condition();
        let statement = self.parse_statement();
        self.finish_node(pos, NodeData::While(LoopData { condition, statement }))
    }

    fn parse_do_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let statement = self.parse_statement();
        self.parse_expected(SyntaxKind::WhileKeyword);
        let condition = self.parse_parenthesized_condition();
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.finish_node(pos, NodeData::DoWhile(LoopData { condition, statement }))
    }

    fn parse_return_or_throw(&mut self, is_return: bool) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let expression = if self.can_parse_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_semicolon();
        let data = UnaryLikeData { expression };
        if is_return {
            self.finish_node(pos, NodeData::Return(data))
        } else {
            self.finish_node(pos, NodeData::Throw(data))
        }
    }

    fn parse_jump_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let is_break = self.is_token(SyntaxKind::BreakKeyword);
        self.next_token();
        let label = if self.is_token(SyntaxKind::Identifier) && !self.has_preceding_line_break() {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        let data = JumpData { label };
        if is_break {
            self.finish_node(pos, NodeData::Break(data))
        } else {
            self.finish_node(pos, NodeData::Continue(data))
        }
    }

    fn parse_try_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let try_block = self.parse_block();

        let catch_clause = if self.is_token(SyntaxKind::CatchKeyword) {
            let catch_pos = self.token_pos();
            self.next_token();
            let variable_declaration = if self.parse_optional(SyntaxKind::OpenParenToken) {
                let binding = self.parse_binding_target();
                self.parse_expected(SyntaxKind::CloseParenToken);
                binding
            } else {
                NodeIndex::NONE
            };
            let block = self.parse_block();
            self.finish_node(
                catch_pos,
                NodeData::CatchClause(CatchClauseData {
                    variable_declaration,
                    block,
                }),
            )
        } else {
            NodeIndex::NONE
        };

        let finally_block = if self.parse_optional(SyntaxKind::FinallyKeyword) {
            self.parse_block()
        } else {
            NodeIndex::NONE
        };

        self.finish_node(
            pos,
            NodeData::Try(TryData {
                try_block,
                catch_clause,
                finally_block,
            }),
        )
    }

    fn parse_switch_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition();
        self.parse_expected(SyntaxKind::OpenBraceToken);

        let mut clauses = Vec::new();
        while matches!(
            self.token_kind(),
            SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword
        ) {
            let clause_pos = self.token_pos();
            let leading = self.take_leading_comments();
            let expression = if self.parse_optional(SyntaxKind::CaseKeyword) {
                self.parse_expression()
            } else {
                self.next_token();
                NodeIndex::NONE
            };
            self.parse_expected(SyntaxKind::ColonToken);
            self.case_clause_depth += 1;
            let statements = self.parse_statement_list(false);
            self.case_clause_depth -= 1;
            let clause = self.finish_node(
                clause_pos,
                NodeData::CaseClause(CaseClauseData {
                    expression,
                    statements,
                }),
            );
            self.arena.add_leading_comments(clause, leading);
            clauses.push(clause);
        }

        let dangling = self.take_dangling_comments();
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let switch = self.finish_node(
            pos,
            NodeData::Switch(SwitchData {
                expression,
                clauses: NodeList::with_nodes(clauses),
            }),
        );
        self.arena.add_dangling_comments(switch, dangling);
        switch
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn parse_import_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();

        let mut default_binding = NodeIndex::NONE;
        let mut namespace_binding = NodeIndex::NONE;
        let mut named_bindings = None;

        if !self.is_token(SyntaxKind::StringLiteral) {
            if self.is_token(SyntaxKind::Identifier) && !self.is_contextual_from_clause() {
                default_binding = self.parse_identifier();
                self.parse_optional(SyntaxKind::CommaToken);
            }
            if self.is_token(SyntaxKind::AsteriskToken) {
                self.next_token();
                self.expect_contextual("as");
                namespace_binding = self.parse_identifier();
            } else if self.is_token(SyntaxKind::OpenBraceToken) {
                named_bindings = Some(self.parse_specifier_list(true));
            }
            self.expect_contextual("from");
        }

        let module_specifier = self.parse_module_specifier();
        self.skip_import_attributes();
        self.parse_semicolon();
        self.finish_node(
            pos,
            NodeData::Import(ImportDeclData {
                default_binding,
                namespace_binding,
                named_bindings,
                module_specifier,
            }),
        )
    }

    /// `from` used as a default import name: `import from from 'x'`.
    fn is_contextual_from_clause(&self) -> bool {
        self.is_contextual("from") && self.peek_kind(1) == SyntaxKind::StringLiteral
    }

    fn expect_contextual(&mut self, text: &str) {
        if self.is_contextual(text) {
            self.next_token();
        } else {
            self.error_at_current(
                &format!("'{text}' expected."),
                diagnostic_codes::TOKEN_EXPECTED,
            );
        }
    }

    fn parse_module_specifier(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::StringLiteral) {
            return self.parse_string_literal();
        }
        self.create_missing_node(
            "String literal expected.",
            diagnostic_codes::EXPRESSION_EXPECTED,
        )
    }

    /// `with { type: 'json' }` / `assert { ... }` are parsed and dropped.
    fn skip_import_attributes(&mut self) {
        if (self.is_contextual("with") || self.is_token(SyntaxKind::WithKeyword) || self.is_contextual("assert"))
            && !self.has_preceding_line_break()
            && self.peek_kind(1) == SyntaxKind::OpenBraceToken
        {
            self.next_token();
            self.parse_object_literal();
        }
    }

    /// `{ a, b as c }` for imports or exports.
    fn parse_specifier_list(&mut self, is_import: bool) -> NodeList {
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut specifiers = Vec::new();
        while !matches!(
            self.token_kind(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            let pos = self.token_pos();
            let leading = self.take_leading_comments();
            let first = if self.is_token(SyntaxKind::StringLiteral) {
                self.parse_string_literal()
            } else {
                self.parse_identifier_name()
            };
            let (property_name, name) = if self.is_contextual("as") {
                self.next_token();
                let local = if self.is_token(SyntaxKind::StringLiteral) {
                    self.parse_string_literal()
                } else {
                    self.parse_identifier_name()
                };
                (first, local)
            } else {
                (NodeIndex::NONE, first)
            };
            let data = SpecifierData {
                property_name,
                name,
            };
            let specifier = if is_import {
                self.finish_node(pos, NodeData::ImportSpecifier(data))
            } else {
                self.finish_node(pos, NodeData::ExportSpecifier(data))
            };
            self.arena.add_leading_comments(specifier, leading);
            specifiers.push(specifier);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        // Comments inside import braces are not preserved.
        self.take_dangling_comments();
        self.parse_expected(SyntaxKind::CloseBraceToken);
        NodeList::with_nodes(specifiers)
    }

    fn parse_export_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let mut data = ExportDeclData {
            is_default: false,
            declaration: NodeIndex::NONE,
            named_exports: None,
            star: None,
            module_specifier: NodeIndex::NONE,
        };

        match self.token_kind() {
            SyntaxKind::DefaultKeyword => {
                self.next_token();
                data.is_default = true;
                // Default-exported functions may be anonymous.
                data.declaration = match self.token_kind() {
                    SyntaxKind::FunctionKeyword => {
                        self.parse_function(FunctionFlavor::Expression, false)
                    }
                    SyntaxKind::ClassKeyword => self.parse_class(true),
                    SyntaxKind::Identifier if self.is_async_function() => {
                        self.next_token();
                        self.parse_function(FunctionFlavor::Expression, true)
                    }
                    _ => {
                        let expression = self.parse_assignment_expression();
                        self.parse_semicolon();
                        expression
                    }
                };
            }
            SyntaxKind::AsteriskToken => {
                self.next_token();
                let alias = if self.is_contextual("as") {
                    self.next_token();
                    self.parse_identifier_name()
                } else {
                    NodeIndex::NONE
                };
                data.star = Some(alias);
                self.expect_contextual("from");
                data.module_specifier = self.parse_module_specifier();
                self.parse_semicolon();
            }
            SyntaxKind::OpenBraceToken => {
                data.named_exports = Some(self.parse_specifier_list(false));
                if self.is_contextual("from") {
                    self.next_token();
                    data.module_specifier = self.parse_module_specifier();
                }
                self.parse_semicolon();
            }
            _ => {
                data.declaration = self.parse_statement_worker();
            }
        }

        self.finish_node(pos, NodeData::Export(data))
    }
}
