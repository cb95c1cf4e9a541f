//! Parser state - expression parsing methods

use qunitmod_common::diagnostics::diagnostic_codes;
use qunitmod_scanner::{SyntaxKind, token_text};

use super::base::{NodeIndex, NodeList};
use super::node::{
    AccessExprData, ArrayLiteralData, BinaryExprData, CallExprData, ConditionalExprData,
    FunctionData, FunctionFlavor, IdentifierData, LiteralData, NodeData, ObjectLiteralData,
    PropertyData, PropertyKind, TaggedTemplateData, TemplateData, UnaryExprData, UnaryLikeData,
    YieldData,
};
use super::state::{
    CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR,
    CONTEXT_FLAG_IN_FUNCTION, ParserState,
};

impl ParserState {
    // =========================================================================
    // Comma, assignment, conditional
    // =========================================================================

    /// Expression including the comma operator.
    pub(crate) fn parse_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut left = self.parse_assignment_expression();
        while self.is_token(SyntaxKind::CommaToken) {
            self.next_token();
            let right = self.parse_assignment_expression();
            left = self.finish_node(
                pos,
                NodeData::Binary(BinaryExprData {
                    left,
                    operator_token: SyntaxKind::CommaToken,
                    right,
                }),
            );
        }
        left
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            self.exit_recursion();
            return NodeIndex::NONE;
        }
        let result = self.parse_assignment_expression_worker();
        self.exit_recursion();
        result
    }

    fn parse_assignment_expression_worker(&mut self) -> NodeIndex {
        if self.in_context(CONTEXT_FLAG_GENERATOR) && self.is_contextual("yield") {
            return self.parse_yield_expression();
        }
        if let Some(is_async) = self.arrow_function_start() {
            return self.parse_arrow_function(is_async);
        }

        let pos = self.token_pos();
        let left = self.parse_conditional_expression();
        let operator = self.token_kind();
        if operator.is_assignment_operator() {
            self.next_token();
            let right = self.parse_assignment_expression();
            return self.finish_node(
                pos,
                NodeData::Binary(BinaryExprData {
                    left,
                    operator_token: operator,
                    right,
                }),
            );
        }
        left
    }

    fn parse_conditional_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let condition = self.parse_binary_expression(0);
        if !self.parse_optional(SyntaxKind::QuestionToken) {
            return condition;
        }
        let when_true = self.with_context_flag(CONTEXT_FLAG_DISALLOW_IN, false, |p| {
            p.parse_assignment_expression()
        });
        self.parse_expected(SyntaxKind::ColonToken);
        let when_false = self.parse_assignment_expression();
        self.finish_node(
            pos,
            NodeData::Conditional(ConditionalExprData {
                condition,
                when_true,
                when_false,
            }),
        )
    }

    fn parse_yield_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let delegate = self.parse_optional(SyntaxKind::AsteriskToken);
        let expression = if !self.has_preceding_line_break() && self.can_start_operand() {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(pos, NodeData::Yield(YieldData { expression, delegate }))
    }

    /// Whether the current token can begin an operand of `await`/`yield`.
    fn can_start_operand(&self) -> bool {
        !matches!(
            self.token_kind(),
            SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::CommaToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::ColonToken
                | SyntaxKind::EqualsToken
                | SyntaxKind::DotToken
                | SyntaxKind::EqualsGreaterThanToken
                | SyntaxKind::EndOfFileToken
        ) && !self.token_kind().is_assignment_operator()
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    /// `Some(is_async)` when the current token starts an arrow function.
    fn arrow_function_start(&self) -> Option<bool> {
        let arrow_follows = |offset: usize| {
            let token = self.peek_token(offset);
            token.kind == SyntaxKind::EqualsGreaterThanToken && !token.has_preceding_line_break()
        };
        match self.token_kind() {
            SyntaxKind::Identifier => {
                if arrow_follows(1) {
                    return Some(false);
                }
                if self.is_contextual("async") && !self.peek_token(1).has_preceding_line_break() {
                    if self.peek_kind(1) == SyntaxKind::Identifier && arrow_follows(2) {
                        return Some(true);
                    }
                    if self.peek_kind(1) == SyntaxKind::OpenParenToken
                        && self.is_parenthesized_arrow(1)
                    {
                        return Some(true);
                    }
                }
                None
            }
            SyntaxKind::OpenParenToken if self.is_parenthesized_arrow(0) => Some(false),
            _ => None,
        }
    }

    /// The `(` at `offset` closes with a `)` followed by `=>`.
    fn is_parenthesized_arrow(&self, offset: usize) -> bool {
        let mut depth = 0usize;
        let mut index = self.pos + offset;
        while index < self.tokens.len() {
            match self.tokens[index].kind {
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::TemplateHead => depth += 1,
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::TemplateTail => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                    if depth == 0 {
                        let next = self.tokens.get(index + 1);
                        return next.is_some_and(|t| {
                            t.kind == SyntaxKind::EqualsGreaterThanToken
                                && !t.has_preceding_line_break()
                        });
                    }
                }
                SyntaxKind::EndOfFileToken => return false,
                _ => {}
            }
            index += 1;
        }
        false
    }

    fn parse_arrow_function(&mut self, is_async: bool) -> NodeIndex {
        let pos = self.token_pos();
        if is_async {
            self.next_token();
        }
        let parenthesized_params = self.is_token(SyntaxKind::OpenParenToken);
        let parameters = if parenthesized_params {
            self.with_function_context(is_async, false, |p| p.parse_parameter_list())
        } else {
            NodeList::with_nodes(vec![self.parse_identifier()])
        };
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let body = self.with_function_context(is_async, false, |p| {
            if p.is_token(SyntaxKind::OpenBraceToken) {
                p.parse_block()
            } else {
                p.parse_assignment_expression()
            }
        });
        self.finish_node(
            pos,
            NodeData::Function(FunctionData {
                name: NodeIndex::NONE,
                parameters,
                body,
                is_async,
                is_generator: false,
                flavor: FunctionFlavor::Arrow,
                parenthesized_params,
            }),
        )
    }

    // =========================================================================
    // Binary and unary operators
    // =========================================================================

    fn binary_operator_precedence(&self, kind: SyntaxKind) -> u8 {
        match kind {
            SyntaxKind::QuestionQuestionToken => 1,
            SyntaxKind::BarBarToken => 2,
            SyntaxKind::AmpersandAmpersandToken => 3,
            SyntaxKind::BarToken => 4,
            SyntaxKind::CaretToken => 5,
            SyntaxKind::AmpersandToken => 6,
            SyntaxKind::EqualsEqualsToken
            | SyntaxKind::ExclamationEqualsToken
            | SyntaxKind::EqualsEqualsEqualsToken
            | SyntaxKind::ExclamationEqualsEqualsToken => 7,
            SyntaxKind::LessThanToken
            | SyntaxKind::GreaterThanToken
            | SyntaxKind::LessThanEqualsToken
            | SyntaxKind::GreaterThanEqualsToken
            | SyntaxKind::InstanceOfKeyword => 8,
            SyntaxKind::InKeyword if !self.in_context(CONTEXT_FLAG_DISALLOW_IN) => 8,
            SyntaxKind::LessThanLessThanToken
            | SyntaxKind::GreaterThanGreaterThanToken
            | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => 9,
            SyntaxKind::PlusToken | SyntaxKind::MinusToken => 10,
            SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => 11,
            SyntaxKind::AsteriskAsteriskToken => 12,
            _ => 0,
        }
    }

    /// Precedence climbing; operators binding tighter than `precedence` are
    /// folded into the right operand.
    fn parse_binary_expression(&mut self, precedence: u8) -> NodeIndex {
        let pos = self.token_pos();
        let mut left = self.parse_unary_expression();
        loop {
            let operator = self.token_kind();
            let operator_precedence = self.binary_operator_precedence(operator);
            if operator_precedence == 0 {
                break;
            }
            let right_associative = operator == SyntaxKind::AsteriskAsteriskToken;
            let binds = if right_associative {
                operator_precedence >= precedence
            } else {
                operator_precedence > precedence
            };
            if !binds {
                break;
            }
            self.next_token();
            let right = if right_associative {
                self.parse_binary_expression(operator_precedence - 1)
            } else {
                self.parse_binary_expression(operator_precedence)
            };
            left = self.finish_node(
                pos,
                NodeData::Binary(BinaryExprData {
                    left,
                    operator_token: operator,
                    right,
                }),
            );
        }
        left
    }

    fn is_await_expression(&self) -> bool {
        if !self.is_contextual("await") {
            return false;
        }
        let allowed = self.in_context(CONTEXT_FLAG_ASYNC) || !self.in_context(CONTEXT_FLAG_IN_FUNCTION);
        if !allowed {
            return false;
        }
        let next = self.peek_token(1);
        !matches!(
            next.kind,
            SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::CommaToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::ColonToken
                | SyntaxKind::DotToken
                | SyntaxKind::EqualsGreaterThanToken
                | SyntaxKind::EndOfFileToken
        ) && !next.kind.is_assignment_operator()
    }

    fn parse_unary_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let operator = self.token_kind();
        match operator {
            SyntaxKind::ExclamationToken
            | SyntaxKind::TildeToken
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword => {
                self.next_token();
                let operand = self.parse_unary_operand();
                self.finish_node(pos, NodeData::PrefixUnary(UnaryExprData { operator, operand }))
            }
            SyntaxKind::Identifier if self.is_await_expression() => {
                self.next_token();
                let expression = self.parse_unary_operand();
                self.finish_node(pos, NodeData::Await(UnaryLikeData { expression }))
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_unary_operand(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            self.exit_recursion();
            return NodeIndex::NONE;
        }
        let operand = self.parse_unary_expression();
        self.exit_recursion();
        operand
    }

    fn parse_postfix_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let operand = self.parse_left_hand_side_expression();
        let operator = self.token_kind();
        if matches!(operator, SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
            && !self.has_preceding_line_break()
        {
            self.next_token();
            return self.finish_node(pos, NodeData::PostfixUnary(UnaryExprData { operator, operand }));
        }
        operand
    }

    // =========================================================================
    // Member access and calls
    // =========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        self.parse_member_and_call_rest(pos, expression, true)
    }

    fn parse_new_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        if self.is_token(SyntaxKind::DotToken) {
            // new.target
            let new_ident = self.arena.add_node(
                pos,
                pos + 3,
                0,
                NodeData::Identifier(IdentifierData {
                    escaped_text: "new".to_string(),
                }),
            );
            self.next_token();
            let name = self.parse_identifier_name();
            return self.finish_node(
                pos,
                NodeData::Access(AccessExprData {
                    expression: new_ident,
                    name_or_argument: name,
                    computed: false,
                    question_dot: false,
                }),
            );
        }

        let callee_pos = self.token_pos();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        let expression = self.parse_member_and_call_rest(callee_pos, callee, false);
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            self.parse_arguments()
        } else {
            NodeList::new()
        };
        self.finish_node(
            pos,
            NodeData::New(CallExprData {
                expression,
                arguments,
                question_dot: false,
            }),
        )
    }

    fn parse_member_and_call_rest(
        &mut self,
        pos: u32,
        mut expression: NodeIndex,
        allow_call: bool,
    ) -> NodeIndex {
        loop {
            match self.token_kind() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    let name = self.parse_identifier_name();
                    expression = self.finish_node(
                        pos,
                        NodeData::Access(AccessExprData {
                            expression,
                            name_or_argument: name,
                            computed: false,
                            question_dot: false,
                        }),
                    );
                }
                SyntaxKind::QuestionDotToken if allow_call => {
                    self.next_token();
                    expression = match self.token_kind() {
                        SyntaxKind::OpenParenToken => {
                            let arguments = self.parse_arguments();
                            self.finish_node(
                                pos,
                                NodeData::Call(CallExprData {
                                    expression,
                                    arguments,
                                    question_dot: true,
                                }),
                            )
                        }
                        SyntaxKind::OpenBracketToken => {
                            let argument = self.parse_element_argument();
                            self.finish_node(
                                pos,
                                NodeData::Access(AccessExprData {
                                    expression,
                                    name_or_argument: argument,
                                    computed: true,
                                    question_dot: true,
                                }),
                            )
                        }
                        _ => {
                            let name = self.parse_identifier_name();
                            self.finish_node(
                                pos,
                                NodeData::Access(AccessExprData {
                                    expression,
                                    name_or_argument: name,
                                    computed: false,
                                    question_dot: true,
                                }),
                            )
                        }
                    };
                }
                SyntaxKind::OpenBracketToken => {
                    let argument = self.parse_element_argument();
                    expression = self.finish_node(
                        pos,
                        NodeData::Access(AccessExprData {
                            expression,
                            name_or_argument: argument,
                            computed: true,
                            question_dot: false,
                        }),
                    );
                }
                SyntaxKind::OpenParenToken if allow_call => {
                    let arguments = self.parse_arguments();
                    expression = self.finish_node(
                        pos,
                        NodeData::Call(CallExprData {
                            expression,
                            arguments,
                            question_dot: false,
                        }),
                    );
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    let template = self.parse_template_expression();
                    expression = self.finish_node(
                        pos,
                        NodeData::TaggedTemplate(TaggedTemplateData {
                            tag: expression,
                            template,
                        }),
                    );
                }
                _ => return expression,
            }
        }
    }

    fn parse_element_argument(&mut self) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let argument =
            self.with_context_flag(CONTEXT_FLAG_DISALLOW_IN, false, |p| p.parse_expression());
        self.parse_expected(SyntaxKind::CloseBracketToken);
        argument
    }

    /// `( args )` with spreads and trailing commas.
    pub(crate) fn parse_arguments(&mut self) -> NodeList {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let mut arguments = Vec::new();
        self.with_context_flag(CONTEXT_FLAG_DISALLOW_IN, false, |p| {
            while !matches!(
                p.token_kind(),
                SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken
            ) {
                let start = p.pos;
                let argument = if p.is_token(SyntaxKind::DotDotDotToken) {
                    p.parse_spread_element()
                } else {
                    p.parse_assignment_expression()
                };
                arguments.push(argument);
                if !p.parse_optional(SyntaxKind::CommaToken) || p.pos == start {
                    break;
                }
            }
        });
        self.parse_expected(SyntaxKind::CloseParenToken);
        NodeList::with_nodes(arguments)
    }

    fn parse_spread_element(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_assignment_expression();
        self.finish_node(pos, NodeData::Spread(UnaryLikeData { expression }))
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_primary_expression(&mut self) -> NodeIndex {
        let leading = self.take_leading_comments();
        let node = self.parse_primary_expression_worker();
        self.arena.add_leading_comments(node, leading);
        node
    }

    fn parse_primary_expression_worker(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token_kind() {
            SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword => {
                let kind = self.token_kind();
                self.next_token();
                self.finish_node(pos, NodeData::Keyword(kind))
            }
            SyntaxKind::Identifier if self.is_async_function() => {
                self.next_token();
                self.parse_function(FunctionFlavor::Expression, true)
            }
            SyntaxKind::Identifier => self.parse_identifier(),
            SyntaxKind::PrivateIdentifier => self.parse_identifier_name(),
            SyntaxKind::ImportKeyword => {
                self.next_token();
                self.finish_node(
                    pos,
                    NodeData::Identifier(IdentifierData {
                        escaped_text: "import".to_string(),
                    }),
                )
            }
            SyntaxKind::StringLiteral => self.parse_string_literal(),
            SyntaxKind::NumericLiteral => {
                let text = self.token().value.clone();
                self.next_token();
                self.finish_node(
                    pos,
                    NodeData::NumericLiteral(LiteralData {
                        raw: Some(text.clone()),
                        text,
                    }),
                )
            }
            SyntaxKind::RegularExpressionLiteral => {
                let text = self.token().value.clone();
                self.next_token();
                self.finish_node(
                    pos,
                    NodeData::RegularExpressionLiteral(LiteralData {
                        raw: Some(text.clone()),
                        text,
                    }),
                )
            }
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                self.parse_template_expression()
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let expression = self
                    .with_context_flag(CONTEXT_FLAG_DISALLOW_IN, false, |p| p.parse_expression());
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.finish_node(pos, NodeData::Parenthesized(UnaryLikeData { expression }))
            }
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function(FunctionFlavor::Expression, false),
            SyntaxKind::ClassKeyword => self.parse_class(false),
            _ => self.create_missing_node(
                "Expression expected.",
                diagnostic_codes::EXPRESSION_EXPECTED,
            ),
        }
    }

    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        if !self.is_token(SyntaxKind::Identifier) {
            return self.create_missing_node(
                "Identifier expected.",
                diagnostic_codes::IDENTIFIER_EXPECTED,
            );
        }
        let pos = self.token_pos();
        let escaped_text = self.token().value.clone();
        self.next_token();
        self.finish_node(pos, NodeData::Identifier(IdentifierData { escaped_text }))
    }

    /// Identifier, reserved word, or private name in a property position.
    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let kind = self.token_kind();
        if kind == SyntaxKind::PrivateIdentifier {
            let escaped_text = self.token().value.clone();
            self.next_token();
            return self.finish_node(
                pos,
                NodeData::PrivateIdentifier(IdentifierData { escaped_text }),
            );
        }
        if !self.is_identifier_or_keyword() {
            return self.create_missing_node(
                "Identifier expected.",
                diagnostic_codes::IDENTIFIER_EXPECTED,
            );
        }
        let escaped_text = if self.token().value.is_empty() {
            token_text(kind).to_string()
        } else {
            self.token().value.clone()
        };
        self.next_token();
        self.finish_node(pos, NodeData::Identifier(IdentifierData { escaped_text }))
    }

    pub(crate) fn parse_string_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let token = self.token();
        let text = token.value.clone();
        let raw = self.token_source_text(token);
        self.next_token();
        self.finish_node(
            pos,
            NodeData::StringLiteral(LiteralData {
                text,
                raw: Some(raw),
            }),
        )
    }

    fn parse_template_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut quasis = vec![self.token().value.clone()];
        let mut expressions = Vec::new();
        if self.is_token(SyntaxKind::NoSubstitutionTemplateLiteral) {
            self.next_token();
        } else {
            self.next_token();
            loop {
                let expression = self
                    .with_context_flag(CONTEXT_FLAG_DISALLOW_IN, false, |p| p.parse_expression());
                expressions.push(expression);
                match self.token_kind() {
                    SyntaxKind::TemplateMiddle => {
                        quasis.push(self.token().value.clone());
                        self.next_token();
                    }
                    SyntaxKind::TemplateTail => {
                        quasis.push(self.token().value.clone());
                        self.next_token();
                        break;
                    }
                    _ => {
                        self.error_at_current("'}' expected.", diagnostic_codes::TOKEN_EXPECTED);
                        quasis.push(String::new());
                        break;
                    }
                }
            }
        }
        self.finish_node(
            pos,
            NodeData::Template(TemplateData {
                quasis,
                expressions: NodeList::with_nodes(expressions),
            }),
        )
    }

    // =========================================================================
    // Array and object literals
    // =========================================================================

    pub(crate) fn parse_array_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let multi_line = self.has_preceding_line_break();
        let mut elements = Vec::new();
        self.with_context_flag(CONTEXT_FLAG_DISALLOW_IN, false, |p| {
            while !matches!(
                p.token_kind(),
                SyntaxKind::CloseBracketToken | SyntaxKind::EndOfFileToken
            ) {
                if p.parse_optional(SyntaxKind::CommaToken) {
                    elements.push(NodeIndex::NONE);
                    continue;
                }
                let start = p.pos;
                let element = if p.is_token(SyntaxKind::DotDotDotToken) {
                    p.parse_spread_element()
                } else {
                    p.parse_assignment_expression()
                };
                elements.push(element);
                if !p.parse_optional(SyntaxKind::CommaToken) || p.pos == start {
                    break;
                }
            }
        });
        let dangling = self.take_dangling_comments();
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let array = self.finish_node(
            pos,
            NodeData::ArrayLiteral(ArrayLiteralData {
                elements: NodeList::with_nodes(elements),
                multi_line,
            }),
        );
        self.arena.add_dangling_comments(array, dangling);
        array
    }

    pub(crate) fn parse_object_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let multi_line = self.has_preceding_line_break();
        let mut properties = Vec::new();
        self.with_context_flag(CONTEXT_FLAG_DISALLOW_IN, false, |p| {
            while !matches!(
                p.token_kind(),
                SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
            ) {
                let start = p.pos;
                let blank_line_before = p.current_starts_after_blank_line();
                let leading = p.take_leading_comments();
                let property = p.parse_object_property();
                p.finish_list_element(property, leading, blank_line_before);
                let has_comma = p.parse_optional(SyntaxKind::CommaToken);
                p.attach_statement_trailing_comments(property);
                properties.push(property);
                if !has_comma {
                    break;
                }
                if p.pos == start && !p.skip_for_recovery() {
                    break;
                }
            }
        });
        let dangling = self.take_dangling_comments();
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let object = self.finish_node(
            pos,
            NodeData::ObjectLiteral(ObjectLiteralData {
                properties: NodeList::with_nodes(properties),
                multi_line,
            }),
        );
        self.arena.add_dangling_comments(object, dangling);
        object
    }

    fn parse_object_property(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if self.is_token(SyntaxKind::DotDotDotToken) {
            return self.parse_spread_element();
        }

        let (accessor, is_async, is_generator) = self.parse_method_modifiers();
        let (name, computed) = self.parse_property_name();

        if accessor.is_some() || is_async || is_generator || self.is_token(SyntaxKind::OpenParenToken)
        {
            let kind = match accessor {
                Some(true) => PropertyKind::Getter,
                Some(false) => PropertyKind::Setter,
                None => PropertyKind::Method,
            };
            let initializer = self.parse_method_function(pos, is_async, is_generator);
            return self.finish_node(
                pos,
                NodeData::Property(PropertyData {
                    name,
                    initializer,
                    kind,
                    computed,
                }),
            );
        }

        if self.parse_optional(SyntaxKind::ColonToken) {
            let initializer = self.parse_assignment_expression();
            return self.finish_node(
                pos,
                NodeData::Property(PropertyData {
                    name,
                    initializer,
                    kind: PropertyKind::Init,
                    computed,
                }),
            );
        }

        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(
            pos,
            NodeData::Property(PropertyData {
                name,
                initializer,
                kind: PropertyKind::Shorthand,
                computed,
            }),
        )
    }

    /// Property or member name; returns the name node and whether it was
    /// computed (`[expr]`).
    pub(crate) fn parse_property_name(&mut self) -> (NodeIndex, bool) {
        match self.token_kind() {
            SyntaxKind::StringLiteral => (self.parse_string_literal(), false),
            SyntaxKind::NumericLiteral => (self.parse_primary_expression_worker(), false),
            SyntaxKind::OpenBracketToken => {
                self.next_token();
                let expression = self.with_context_flag(CONTEXT_FLAG_DISALLOW_IN, false, |p| {
                    p.parse_assignment_expression()
                });
                self.parse_expected(SyntaxKind::CloseBracketToken);
                (expression, true)
            }
            _ if self.is_identifier_or_keyword()
                || self.is_token(SyntaxKind::PrivateIdentifier) =>
            {
                (self.parse_identifier_name(), false)
            }
            _ => (
                self.create_missing_node(
                    "Property assignment expected.",
                    diagnostic_codes::PROPERTY_ASSIGNMENT_EXPECTED,
                ),
                false,
            ),
        }
    }
}
