//! Expression printing.
//!
//! Parsed parentheses are real nodes and print themselves. The precedence
//! table below only matters for synthesized structure, e.g. an `await`
//! wrapped around a call that a rewrite moved under a member access.

use super::Printer;
use qunitmod_parser::parser::node::{
    ClassData, FunctionData, FunctionFlavor, NodeData, PropertyData, PropertyKind,
};
use qunitmod_parser::parser::{NodeIndex, NodeList};
use qunitmod_scanner::{SyntaxKind, token_text};

pub(super) const PREC_COMMA: u8 = 0;
pub(super) const PREC_ASSIGNMENT: u8 = 1;
pub(super) const PREC_CONDITIONAL: u8 = 2;
pub(super) const PREC_COALESCE: u8 = 3;
pub(super) const PREC_UNARY: u8 = 15;
pub(super) const PREC_POSTFIX: u8 = 16;
pub(super) const PREC_MEMBER: u8 = 17;
pub(super) const PREC_PRIMARY: u8 = 18;

fn binary_precedence(operator: SyntaxKind) -> u8 {
    match operator {
        SyntaxKind::CommaToken => PREC_COMMA,
        op if op.is_assignment_operator() => PREC_ASSIGNMENT,
        SyntaxKind::QuestionQuestionToken => PREC_COALESCE,
        SyntaxKind::BarBarToken => 4,
        SyntaxKind::AmpersandAmpersandToken => 5,
        SyntaxKind::BarToken => 6,
        SyntaxKind::CaretToken => 7,
        SyntaxKind::AmpersandToken => 8,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => 9,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken
        | SyntaxKind::InKeyword
        | SyntaxKind::InstanceOfKeyword => 10,
        SyntaxKind::LessThanLessThanToken
        | SyntaxKind::GreaterThanGreaterThanToken
        | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => 11,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => 12,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => 13,
        SyntaxKind::AsteriskAsteriskToken => 14,
        _ => PREC_PRIMARY,
    }
}

impl<'a> Printer<'a> {
    // =========================================================================
    // Precedence
    // =========================================================================

    fn expression_precedence(&self, node: NodeIndex) -> u8 {
        match self.arena.data(node) {
            Some(NodeData::Binary(binary)) => binary_precedence(binary.operator_token),
            Some(NodeData::Conditional(_)) => PREC_CONDITIONAL,
            Some(NodeData::Yield(_)) | Some(NodeData::Spread(_)) => PREC_ASSIGNMENT,
            Some(NodeData::Function(func)) if func.is_arrow() => PREC_ASSIGNMENT,
            Some(NodeData::PrefixUnary(_)) | Some(NodeData::Await(_)) => PREC_UNARY,
            Some(NodeData::PostfixUnary(_)) => PREC_POSTFIX,
            Some(NodeData::Call(_))
            | Some(NodeData::New(_))
            | Some(NodeData::Access(_))
            | Some(NodeData::TaggedTemplate(_)) => PREC_MEMBER,
            _ => PREC_PRIMARY,
        }
    }

    /// Leftmost node of an expression, the one that decides how a statement
    /// starting with it would be parsed.
    pub(super) fn leftmost_expression(&self, mut node: NodeIndex) -> NodeIndex {
        loop {
            let next = match self.arena.data(node) {
                Some(NodeData::Binary(binary)) => binary.left,
                Some(NodeData::Call(call)) => call.expression,
                Some(NodeData::Access(access)) => access.expression,
                Some(NodeData::TaggedTemplate(tagged)) => tagged.tag,
                Some(NodeData::Conditional(cond)) => cond.condition,
                Some(NodeData::PostfixUnary(unary)) => unary.operand,
                _ => return node,
            };
            if next.is_none() {
                return node;
            }
            node = next;
        }
    }

    /// Whether an expression statement starting with `expression` needs
    /// parentheses to avoid being read as a declaration or block.
    pub(super) fn needs_statement_parens(&self, expression: NodeIndex) -> bool {
        let leftmost = self.leftmost_expression(expression);
        match self.arena.data(leftmost) {
            Some(NodeData::ObjectLiteral(_)) | Some(NodeData::Class(_)) => true,
            Some(NodeData::Function(func)) => func.flavor == FunctionFlavor::Expression,
            _ => false,
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Print `node`, parenthesized when it binds looser than `min_precedence`.
    pub(super) fn print_expression(&mut self, node: NodeIndex, min_precedence: u8) {
        if node.is_none() {
            return;
        }
        if self.expression_precedence(node) < min_precedence {
            self.write_char('(');
            self.print_expression_worker(node);
            self.write_char(')');
        } else {
            self.print_expression_worker(node);
        }
    }

    fn print_expression_worker(&mut self, node: NodeIndex) {
        self.print_inline_leading_comments(node);
        self.print_expression_data(node);
    }

    /// Print `node` without its leading comments.
    fn print_expression_data(&mut self, node: NodeIndex) {
        let arena = self.arena;
        let Some(data) = arena.data(node) else {
            return;
        };
        match data {
            NodeData::Identifier(ident) | NodeData::PrivateIdentifier(ident) => {
                self.write(&ident.escaped_text)
            }
            NodeData::StringLiteral(literal) => self.print_string_literal(literal),
            NodeData::NumericLiteral(literal) | NodeData::RegularExpressionLiteral(literal) => {
                self.print_verbatim_literal(literal)
            }
            NodeData::Template(template) => self.print_template(template),
            NodeData::TaggedTemplate(tagged) => {
                self.print_expression(tagged.tag, PREC_MEMBER);
                self.print_expression(tagged.template, PREC_PRIMARY);
            }
            NodeData::Keyword(kind) => self.write(token_text(*kind)),
            NodeData::ArrayLiteral(array) => {
                self.print_array_literal(node, &array.elements, array.multi_line)
            }
            NodeData::ObjectLiteral(object) => {
                self.print_object_literal(node, &object.properties, object.multi_line)
            }
            NodeData::Property(property) => self.print_property(property),
            NodeData::Spread(spread) => {
                self.write("...");
                self.print_expression(spread.expression, PREC_ASSIGNMENT);
            }
            NodeData::Function(func) => self.print_function(func),
            NodeData::Class(class) => self.print_class(node, class),
            NodeData::Call(call) => {
                self.print_expression(call.expression, PREC_MEMBER);
                if call.question_dot {
                    self.write("?.");
                }
                self.print_parenthesized_list(&call.arguments);
            }
            NodeData::New(call) => {
                self.write("new ");
                let callee_precedence = if self.arena.get_call_expr(call.expression).is_some() {
                    PREC_PRIMARY
                } else {
                    PREC_MEMBER
                };
                self.print_expression(call.expression, callee_precedence);
                self.print_parenthesized_list(&call.arguments);
            }
            NodeData::Access(access) => {
                self.print_expression(access.expression, PREC_MEMBER);
                if access.computed {
                    self.write(if access.question_dot { "?.[" } else { "[" });
                    self.print_expression(access.name_or_argument, PREC_COMMA);
                    self.write_char(']');
                } else {
                    self.write(if access.question_dot { "?." } else { "." });
                    self.print_expression(access.name_or_argument, PREC_PRIMARY);
                }
            }
            NodeData::PrefixUnary(unary) => {
                let operator = token_text(unary.operator);
                self.write(operator);
                if unary.operator.is_keyword() || self.needs_space_after_sign(unary.operator, unary.operand)
                {
                    self.write_space();
                }
                self.print_expression(unary.operand, PREC_UNARY);
            }
            NodeData::PostfixUnary(unary) => {
                self.print_expression(unary.operand, PREC_POSTFIX);
                self.write(token_text(unary.operator));
            }
            NodeData::Await(await_expr) => {
                self.write("await ");
                self.print_expression(await_expr.expression, PREC_UNARY);
            }
            NodeData::Yield(yield_expr) => {
                self.write(if yield_expr.delegate { "yield*" } else { "yield" });
                if yield_expr.expression.is_some() {
                    self.write_space();
                    self.print_expression(yield_expr.expression, PREC_ASSIGNMENT);
                }
            }
            NodeData::Binary(binary) => {
                let precedence = binary_precedence(binary.operator_token);
                let (left_min, right_min) = match binary.operator_token {
                    op if op.is_assignment_operator() => (PREC_MEMBER, PREC_ASSIGNMENT),
                    SyntaxKind::AsteriskAsteriskToken => (precedence + 1, precedence),
                    _ => (precedence, precedence + 1),
                };
                self.print_expression(binary.left, left_min);
                if binary.operator_token == SyntaxKind::CommaToken {
                    self.write(", ");
                } else {
                    self.write_space();
                    self.write(token_text(binary.operator_token));
                    self.write_space();
                }
                self.print_expression(binary.right, right_min);
            }
            NodeData::Conditional(cond) => {
                self.print_expression(cond.condition, PREC_COALESCE);
                self.write(" ? ");
                self.print_expression(cond.when_true, PREC_ASSIGNMENT);
                self.write(" : ");
                self.print_expression(cond.when_false, PREC_ASSIGNMENT);
            }
            NodeData::Parenthesized(inner) => {
                self.write_char('(');
                self.print_expression(inner.expression, PREC_COMMA);
                self.write_char(')');
            }
            NodeData::ImportSpecifier(specifier) | NodeData::ExportSpecifier(specifier) => {
                if specifier.property_name.is_some() {
                    self.print_expression(specifier.property_name, PREC_PRIMARY);
                    self.write(" as ");
                }
                self.print_expression(specifier.name, PREC_PRIMARY);
            }
            NodeData::VariableDeclaration(decl) => {
                self.print_expression(decl.name, PREC_PRIMARY);
                self.print_optional(" = ", decl.initializer);
            }
            _ if super::is_statement_kind(Some(data.kind())) => self.print_statement(node),
            _ => {}
        }
    }

    /// `- -x` and `+ ++x` must not fuse into `--x` and `+++x`.
    fn needs_space_after_sign(&self, operator: SyntaxKind, operand: NodeIndex) -> bool {
        let Some(NodeData::PrefixUnary(inner)) = self.arena.data(operand) else {
            return false;
        };
        matches!(
            (operator, inner.operator),
            (SyntaxKind::PlusToken, SyntaxKind::PlusToken | SyntaxKind::PlusPlusToken)
                | (SyntaxKind::MinusToken, SyntaxKind::MinusToken | SyntaxKind::MinusMinusToken)
        )
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    pub(super) fn print_function(&mut self, func: &FunctionData) {
        match func.flavor {
            FunctionFlavor::Arrow => self.print_arrow_function(func),
            FunctionFlavor::Method => self.print_method("", NodeIndex::NONE, false, func),
            FunctionFlavor::Expression | FunctionFlavor::Declaration => {
                if func.is_async {
                    self.write("async ");
                }
                self.write("function");
                if func.is_generator {
                    self.write_char('*');
                }
                if func.name.is_some() {
                    self.write_space();
                    self.print_expression(func.name, PREC_PRIMARY);
                }
                self.print_parenthesized_list(&func.parameters);
                self.write_space();
                self.print_block(func.body);
            }
        }
    }

    fn print_arrow_function(&mut self, func: &FunctionData) {
        if func.is_async {
            self.write("async ");
        }
        let bare_parameter = !func.parenthesized_params
            && func.parameters.len() == 1
            && func
                .parameters
                .first()
                .is_some_and(|p| self.arena.identifier_text(p).is_some());
        if bare_parameter {
            self.print_comma_list(&func.parameters);
        } else {
            self.print_parenthesized_list(&func.parameters);
        }
        self.write(" => ");
        if self.arena.get_block(func.body).is_some() {
            self.print_block(func.body);
        } else if self.needs_statement_parens(func.body) {
            self.write_char('(');
            self.print_expression(func.body, PREC_COMMA);
            self.write_char(')');
        } else {
            self.print_expression(func.body, PREC_ASSIGNMENT);
        }
    }

    /// Method shorthand: `[prefix][async ][*]name(params) { ... }`.
    pub(super) fn print_method(
        &mut self,
        prefix: &str,
        name: NodeIndex,
        computed: bool,
        func: &FunctionData,
    ) {
        self.write(prefix);
        if func.is_async {
            self.write("async ");
        }
        if func.is_generator {
            self.write_char('*');
        }
        self.print_property_name(name, computed);
        self.print_parenthesized_list(&func.parameters);
        self.write_space();
        self.print_block(func.body);
    }

    pub(super) fn print_property_name(&mut self, name: NodeIndex, computed: bool) {
        if computed {
            self.write_char('[');
            self.print_expression(name, PREC_ASSIGNMENT);
            self.write_char(']');
        } else {
            self.print_expression(name, PREC_PRIMARY);
        }
    }

    pub(super) fn print_class(&mut self, node: NodeIndex, class: &ClassData) {
        self.write("class");
        if class.name.is_some() {
            self.write_space();
            self.print_expression(class.name, PREC_PRIMARY);
        }
        if class.heritage.is_some() {
            self.write(" extends ");
            self.print_expression(class.heritage, PREC_MEMBER);
        }
        self.write(" {");
        if class.members.is_empty() && !self.has_comments(node) {
            self.write_char('}');
            return;
        }
        self.write_line();
        self.increase_indent();
        let arena = self.arena;
        for (i, member) in class.members.iter().enumerate() {
            if i > 0 && arena.has_blank_line_before(member) {
                self.write_line();
            }
            self.print_leading_comment_lines(member);
            self.write_indent();
            self.print_class_member(member);
            self.print_trailing_comments(member);
            self.write_line();
        }
        self.print_dangling_comment_lines(node);
        self.decrease_indent();
        self.write_indent();
        self.write_char('}');
    }

    fn print_class_member(&mut self, member: NodeIndex) {
        use qunitmod_parser::parser::node::ClassMemberKind;

        let arena = self.arena;
        let Some(NodeData::ClassMember(data)) = arena.data(member) else {
            self.print_expression(member, PREC_ASSIGNMENT);
            return;
        };
        if data.kind == ClassMemberKind::StaticBlock {
            self.write("static ");
            self.print_block(data.value);
            return;
        }
        if data.is_static {
            self.write("static ");
        }
        let prefix = match data.kind {
            ClassMemberKind::Getter => "get ",
            ClassMemberKind::Setter => "set ",
            _ => "",
        };
        match arena.get_function(data.value) {
            Some(func) if data.kind != ClassMemberKind::Field => {
                self.print_method(prefix, data.name, data.computed, func);
            }
            _ => {
                self.print_property_name(data.name, data.computed);
                self.print_optional(" = ", data.value);
                self.write_char(';');
            }
        }
    }

    // =========================================================================
    // Object and array literals
    // =========================================================================

    fn print_property(&mut self, property: &PropertyData) {
        let arena = self.arena;
        match property.kind {
            PropertyKind::Init => {
                self.print_property_name(property.name, property.computed);
                self.write(": ");
                self.print_expression(property.initializer, PREC_ASSIGNMENT);
            }
            PropertyKind::Shorthand => {
                self.print_property_name(property.name, property.computed);
                self.print_optional(" = ", property.initializer);
            }
            PropertyKind::Method | PropertyKind::Getter | PropertyKind::Setter => {
                let prefix = match property.kind {
                    PropertyKind::Getter => "get ",
                    PropertyKind::Setter => "set ",
                    _ => "",
                };
                match arena.get_function(property.initializer) {
                    Some(func) => self.print_method(prefix, property.name, property.computed, func),
                    None => self.print_property_name(property.name, property.computed),
                }
            }
        }
    }

    fn print_object_literal(&mut self, node: NodeIndex, properties: &NodeList, multi_line: bool) {
        let arena = self.arena;
        if properties.is_empty() && arena.dangling_comments(node).is_empty() {
            self.write("{}");
            return;
        }
        let break_lines = multi_line
            || !arena.dangling_comments(node).is_empty()
            || properties.iter().any(|p| self.has_comments(p));
        if !break_lines {
            if self.is_measuring() {
                self.print_object_single_line(properties);
                return;
            }
            let candidate = self.render_candidate(|p| p.print_object_single_line(properties));
            if self.fits_on_line(&candidate) {
                self.write(&candidate);
                return;
            }
        }
        self.print_broken_list(node, properties, ('{', '}'));
    }

    fn print_object_single_line(&mut self, properties: &NodeList) {
        self.write("{ ");
        self.print_comma_list(properties);
        self.write(" }");
    }

    fn print_array_literal(&mut self, node: NodeIndex, elements: &NodeList, multi_line: bool) {
        let arena = self.arena;
        if elements.is_empty() && arena.dangling_comments(node).is_empty() {
            self.write("[]");
            return;
        }
        let break_lines = multi_line
            || !arena.dangling_comments(node).is_empty()
            || elements.iter().any(|e| self.has_comments(e));
        if !break_lines {
            if self.is_measuring() {
                self.print_array_single_line(elements);
                return;
            }
            let candidate = self.render_candidate(|p| p.print_array_single_line(elements));
            if self.fits_on_line(&candidate) {
                self.write(&candidate);
                return;
            }
        }
        self.print_broken_list(node, elements, ('[', ']'));
    }

    fn print_array_single_line(&mut self, elements: &NodeList) {
        self.write_char('[');
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_expression(element, PREC_ASSIGNMENT);
        }
        // A trailing hole needs its own comma.
        if elements.iter().last().is_some_and(|e| e.is_none()) {
            self.write_char(',');
        }
        self.write_char(']');
    }

    /// One element per line, no trailing comma, keeping blank lines and
    /// comments of the elements.
    fn print_broken_list(&mut self, node: NodeIndex, elements: &NodeList, delimiters: (char, char)) {
        let arena = self.arena;
        // Object members own their leading comments; array elements carry
        // them on the expression and print them inline.
        let owns_comments = delimiters.0 == '{';
        self.write_char(delimiters.0);
        self.write_line();
        self.increase_indent();
        let count = elements.len();
        for (i, element) in elements.iter().enumerate() {
            if i > 0 && arena.has_blank_line_before(element) {
                self.write_line();
            }
            if owns_comments {
                self.print_leading_comment_lines(element);
                self.write_indent();
                self.print_expression_data(element);
            } else {
                self.write_indent();
                self.print_expression(element, PREC_ASSIGNMENT);
            }
            if i + 1 < count || element.is_none() {
                self.write_char(',');
            }
            self.print_trailing_comments(element);
            self.write_line();
        }
        self.print_dangling_comment_lines(node);
        self.decrease_indent();
        self.write_indent();
        self.write_char(delimiters.1);
    }
}
