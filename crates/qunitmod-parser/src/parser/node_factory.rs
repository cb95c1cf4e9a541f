//! Node factory for synthesized nodes.
//!
//! Rewrites build new syntax through these helpers. Synthesized nodes carry
//! `SYNTHESIZED_POS` spans and the `SYNTHESIZED` flag so the printer never
//! tries to reuse source text for them.

use qunitmod_scanner::SyntaxKind;

use super::base::{NodeIndex, NodeList};
use super::node::{
    AccessExprData, BinaryExprData, BlockData, CallExprData, FunctionData, FunctionFlavor,
    IdentifierData, ImportDeclData, LiteralData, NodeArena, NodeData, ObjectLiteralData,
    PropertyData, PropertyKind, SYNTHESIZED_POS, SpecifierData, UnaryLikeData, node_flags,
};

impl NodeArena {
    fn synthesize(&mut self, data: NodeData) -> NodeIndex {
        self.add_node(
            SYNTHESIZED_POS,
            SYNTHESIZED_POS,
            node_flags::SYNTHESIZED,
            data,
        )
    }

    pub fn create_identifier(&mut self, text: &str) -> NodeIndex {
        self.synthesize(NodeData::Identifier(IdentifierData {
            escaped_text: text.to_string(),
        }))
    }

    pub fn create_string_literal(&mut self, value: &str) -> NodeIndex {
        self.synthesize(NodeData::StringLiteral(LiteralData {
            text: value.to_string(),
            raw: None,
        }))
    }

    pub fn create_this(&mut self) -> NodeIndex {
        self.synthesize(NodeData::Keyword(SyntaxKind::ThisKeyword))
    }

    /// `object.name`
    pub fn create_property_access(&mut self, object: NodeIndex, name: &str) -> NodeIndex {
        let name = self.create_identifier(name);
        self.synthesize(NodeData::Access(AccessExprData {
            expression: object,
            name_or_argument: name,
            computed: false,
            question_dot: false,
        }))
    }

    /// `object[argument]`
    pub fn create_element_access(&mut self, object: NodeIndex, argument: NodeIndex) -> NodeIndex {
        self.synthesize(NodeData::Access(AccessExprData {
            expression: object,
            name_or_argument: argument,
            computed: true,
            question_dot: false,
        }))
    }

    /// `this.name`
    pub fn create_this_property(&mut self, name: &str) -> NodeIndex {
        let this = self.create_this();
        self.create_property_access(this, name)
    }

    pub fn create_call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.synthesize(NodeData::Call(CallExprData {
            expression: callee,
            arguments: NodeList::with_nodes(arguments),
            question_dot: false,
        }))
    }

    /// `callee_name(arguments...)` with an identifier callee.
    pub fn create_named_call(&mut self, callee_name: &str, arguments: Vec<NodeIndex>) -> NodeIndex {
        let callee = self.create_identifier(callee_name);
        self.create_call(callee, arguments)
    }

    /// `object.method(arguments...)`
    pub fn create_method_call(
        &mut self,
        object: NodeIndex,
        method: &str,
        arguments: Vec<NodeIndex>,
    ) -> NodeIndex {
        let callee = self.create_property_access(object, method);
        self.create_call(callee, arguments)
    }

    pub fn create_assignment(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.synthesize(NodeData::Binary(BinaryExprData {
            left,
            operator_token: SyntaxKind::EqualsToken,
            right,
        }))
    }

    pub fn create_expression_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.synthesize(NodeData::ExpressionStatement(UnaryLikeData { expression }))
    }

    pub fn create_await(&mut self, expression: NodeIndex) -> NodeIndex {
        self.synthesize(NodeData::Await(UnaryLikeData { expression }))
    }

    pub fn create_spread(&mut self, expression: NodeIndex) -> NodeIndex {
        self.synthesize(NodeData::Spread(UnaryLikeData { expression }))
    }

    pub fn create_block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.synthesize(NodeData::Block(BlockData {
            statements: NodeList::with_nodes(statements),
            multi_line: true,
        }))
    }

    /// Anonymous `function(params) { statements }`.
    pub fn create_function_expression(
        &mut self,
        parameters: Vec<NodeIndex>,
        statements: Vec<NodeIndex>,
    ) -> NodeIndex {
        let body = self.create_block(statements);
        self.synthesize(NodeData::Function(FunctionData {
            name: NodeIndex::NONE,
            parameters: NodeList::with_nodes(parameters),
            body,
            is_async: false,
            is_generator: false,
            flavor: FunctionFlavor::Expression,
            parenthesized_params: true,
        }))
    }

    /// `(params) => body` where `body` is a block or an expression.
    pub fn create_arrow_function(&mut self, parameters: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
        self.synthesize(NodeData::Function(FunctionData {
            name: NodeIndex::NONE,
            parameters: NodeList::with_nodes(parameters),
            body,
            is_async: false,
            is_generator: false,
            flavor: FunctionFlavor::Arrow,
            parenthesized_params: true,
        }))
    }

    pub fn create_object_literal(&mut self, properties: Vec<NodeIndex>) -> NodeIndex {
        self.synthesize(NodeData::ObjectLiteral(ObjectLiteralData {
            properties: NodeList::with_nodes(properties),
            multi_line: false,
        }))
    }

    /// `{ name }`
    pub fn create_shorthand_property(&mut self, name: &str) -> NodeIndex {
        let name = self.create_identifier(name);
        self.synthesize(NodeData::Property(PropertyData {
            name,
            initializer: NodeIndex::NONE,
            kind: PropertyKind::Shorthand,
            computed: false,
        }))
    }

    /// `import { specifiers } from 'source';`
    pub fn create_import_declaration(&mut self, specifiers: Vec<NodeIndex>, source: &str) -> NodeIndex {
        let module_specifier = self.create_string_literal(source);
        self.synthesize(NodeData::Import(ImportDeclData {
            default_binding: NodeIndex::NONE,
            namespace_binding: NodeIndex::NONE,
            named_bindings: Some(NodeList::with_nodes(specifiers)),
            module_specifier,
        }))
    }

    /// `{ name }` inside an import clause.
    pub fn create_import_specifier(&mut self, name: &str) -> NodeIndex {
        let name = self.create_identifier(name);
        self.synthesize(NodeData::ImportSpecifier(SpecifierData {
            property_name: NodeIndex::NONE,
            name,
        }))
    }
}
