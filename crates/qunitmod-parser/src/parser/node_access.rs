//! Typed accessors and child enumeration.

use super::base::{ChildList, NodeIndex, NodeList};
use super::node::{
    AccessExprData, BinaryExprData, BlockData, CallExprData, ClassData, FunctionData,
    ImportDeclData, NodeArena, NodeData, ObjectLiteralData, PropertyData, SourceFileData,
    SpecifierData, UnaryLikeData, VariableData, VariableDeclarationData,
};

macro_rules! typed_getter {
    ($name:ident, $variant:ident, $ty:ty) => {
        #[inline]
        pub fn $name(&self, index: NodeIndex) -> Option<&$ty> {
            match self.data(index)? {
                NodeData::$variant(data) => Some(data),
                _ => None,
            }
        }
    };
}

macro_rules! typed_getter_mut {
    ($name:ident, $variant:ident, $ty:ty) => {
        #[inline]
        pub fn $name(&mut self, index: NodeIndex) -> Option<&mut $ty> {
            match self.data_mut(index)? {
                NodeData::$variant(data) => Some(data),
                _ => None,
            }
        }
    };
}

impl NodeArena {
    typed_getter!(get_source_file, SourceFile, SourceFileData);
    typed_getter!(get_call_expr, Call, CallExprData);
    typed_getter!(get_new_expr, New, CallExprData);
    typed_getter!(get_access_expr, Access, AccessExprData);
    typed_getter!(get_function, Function, FunctionData);
    typed_getter!(get_class, Class, ClassData);
    typed_getter!(get_object_literal, ObjectLiteral, ObjectLiteralData);
    typed_getter!(get_property, Property, PropertyData);
    typed_getter!(get_binary_expr, Binary, BinaryExprData);
    typed_getter!(get_block, Block, BlockData);
    typed_getter!(get_expression_statement, ExpressionStatement, UnaryLikeData);
    typed_getter!(get_variable_statement, VariableStatement, VariableData);
    typed_getter!(get_variable_declaration, VariableDeclaration, VariableDeclarationData);
    typed_getter!(get_import_decl, Import, ImportDeclData);
    typed_getter!(get_import_specifier, ImportSpecifier, SpecifierData);

    typed_getter_mut!(get_call_expr_mut, Call, CallExprData);
    typed_getter_mut!(get_function_mut, Function, FunctionData);
    typed_getter_mut!(get_object_literal_mut, ObjectLiteral, ObjectLiteralData);
    typed_getter_mut!(get_import_decl_mut, Import, ImportDeclData);

    /// Text of an identifier or private identifier.
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        match self.data(index)? {
            NodeData::Identifier(ident) | NodeData::PrivateIdentifier(ident) => {
                Some(&ident.escaped_text)
            }
            _ => None,
        }
    }

    /// Cooked value of a string literal.
    pub fn string_literal_value(&self, index: NodeIndex) -> Option<&str> {
        match self.data(index)? {
            NodeData::StringLiteral(lit) => Some(&lit.text),
            _ => None,
        }
    }

    /// The statement list of a source file, block, or case clause.
    pub fn statement_list(&self, container: NodeIndex) -> Option<&NodeList> {
        match self.data(container)? {
            NodeData::SourceFile(file) => Some(&file.statements),
            NodeData::Block(block) => Some(&block.statements),
            NodeData::CaseClause(clause) => Some(&clause.statements),
            _ => None,
        }
    }

    pub fn statement_list_mut(&mut self, container: NodeIndex) -> Option<&mut NodeList> {
        match self.data_mut(container)? {
            NodeData::SourceFile(file) => Some(&mut file.statements),
            NodeData::Block(block) => Some(&mut block.statements),
            NodeData::CaseClause(clause) => Some(&mut clause.statements),
            _ => None,
        }
    }

    /// Direct children in source order. Absent children are skipped.
    pub fn get_children(&self, index: NodeIndex) -> ChildList {
        let mut children = ChildList::new();
        let Some(data) = self.data(index) else {
            return children;
        };
        let mut push = |child: NodeIndex| {
            if child.is_some() {
                children.push(child);
            }
        };
        match data {
            NodeData::SourceFile(file) => file.statements.iter().for_each(&mut push),
            NodeData::Identifier(_)
            | NodeData::PrivateIdentifier(_)
            | NodeData::StringLiteral(_)
            | NodeData::NumericLiteral(_)
            | NodeData::RegularExpressionLiteral(_)
            | NodeData::Keyword(_)
            | NodeData::Empty
            | NodeData::Debugger => {}
            NodeData::Template(template) => template.expressions.iter().for_each(&mut push),
            NodeData::TaggedTemplate(tagged) => {
                push(tagged.tag);
                push(tagged.template);
            }
            NodeData::ArrayLiteral(array) => array.elements.iter().for_each(&mut push),
            NodeData::ObjectLiteral(object) => object.properties.iter().for_each(&mut push),
            NodeData::Property(prop) => {
                push(prop.name);
                push(prop.initializer);
            }
            NodeData::Spread(data)
            | NodeData::Await(data)
            | NodeData::Parenthesized(data)
            | NodeData::ExpressionStatement(data)
            | NodeData::Return(data)
            | NodeData::Throw(data) => push(data.expression),
            NodeData::Function(func) => {
                push(func.name);
                func.parameters.iter().for_each(&mut push);
                push(func.body);
            }
            NodeData::Class(class) => {
                push(class.name);
                push(class.heritage);
                class.members.iter().for_each(&mut push);
            }
            NodeData::ClassMember(member) => {
                push(member.name);
                push(member.value);
            }
            NodeData::Call(call) | NodeData::New(call) => {
                push(call.expression);
                call.arguments.iter().for_each(&mut push);
            }
            NodeData::Access(access) => {
                push(access.expression);
                push(access.name_or_argument);
            }
            NodeData::PrefixUnary(unary) | NodeData::PostfixUnary(unary) => push(unary.operand),
            NodeData::Yield(data) => push(data.expression),
            NodeData::Binary(binary) => {
                push(binary.left);
                push(binary.right);
            }
            NodeData::Conditional(cond) => {
                push(cond.condition);
                push(cond.when_true);
                push(cond.when_false);
            }
            NodeData::VariableStatement(var) => var.declarations.iter().for_each(&mut push),
            NodeData::VariableDeclaration(decl) => {
                push(decl.name);
                push(decl.initializer);
            }
            NodeData::Block(block) => block.statements.iter().for_each(&mut push),
            NodeData::If(stmt) => {
                push(stmt.expression);
                push(stmt.then_statement);
                push(stmt.else_statement);
            }
            NodeData::For(stmt) => {
                push(stmt.initializer);
                push(stmt.condition);
                push(stmt.incrementor);
                push(stmt.statement);
            }
            NodeData::ForInOf(stmt) => {
                push(stmt.initializer);
                push(stmt.expression);
                push(stmt.statement);
            }
            NodeData::While(stmt) | NodeData::DoWhile(stmt) => {
                push(stmt.condition);
                push(stmt.statement);
            }
            NodeData::Break(jump) | NodeData::Continue(jump) => push(jump.label),
            NodeData::Try(stmt) => {
                push(stmt.try_block);
                push(stmt.catch_clause);
                push(stmt.finally_block);
            }
            NodeData::CatchClause(clause) => {
                push(clause.variable_declaration);
                push(clause.block);
            }
            NodeData::Switch(stmt) => {
                push(stmt.expression);
                stmt.clauses.iter().for_each(&mut push);
            }
            NodeData::CaseClause(clause) => {
                push(clause.expression);
                clause.statements.iter().for_each(&mut push);
            }
            NodeData::Labeled(stmt) => {
                push(stmt.label);
                push(stmt.statement);
            }
            NodeData::Import(import) => {
                push(import.default_binding);
                push(import.namespace_binding);
                if let Some(named) = &import.named_bindings {
                    named.iter().for_each(&mut push);
                }
                push(import.module_specifier);
            }
            NodeData::ImportSpecifier(spec) | NodeData::ExportSpecifier(spec) => {
                push(spec.property_name);
                push(spec.name);
            }
            NodeData::Export(export) => {
                push(export.declaration);
                if let Some(named) = &export.named_exports {
                    named.iter().for_each(&mut push);
                }
                if let Some(star) = export.star {
                    push(star);
                }
                push(export.module_specifier);
            }
        }
        children
    }
}
