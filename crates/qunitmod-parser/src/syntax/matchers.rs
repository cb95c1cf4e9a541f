//! Shape matchers: small predicates and extractors over common node shapes.

use crate::parser::node::{FunctionFlavor, NodeData, PropertyKind};
use crate::parser::{NodeArena, NodeIndex};

/// Strip any number of wrapping parentheses.
pub fn skip_parentheses(arena: &NodeArena, mut index: NodeIndex) -> NodeIndex {
    while let Some(NodeData::Parenthesized(inner)) = arena.data(index) {
        index = inner.expression;
    }
    index
}

pub fn is_this(arena: &NodeArena, index: NodeIndex) -> bool {
    matches!(
        arena.data(index),
        Some(NodeData::Keyword(qunitmod_scanner::SyntaxKind::ThisKeyword))
    )
}

pub fn is_identifier_named(arena: &NodeArena, index: NodeIndex, name: &str) -> bool {
    arena.identifier_text(index) == Some(name)
}

/// `function () {}` (not arrows, methods, or declarations).
pub fn is_function_expression(arena: &NodeArena, index: NodeIndex) -> bool {
    matches!(
        arena.data(index),
        Some(NodeData::Function(func)) if func.flavor == FunctionFlavor::Expression
    )
}

/// Function expression or arrow function.
pub fn is_function_or_arrow(arena: &NodeArena, index: NodeIndex) -> bool {
    matches!(
        arena.data(index),
        Some(NodeData::Function(func))
            if matches!(func.flavor, FunctionFlavor::Expression | FunctionFlavor::Arrow)
    )
}

/// Name of a non-computed member access: `object.name` gives `name`.
pub fn member_name(arena: &NodeArena, index: NodeIndex) -> Option<&str> {
    match arena.data(index)? {
        NodeData::Access(access) if !access.computed => {
            arena.identifier_text(access.name_or_argument)
        }
        _ => None,
    }
}

/// Object of a member access.
pub fn member_object(arena: &NodeArena, index: NodeIndex) -> Option<NodeIndex> {
    match arena.data(index)? {
        NodeData::Access(access) => Some(access.expression),
        _ => None,
    }
}

/// `this.name`
pub fn is_this_member(arena: &NodeArena, index: NodeIndex, name: &str) -> bool {
    member_name(arena, index) == Some(name)
        && member_object(arena, index).is_some_and(|object| is_this(arena, object))
}

/// Identifier callee name of a call: `name(...)`.
pub fn callee_name(arena: &NodeArena, call: NodeIndex) -> Option<&str> {
    let call = arena.get_call_expr(call)?;
    arena.identifier_text(call.expression)
}

/// `object.method(...)` returns `(object, method)`.
pub fn member_call_parts(arena: &NodeArena, call: NodeIndex) -> Option<(NodeIndex, &str)> {
    let call = arena.get_call_expr(call)?;
    let object = member_object(arena, call.expression)?;
    let method = member_name(arena, call.expression)?;
    Some((object, method))
}

/// The call of an expression statement `call(...);`.
pub fn expression_statement_call(arena: &NodeArena, statement: NodeIndex) -> Option<NodeIndex> {
    let expression = arena.get_expression_statement(statement)?.expression;
    arena.get_call_expr(expression).map(|_| expression)
}

/// Cooked value of the string literal argument at `position`.
pub fn string_argument(arena: &NodeArena, call: NodeIndex, position: usize) -> Option<&str> {
    let call = arena.get_call_expr(call)?;
    arena.string_literal_value(call.arguments.get(position)?)
}

/// Key text of a non-computed property: identifier name or string value.
pub fn property_key(arena: &NodeArena, property: NodeIndex) -> Option<&str> {
    let data = arena.get_property(property)?;
    if data.computed {
        return None;
    }
    arena
        .identifier_text(data.name)
        .or_else(|| arena.string_literal_value(data.name))
}

/// Value of a property: the initializer, the method function, or the name
/// itself for a plain shorthand.
pub fn property_value(arena: &NodeArena, property: NodeIndex) -> Option<NodeIndex> {
    let data = arena.get_property(property)?;
    match data.kind {
        PropertyKind::Shorthand if data.initializer.is_none() => Some(data.name),
        PropertyKind::Getter | PropertyKind::Setter => None,
        _ => Some(data.initializer),
    }
}

/// Whether a property is written as a method (`key() {}`).
pub fn is_method_property(arena: &NodeArena, property: NodeIndex) -> bool {
    arena
        .get_property(property)
        .is_some_and(|data| data.kind == PropertyKind::Method)
}
