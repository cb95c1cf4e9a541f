//! Tree query facility.
//!
//! Structural search over a `NodeArena` and the in-place edits the rewrite
//! passes are built from. Searches return matches in document order; a
//! scope-aware search also reports the nearest enclosing function of each
//! match. Edits keep node indices stable: `replace` overwrites the target
//! slot, so every parent that referenced the target now sees the
//! replacement.

use tracing::trace;

use crate::parser::node::{NodeData, node_flags};
use crate::parser::{NodeArena, NodeIndex, NodeKind};

/// A match together with the function whose body (or parameters) contains
/// it. `scope` is `NodeIndex::NONE` at the top level of the search root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopedMatch {
    pub node: NodeIndex,
    pub scope: NodeIndex,
}

/// Function expressions, arrows, declarations, and methods.
pub fn is_function_like(arena: &NodeArena, index: NodeIndex) -> bool {
    matches!(arena.data(index), Some(NodeData::Function(_)))
}

/// All nodes under `root` (inclusive) matching `predicate`, in document order.
pub fn find_all(
    arena: &NodeArena,
    root: NodeIndex,
    predicate: impl Fn(&NodeArena, NodeIndex) -> bool,
) -> Vec<NodeIndex> {
    find_all_with_scope(arena, root, predicate)
        .into_iter()
        .map(|m| m.node)
        .collect()
}

/// All nodes of one kind under `root`.
pub fn find_all_of_kind(arena: &NodeArena, root: NodeIndex, kind: NodeKind) -> Vec<NodeIndex> {
    find_all(arena, root, |arena, index| arena.is_kind(index, kind))
}

/// Like `find_all`, also reporting each match's nearest enclosing function.
/// A function node's own scope is the function around it; its parameters
/// and body are scoped to the function itself.
pub fn find_all_with_scope(
    arena: &NodeArena,
    root: NodeIndex,
    predicate: impl Fn(&NodeArena, NodeIndex) -> bool,
) -> Vec<ScopedMatch> {
    let mut matches = Vec::new();
    if root.is_none() {
        return matches;
    }
    let mut stack = vec![(root, NodeIndex::NONE)];
    while let Some((node, scope)) = stack.pop() {
        if predicate(arena, node) {
            matches.push(ScopedMatch { node, scope });
        }
        let child_scope = if is_function_like(arena, node) {
            node
        } else {
            scope
        };
        let children = arena.get_children(node);
        for &child in children.iter().rev() {
            stack.push((child, child_scope));
        }
    }
    trace!(root = root.0, matches = matches.len(), "find_all_with_scope");
    matches
}

/// First match in document order.
pub fn find_first(
    arena: &NodeArena,
    root: NodeIndex,
    predicate: impl Fn(&NodeArena, NodeIndex) -> bool,
) -> Option<NodeIndex> {
    if root.is_none() {
        return None;
    }
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if predicate(arena, node) {
            return Some(node);
        }
        let children = arena.get_children(node);
        for &child in children.iter().rev() {
            stack.push(child);
        }
    }
    None
}

// =============================================================================
// Edits
// =============================================================================

/// Overwrite `target` with the payload of `replacement`.
///
/// The replacement slot is left as a dead `Empty` node. Comments on the
/// replacement are appended to the target's; the target keeps its
/// blank-line flag. The replacement must not reference `target` as a
/// descendant (use `relocate` first when wrapping a node).
pub fn replace(arena: &mut NodeArena, target: NodeIndex, replacement: NodeIndex) {
    if target == replacement || target.is_none() || replacement.is_none() {
        return;
    }
    let Some(source) = arena.get_mut(replacement) else {
        return;
    };
    let data = std::mem::replace(&mut source.data, NodeData::Empty);
    let (pos, end, flags) = (source.pos, source.end, source.flags);
    if let Some(node) = arena.get_mut(target) {
        node.data = data;
        node.pos = pos;
        node.end = end;
        node.flags = (node.flags & node_flags::BLANK_LINE_BEFORE)
            | (flags & !node_flags::BLANK_LINE_BEFORE);
    }
    let moved = arena.take_comments(replacement);
    arena.add_leading_comments(target, moved.leading);
    arena.add_trailing_comments(target, moved.trailing);
    arena.add_dangling_comments(target, moved.dangling);
}

/// Copy the node at `index` into a fresh slot and return the new index.
/// Comments stay with the original slot. Used to wrap a node in place:
/// relocate it, build the wrapper around the copy, then `replace` the
/// original slot with the wrapper.
pub fn relocate(arena: &mut NodeArena, index: NodeIndex) -> NodeIndex {
    let Some(node) = arena.get(index).cloned() else {
        return NodeIndex::NONE;
    };
    let flags = node.flags & !node_flags::BLANK_LINE_BEFORE;
    arena.add_node(node.pos, node.end, flags, node.data)
}

/// Position of `statement` in a statement container.
pub fn statement_position(
    arena: &NodeArena,
    container: NodeIndex,
    statement: NodeIndex,
) -> Option<usize> {
    arena.statement_list(container)?.position(statement)
}

/// Remove `statement` from its container. Returns whether it was found.
pub fn remove_statement(arena: &mut NodeArena, container: NodeIndex, statement: NodeIndex) -> bool {
    let Some(list) = arena.statement_list_mut(container) else {
        return false;
    };
    match list.position(statement) {
        Some(position) => {
            list.nodes.remove(position);
            true
        }
        None => false,
    }
}

/// Insert `statement` at `position` (clamped to the list length).
pub fn insert_statement(
    arena: &mut NodeArena,
    container: NodeIndex,
    position: usize,
    statement: NodeIndex,
) -> bool {
    let Some(list) = arena.statement_list_mut(container) else {
        return false;
    };
    let position = position.min(list.len());
    list.nodes.insert(position, statement);
    true
}

pub fn insert_statement_before(
    arena: &mut NodeArena,
    container: NodeIndex,
    reference: NodeIndex,
    statement: NodeIndex,
) -> bool {
    match statement_position(arena, container, reference) {
        Some(position) => insert_statement(arena, container, position, statement),
        None => false,
    }
}

pub fn insert_statement_after(
    arena: &mut NodeArena,
    container: NodeIndex,
    reference: NodeIndex,
    statement: NodeIndex,
) -> bool {
    match statement_position(arena, container, reference) {
        Some(position) => insert_statement(arena, container, position + 1, statement),
        None => false,
    }
}
