//! Call-site rewrite rules.
//!
//! Each rule rewrites one legacy idiom inside a bounded subtree (a test
//! statement, an option value, a module body statement) and returns how
//! many sites it changed. Rules leave already-modern code alone, so running
//! them twice is a no-op.

use qunitmod_parser::parser::node::NodeData;
use qunitmod_parser::query::{find_all, find_all_with_scope, replace};
use qunitmod_parser::syntax::matchers::{
    is_identifier_named, is_this, is_this_member, member_call_parts, member_name, member_object,
    property_key, property_value, skip_parentheses,
};
use qunitmod_parser::{NodeArena, NodeIndex};
use qunitmod_scanner::SyntaxKind;
use qunitmod_scanner::char_codes::is_identifier_text;
use tracing::trace;

use crate::module_info::ModuleDescriptor;

// =============================================================================
// Shared helpers
// =============================================================================

/// Value of a string known statically: a string literal, a template without
/// substitutions, or a `+` chain of those.
pub fn static_string(arena: &NodeArena, node: NodeIndex) -> Option<String> {
    let node = skip_parentheses(arena, node);
    match arena.data(node)? {
        NodeData::StringLiteral(literal) => Some(literal.text.clone()),
        NodeData::Template(template)
            if template.expressions.is_empty() && !template.quasis.iter().any(|q| q.contains('\\')) =>
        {
            Some(template.quasis.concat())
        }
        NodeData::Binary(binary) if binary.operator_token == SyntaxKind::PlusToken => {
            let mut value = static_string(arena, binary.left)?;
            value.push_str(&static_string(arena, binary.right)?);
            Some(value)
        }
        _ => None,
    }
}

/// `object.name`, or `object['name']` when `name` is not a bare identifier.
pub fn member_access(arena: &mut NodeArena, object: NodeIndex, name: &str) -> NodeIndex {
    if is_identifier_text(name) {
        arena.create_property_access(object, name)
    } else {
        let key = arena.create_string_literal(name);
        arena.create_element_access(object, key)
    }
}

/// `this.name` or `this['name']`.
pub fn context_member(arena: &mut NodeArena, name: &str) -> NodeIndex {
    let this = arena.create_this();
    member_access(arena, this, name)
}

/// `this.owner`
fn this_owner(arena: &mut NodeArena) -> NodeIndex {
    arena.create_this_property("owner")
}

/// Replace the object of every `this.<holder>.<method>` access with
/// `this.owner`.
fn retarget_to_owner(arena: &mut NodeArena, root: NodeIndex, holder: &str, method: &str) -> usize {
    let accesses = find_all(arena, root, |arena, node| {
        member_name(arena, node) == Some(method)
            && member_object(arena, node).is_some_and(|object| is_this_member(arena, object, holder))
    });
    for &access in &accesses {
        if let Some(object) = member_object(arena, access) {
            let owner = this_owner(arena);
            replace(arena, object, owner);
        }
    }
    accesses.len()
}

// =============================================================================
// Rules
// =============================================================================

/// `this.container.lookup(...)` -> `this.owner.lookup(...)`
pub fn rewrite_lookup_calls(arena: &mut NodeArena, root: NodeIndex) -> usize {
    let count = retarget_to_owner(arena, root, "container", "lookup");
    if count > 0 {
        trace!(count, "rewrote container lookups");
    }
    count
}

/// `this.registry.register(...)` and `this.register(...)` ->
/// `this.owner.register(...)`
pub fn rewrite_register_calls(arena: &mut NodeArena, root: NodeIndex) -> usize {
    let mut count = retarget_to_owner(arena, root, "registry", "register");

    let direct = find_all(arena, root, |arena, node| {
        member_name(arena, node) == Some("register")
            && member_object(arena, node).is_some_and(|object| is_this(arena, object))
    });
    for &access in &direct {
        if let Some(object) = member_object(arena, access) {
            let owner = this_owner(arena);
            replace(arena, object, owner);
        }
    }
    count += direct.len();
    if count > 0 {
        trace!(count, "rewrote registrations");
    }
    count
}

/// `this.inject.service('foo', { as: 'bar' })` ->
/// `this.bar = this.owner.lookup('service:foo')`
pub fn rewrite_inject_calls(arena: &mut NodeArena, root: NodeIndex) -> usize {
    let calls = find_all(arena, root, |arena, node| {
        member_call_parts(arena, node).is_some_and(|(object, _)| is_this_member(arena, object, "inject"))
    });

    let mut count = 0;
    for call in calls {
        let Some((_, kind)) = member_call_parts(arena, call) else {
            continue;
        };
        let kind = kind.to_string();
        let Some(arguments) = arena.get_call_expr(call).map(|c| c.arguments.nodes.clone()) else {
            continue;
        };
        let Some(name) = arguments.first().and_then(|&first| static_string(arena, first)) else {
            trace!(kind = %kind, "inject call without a static name");
            continue;
        };
        let local = arguments
            .get(1)
            .and_then(|&options| option_string(arena, options, "as"))
            .unwrap_or_else(|| name.clone());

        let target = context_member(arena, &local);
        let owner = this_owner(arena);
        let key = arena.create_string_literal(&format!("{kind}:{name}"));
        let lookup = arena.create_method_call(owner, "lookup", vec![key]);
        let assignment = arena.create_assignment(target, lookup);
        replace(arena, call, assignment);
        trace!(kind = %kind, name = %name, local = %local, "rewrote inject");
        count += 1;
    }
    count
}

/// Static string value of `key` in an object literal argument.
fn option_string(arena: &NodeArena, object: NodeIndex, key: &str) -> Option<String> {
    let object = arena.get_object_literal(skip_parentheses(arena, object))?;
    let property = object
        .properties
        .iter()
        .find(|&property| property_key(arena, property) == Some(key))?;
    static_string(arena, property_value(arena, property)?)
}

/// `this.on('save', fn)` -> `this.actions.save = fn`, installing the
/// `this.send` dispatcher in the module's `beforeEach` on first use.
pub fn rewrite_action_calls(
    arena: &mut NodeArena,
    root: NodeIndex,
    module: &mut ModuleDescriptor,
) -> usize {
    let calls = find_all(arena, root, |arena, node| {
        member_call_parts(arena, node).is_some_and(|(object, method)| method == "on" && is_this(arena, object))
    });

    let mut count = 0;
    for call in calls {
        let Some(arguments) = arena.get_call_expr(call).map(|c| c.arguments.nodes.clone()) else {
            continue;
        };
        let (Some(&name), Some(&handler)) = (arguments.first(), arguments.get(1)) else {
            continue;
        };
        let Some(action) = static_string(arena, name) else {
            trace!("action registration without a static name");
            continue;
        };
        let actions = arena.create_this_property("actions");
        let target = member_access(arena, actions, &action);
        let assignment = arena.create_assignment(target, handler);
        replace(arena, call, assignment);
        trace!(action = %action, "rewrote action registration");
        count += 1;
    }
    if count > 0 {
        module.ensure_send_dispatcher(arena);
    }
    count
}

/// `getOwner(x)` / `Ember.getOwner(x)` -> `x.owner` (`this.owner` without
/// an argument), only for calls whose nearest enclosing function is
/// `scope`. Calls inside nested functions are left alone: their `this`
/// may be a different object.
pub fn rewrite_get_owner_calls(arena: &mut NodeArena, root: NodeIndex, scope: NodeIndex) -> usize {
    let matches = find_all_with_scope(arena, root, |arena, node| {
        let Some(call) = arena.get_call_expr(node) else {
            return false;
        };
        let callee = call.expression;
        is_identifier_named(arena, callee, "getOwner")
            || (member_name(arena, callee) == Some("getOwner")
                && member_object(arena, callee)
                    .is_some_and(|object| is_identifier_named(arena, object, "Ember")))
    });

    let mut count = 0;
    for found in matches {
        if found.scope != scope {
            trace!(call = found.node.0, "getOwner outside the rewritten scope");
            continue;
        }
        let argument = arena
            .get_call_expr(found.node)
            .and_then(|call| call.arguments.first());
        let owner = match argument {
            Some(argument) => arena.create_property_access(argument, "owner"),
            None => this_owner(arena),
        };
        replace(arena, found.node, owner);
        count += 1;
    }
    if count > 0 {
        trace!(count, "rewrote getOwner calls");
    }
    count
}

/// Run lookup, register, inject, action, and (when `owner_scope` is given)
/// getOwner rewrites over `root`, in that order.
pub fn apply_call_site_rules(
    arena: &mut NodeArena,
    root: NodeIndex,
    module: &mut ModuleDescriptor,
    owner_scope: Option<NodeIndex>,
) -> usize {
    let mut count = rewrite_lookup_calls(arena, root);
    count += rewrite_register_calls(arena, root);
    count += rewrite_inject_calls(arena, root);
    count += rewrite_action_calls(arena, root, module);
    if let Some(scope) = owner_scope {
        count += rewrite_get_owner_calls(arena, root, scope);
    }
    count
}
