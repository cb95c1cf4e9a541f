//! Rendering tests: `this.render(...)` becomes `await render(...)`.

use indexmap::IndexSet;
use qunitmod_parser::parser::NodeKind;
use qunitmod_parser::query::{find_all, find_all_with_scope, replace};
use qunitmod_parser::syntax::matchers::{is_this, is_this_member, member_call_parts};
use qunitmod_parser::{NodeArena, NodeIndex};
use tracing::{debug, trace};

use crate::imports::{ImportRegistry, InsertPosition};
use crate::legacy_imports::EMBER_QUNIT;

/// Test-context methods replaced by imported helpers.
pub const RENDER_HELPERS: [&str; 2] = ["render", "clearRender"];

/// The `this.<helper>(...)` call of an expression statement.
fn render_statement_call(arena: &NodeArena, statement: NodeIndex) -> Option<(NodeIndex, &'static str)> {
    let expression = arena.get_expression_statement(statement)?.expression;
    let (object, method) = member_call_parts(arena, expression)?;
    if !is_this(arena, object) {
        return None;
    }
    let helper = RENDER_HELPERS.iter().find(|&&helper| helper == method)?;
    Some((expression, *helper))
}

/// Convert render calls under `root`, mark their functions `async`, import
/// the helpers, and rename `this._element` to `this.element`.
pub fn convert_render_calls(
    arena: &mut NodeArena,
    file: NodeIndex,
    root: NodeIndex,
    helpers_module: &str,
    imports: &mut ImportRegistry,
) -> usize {
    let statements = find_all_with_scope(arena, root, |arena, node| {
        arena.is_kind(node, NodeKind::ExpressionStatement) && render_statement_call(arena, node).is_some()
    });

    let mut helpers: IndexSet<&'static str> = IndexSet::new();
    let mut count = 0;
    for found in statements {
        let Some((call, helper)) = render_statement_call(arena, found.node) else {
            continue;
        };
        let Some(function) = arena.get_function_mut(found.scope) else {
            debug!(helper, "render call outside a function left as is");
            continue;
        };
        function.is_async = true;

        let arguments = arena
            .get_call_expr(call)
            .map(|call| call.arguments.nodes.clone())
            .unwrap_or_default();
        let bare = arena.create_named_call(helper, arguments);
        let awaited = arena.create_await(bare);
        replace(arena, call, awaited);
        helpers.insert(helper);
        count += 1;
    }

    if !helpers.is_empty() {
        let names: Vec<&str> = helpers.into_iter().collect();
        imports.ensure_specifiers(
            arena,
            file,
            helpers_module,
            &names,
            Some(EMBER_QUNIT),
            InsertPosition::After,
        );
        trace!(count, ?names, "converted render calls");
    }

    let elements = find_all(arena, root, |arena, node| is_this_member(arena, node, "_element"));
    for &access in &elements {
        let Some(name) = arena.get_access_expr(access).map(|access| access.name_or_argument) else {
            continue;
        };
        let renamed = arena.create_identifier("element");
        replace(arena, name, renamed);
    }
    count + elements.len()
}
