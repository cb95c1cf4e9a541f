//! `import wait from 'ember-test-helpers/wait'` -> `settled`.

use qunitmod_parser::query::{find_all, replace};
use qunitmod_parser::syntax::matchers::is_identifier_named;
use qunitmod_parser::{NodeArena, NodeIndex};
use tracing::{debug, instrument};

use crate::config::CodemodConfig;
use crate::imports::{ImportRegistry, InsertPosition, default_import_name, find_imports};
use crate::legacy_imports::EMBER_QUNIT;

pub const SETTLED: &str = "settled";

/// Replace default imports of the wait helper with a `settled` import and
/// rename the calls made through them. Calls to a `wait` that was never
/// imported (a global helper) are left alone. Returns the number of
/// migrated imports.
#[instrument(level = "debug", skip_all)]
pub fn migrate_wait_imports(
    arena: &mut NodeArena,
    root: NodeIndex,
    imports: &mut ImportRegistry,
    config: &CodemodConfig,
) -> usize {
    let mut migrated = 0;
    for wait_module in config.wait_modules() {
        for declaration in find_imports(arena, root, &wait_module) {
            let only_default = arena.get_import_decl(declaration).is_some_and(|import| {
                import.namespace_binding.is_none()
                    && import.named_bindings.as_ref().is_none_or(|named| named.is_empty())
            });
            let Some(local) = default_import_name(arena, declaration).map(str::to_string) else {
                debug!(source = %wait_module, "wait import without a default binding");
                continue;
            };
            if !only_default {
                debug!(source = %wait_module, "wait import with extra bindings left as is");
                continue;
            }

            imports.ensure_specifiers(
                arena,
                root,
                &config.test_helpers_module,
                &[SETTLED],
                Some(EMBER_QUNIT),
                InsertPosition::After,
            );
            imports.remove_import(arena, root, declaration);

            let callees: Vec<NodeIndex> = find_all(arena, root, |arena, node| {
                arena
                    .get_call_expr(node)
                    .is_some_and(|call| is_identifier_named(arena, call.expression, &local))
            })
            .into_iter()
            .filter_map(|call| arena.get_call_expr(call).map(|call| call.expression))
            .collect();
            for &callee in &callees {
                let settled = arena.create_identifier(SETTLED);
                replace(arena, callee, settled);
            }
            debug!(local = %local, calls = callees.len(), "migrated wait helper");
            migrated += 1;
        }
    }
    migrated
}
