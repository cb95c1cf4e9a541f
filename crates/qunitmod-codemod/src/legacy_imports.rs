//! Import passes that run before module segmentation.
//!
//! 1. `move_qunit_imports`: `module`, `test`, `skip`, and `todo` come from
//!    `qunit`, not `ember-qunit`.
//! 2. `remap_setup_imports`: `moduleFor*` imports become the setup
//!    functions the rewritten modules call. This has to see the legacy
//!    calls before segmentation replaces them.

use indexmap::IndexSet;
use qunitmod_parser::{NodeArena, NodeIndex, NodeList};
use smallvec::SmallVec;
use tracing::{debug, instrument};

use crate::config::CodemodConfig;
use crate::imports::{ImportRegistry, InsertPosition, find_imports, imported_name};
use crate::module_info::{Classification, ModuleKind, classify};

pub const EMBER_QUNIT: &str = "ember-qunit";
pub const QUNIT: &str = "qunit";

/// Names that belong to `qunit` itself.
const QUNIT_EXPORTS: [&str; 4] = ["module", "test", "skip", "todo"];

/// Move the QUnit exports out of every `ember-qunit` import into a single
/// `qunit` import placed before it.
#[instrument(level = "debug", skip_all)]
pub fn move_qunit_imports(arena: &mut NodeArena, root: NodeIndex, imports: &mut ImportRegistry) {
    let mut moved: Vec<NodeIndex> = Vec::new();
    for declaration in find_imports(arena, root, EMBER_QUNIT) {
        let Some(import) = arena.get_import_decl(declaration) else {
            continue;
        };
        let Some(named) = import.named_bindings.as_ref() else {
            continue;
        };
        let (qunit, kept): (Vec<NodeIndex>, Vec<NodeIndex>) = named.iter().partition(|&specifier| {
            imported_name(arena, specifier).is_some_and(|name| QUNIT_EXPORTS.contains(&name))
        });
        if qunit.is_empty() {
            continue;
        }
        moved.extend(qunit);
        if let Some(import) = arena.get_import_decl_mut(declaration) {
            import.named_bindings = Some(NodeList::with_nodes(kept));
        }
        imports.record_edit();
    }
    if moved.is_empty() {
        return;
    }
    debug!(count = moved.len(), "moving QUnit imports out of ember-qunit");
    let declaration = imports.ensure_import(arena, root, QUNIT, Some(EMBER_QUNIT), InsertPosition::Before);
    imports.adopt_specifiers(arena, declaration, moved);
}

/// Map an `ember-qunit` import name to its replacements. `None` keeps the
/// specifier as written.
fn setup_names_for(
    arena: &NodeArena,
    root: NodeIndex,
    name: &str,
    config: &CodemodConfig,
) -> Option<SmallVec<[&'static str; 2]>> {
    match name {
        "moduleFor" | "moduleForModel" => Some(SmallVec::from_slice(&["setupTest"])),
        "moduleForComponent" => {
            // One component module may render while another is a unit test.
            let mut names: SmallVec<[&'static str; 2]> = SmallVec::new();
            for statement in arena.statement_list(root).into_iter().flat_map(|list| list.iter()) {
                let Some(Classification::Legacy(module)) =
                    classify(arena, statement, config.component_strategy)
                else {
                    continue;
                };
                if module.kind != ModuleKind::ForComponent {
                    continue;
                }
                if let Some(setup) = module.setup.function_name() {
                    if !names.contains(&setup) {
                        names.push(setup);
                    }
                }
            }
            Some(names)
        }
        _ => None,
    }
}

/// Replace `moduleFor`, `moduleForComponent`, and `moduleForModel` imports
/// with setup functions, ensuring `module` is imported from `qunit`. An
/// `ember-qunit` import left with nothing to import is removed.
///
/// Several `ember-qunit` declarations are folded into one first, so a setup
/// function is never bound twice.
#[instrument(level = "debug", skip_all)]
pub fn remap_setup_imports(
    arena: &mut NodeArena,
    root: NodeIndex,
    imports: &mut ImportRegistry,
    config: &CodemodConfig,
) {
    let has_named_clause = find_imports(arena, root, EMBER_QUNIT).into_iter().any(|declaration| {
        arena.get_import_decl(declaration).is_some_and(|import| {
            import.named_bindings.is_some() && import.namespace_binding.is_none()
        })
    });
    if !has_named_clause {
        return;
    }
    let declaration = imports.ensure_import(arena, root, EMBER_QUNIT, None, InsertPosition::After);

    let Some(import) = arena.get_import_decl(declaration) else {
        return;
    };
    let Some(named) = import.named_bindings.clone() else {
        return;
    };
    let has_other_bindings = import.default_binding.is_some() || import.namespace_binding.is_some();

    let mut remapped = false;
    let mut kept: Vec<NodeIndex> = Vec::new();
    let mut added: IndexSet<&'static str> = IndexSet::new();
    for specifier in named.iter() {
        let name = imported_name(arena, specifier).unwrap_or_default();
        match setup_names_for(arena, root, name, config) {
            Some(names) => {
                remapped = true;
                added.extend(names);
            }
            None => kept.push(specifier),
        }
    }

    if remapped {
        debug!(added = ?added, "remapped legacy ember-qunit imports");
        imports.ensure_specifiers(
            arena,
            root,
            QUNIT,
            &["module"],
            Some(EMBER_QUNIT),
            InsertPosition::Before,
        );
    }
    for name in added {
        let specifier = arena.create_import_specifier(name);
        kept.push(specifier);
    }

    if kept.is_empty() && !has_other_bindings {
        imports.remove_import(arena, root, declaration);
    } else {
        imports.replace_specifiers(arena, declaration, kept);
    }
}
