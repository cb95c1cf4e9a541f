//! `this.subject()` resolution for `setupTest` modules.

use qunitmod_parser::query::{find_all, replace};
use qunitmod_parser::syntax::matchers::{is_this, member_call_parts};
use qunitmod_parser::{NodeArena, NodeIndex};
use tracing::trace;

use crate::imports::{ImportRegistry, InsertPosition};

pub const RUNLOOP_MODULE: &str = "@ember/runloop";

/// Container types whose factories produce instances per call; every other
/// type is looked up as a singleton.
const INSTANCE_TYPES: [&str; 2] = ["model", "component"];

/// Rewrite every `this.subject(options?)` under `root`:
///
/// - singleton types without options: `this.owner.lookup(key)`
/// - models: `run(() => this.owner.lookup('service:store').createRecord(name, options))`
/// - everything else: `this.owner.factoryFor(key).create(options)`
pub fn resolve_subject_calls(
    arena: &mut NodeArena,
    file: NodeIndex,
    root: NodeIndex,
    subject_key: &str,
    imports: &mut ImportRegistry,
) -> usize {
    let calls = find_all(arena, root, |arena, node| {
        member_call_parts(arena, node)
            .is_some_and(|(object, method)| method == "subject" && is_this(arena, object))
    });
    let (subject_type, subject_name) = subject_key.split_once(':').unwrap_or((subject_key, subject_key));

    for &call in &calls {
        let options = arena
            .get_call_expr(call)
            .and_then(|call| call.arguments.first());
        let replacement = if options.is_none() && !INSTANCE_TYPES.contains(&subject_type) {
            let owner = arena.create_this_property("owner");
            let key = arena.create_string_literal(subject_key);
            arena.create_method_call(owner, "lookup", vec![key])
        } else if subject_type == "model" {
            imports.ensure_specifiers(arena, file, RUNLOOP_MODULE, &["run"], None, InsertPosition::After);
            let owner = arena.create_this_property("owner");
            let store_key = arena.create_string_literal("service:store");
            let store = arena.create_method_call(owner, "lookup", vec![store_key]);
            let mut arguments = vec![arena.create_string_literal(subject_name)];
            arguments.extend(options);
            let create = arena.create_method_call(store, "createRecord", arguments);
            let deferred = arena.create_arrow_function(Vec::new(), create);
            arena.create_named_call("run", vec![deferred])
        } else {
            let owner = arena.create_this_property("owner");
            let key = arena.create_string_literal(subject_key);
            let factory = arena.create_method_call(owner, "factoryFor", vec![key]);
            arena.create_method_call(factory, "create", options.into_iter().collect())
        };
        replace(arena, call, replacement);
    }
    if !calls.is_empty() {
        trace!(subject = subject_key, count = calls.len(), "resolved subject calls");
    }
    calls.len()
}
