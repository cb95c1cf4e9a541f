//! Tests for the call-site rewrite rules.
use crate::config::ComponentStrategy;
use crate::module_info::{Classification, ModuleDescriptor, classify};
use crate::rules::{
    apply_call_site_rules, rewrite_action_calls, rewrite_get_owner_calls, rewrite_inject_calls,
    rewrite_lookup_calls, rewrite_register_calls, static_string,
};
use qunitmod_parser::parser::NodeKind;
use qunitmod_parser::query::find_all_of_kind;
use qunitmod_parser::{NodeArena, NodeIndex, ParserState};
use qunitmod_printer::{PrintOptions, Printer};

fn parse(source: &str) -> (NodeArena, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty());
    (parser.into_arena(), root)
}

fn print(arena: &NodeArena, root: NodeIndex) -> String {
    let mut printer = Printer::new(arena, PrintOptions::default());
    printer.print(root);
    printer.finish().code
}

fn unit_module(arena: &mut NodeArena) -> ModuleDescriptor {
    let name = arena.create_string_literal("service:foo");
    let call = arena.create_named_call("moduleFor", vec![name]);
    let statement = arena.create_expression_statement(call);
    let Some(Classification::Legacy(mut module)) =
        classify(arena, statement, ComponentStrategy::LegacyDefaults)
    else {
        panic!("expected a legacy module");
    };
    module.build_invocation(arena);
    module
}

/// Rewrite `source` with one rule and print the result.
fn rewrite(source: &str, rule: fn(&mut NodeArena, NodeIndex) -> usize) -> (String, usize) {
    let (mut arena, root) = parse(source);
    let count = rule(&mut arena, root);
    (print(&arena, root), count)
}

#[test]
fn static_strings_fold_literal_concatenation() {
    let (arena, root) = parse("x('a' + `b` + 'c');\ny('a' + b);\n");
    let calls = find_all_of_kind(&arena, root, NodeKind::CallExpression);
    let argument = |call: NodeIndex| arena.get_call_expr(call).unwrap().arguments.first().unwrap();
    assert_eq!(static_string(&arena, argument(calls[0])).as_deref(), Some("abc"));
    assert_eq!(static_string(&arena, argument(calls[1])), None);
}

#[test]
fn container_lookups_go_through_the_owner() {
    let (code, count) = rewrite("this.container.lookup('service:foo');\n", rewrite_lookup_calls);
    assert_eq!(code, "this.owner.lookup('service:foo');\n");
    assert_eq!(count, 1);
}

#[test]
fn registrations_go_through_the_owner() {
    let (code, count) = rewrite(
        "this.registry.register('service:a', A);\nthis.register('service:b', B);\n",
        rewrite_register_calls,
    );
    assert_eq!(
        code,
        "this.owner.register('service:a', A);\nthis.owner.register('service:b', B);\n"
    );
    assert_eq!(count, 2);
}

#[test]
fn owner_calls_are_left_alone() {
    let source = "this.owner.lookup('service:foo');\nthis.owner.register('a', b);\n";
    assert_eq!(rewrite(source, rewrite_lookup_calls), (source.to_string(), 0));
    assert_eq!(rewrite(source, rewrite_register_calls), (source.to_string(), 0));
}

#[test]
fn injections_become_owner_lookups() {
    let (code, count) = rewrite(
        "this.inject.service('foo');\nthis.inject.controller('foo', { as: 'bar' });\nthis.inject.service('foo-bar');\n",
        rewrite_inject_calls,
    );
    assert_eq!(
        code,
        "this.foo = this.owner.lookup('service:foo');\n\
         this.bar = this.owner.lookup('controller:foo');\n\
         this['foo-bar'] = this.owner.lookup('service:foo-bar');\n"
    );
    assert_eq!(count, 3);
}

#[test]
fn injections_with_dynamic_names_are_left_alone() {
    let source = "this.inject.service(name);\n";
    assert_eq!(rewrite(source, rewrite_inject_calls), (source.to_string(), 0));
}

#[test]
fn action_registrations_install_the_send_dispatcher() {
    let (mut arena, root) = parse("this.on('save', function(x) { saved = x; });\nthis.on('save-all', go);\n");
    let mut module = unit_module(&mut arena);

    let count = rewrite_action_calls(&mut arena, root, &mut module);
    assert_eq!(count, 2);
    assert!(module.has_send_dispatcher());
    assert_eq!(
        print(&arena, root),
        "this.actions.save = function(x) {\n  saved = x;\n};\nthis.actions['save-all'] = go;\n"
    );
}

#[test]
fn without_actions_no_dispatcher_is_installed() {
    let (mut arena, root) = parse("this.set('a', 1);\n");
    let mut module = unit_module(&mut arena);
    assert_eq!(rewrite_action_calls(&mut arena, root, &mut module), 0);
    assert!(!module.has_send_dispatcher());
}

#[test]
fn get_owner_is_rewritten_only_in_its_own_scope() {
    let (mut arena, root) = parse(
        "test('a', function() {\n\
         \x20 let owner = getOwner(this);\n\
         \x20 let other = Ember.getOwner();\n\
         \x20 run(function() { getOwner(this); });\n\
         });\n",
    );
    let callback = find_all_of_kind(&arena, root, NodeKind::FunctionExpression)[0];

    let count = rewrite_get_owner_calls(&mut arena, root, callback);
    assert_eq!(count, 2);
    assert_eq!(
        print(&arena, root),
        "test('a', function() {\n\
         \x20 let owner = this.owner;\n\
         \x20 let other = this.owner;\n\
         \x20 run(function() {\n\
         \x20   getOwner(this);\n\
         \x20 });\n\
         });\n"
    );
}

#[test]
fn rules_are_idempotent() {
    let source = "test('a', function() {\n\
                  \x20 this.container.lookup('a:b');\n\
                  \x20 this.inject.service('store');\n\
                  \x20 this.on('go', go);\n\
                  \x20 getOwner(this);\n\
                  });\n";
    let (mut arena, root) = parse(source);
    let mut module = unit_module(&mut arena);
    let callback = find_all_of_kind(&arena, root, NodeKind::FunctionExpression)[0];

    let first = apply_call_site_rules(&mut arena, root, &mut module, Some(callback));
    assert_eq!(first, 4);
    let once = print(&arena, root);
    let second = apply_call_site_rules(&mut arena, root, &mut module, Some(callback));
    assert_eq!(second, 0);
    assert_eq!(print(&arena, root), once);
}
