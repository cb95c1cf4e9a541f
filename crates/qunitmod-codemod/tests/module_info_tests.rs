//! Tests for legacy module classification.
use crate::config::ComponentStrategy;
use crate::module_info::{
    Classification, ModuleDescriptor, ModuleKind, SetupStrategy, TestDescriptor, classify,
    spans_multiple_lines,
};
use qunitmod_parser::{NodeArena, NodeIndex, ParserState};

fn parse(source: &str) -> (NodeArena, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty());
    (parser.into_arena(), root)
}

fn first_statement(arena: &NodeArena, root: NodeIndex) -> NodeIndex {
    arena.statement_list(root).and_then(|list| list.first()).unwrap()
}

fn classify_with(source: &str, strategy: ComponentStrategy) -> Option<Classification> {
    let (arena, root) = parse(source);
    classify(&arena, first_statement(&arena, root), strategy)
}

fn legacy(source: &str) -> ModuleDescriptor {
    match classify_with(source, ComponentStrategy::LegacyDefaults) {
        Some(Classification::Legacy(module)) => module,
        other => panic!("expected a legacy module, got {other:?}"),
    }
}

fn unrecognized(source: &str) -> &'static str {
    match classify_with(source, ComponentStrategy::LegacyDefaults) {
        Some(Classification::Unrecognized(reason)) => reason,
        other => panic!("expected an unrecognized module, got {other:?}"),
    }
}

#[test]
fn module_for_is_a_unit_test_with_its_container_key() {
    let module = legacy("moduleFor('service:foo', 'Unit | Service | foo');");
    assert_eq!(module.kind, ModuleKind::ForGeneric);
    assert_eq!(module.setup, SetupStrategy::SetupTest);
    assert_eq!(module.subject_key.as_deref(), Some("service:foo"));
    assert!(module.options.is_none());
}

#[test]
fn module_for_model_keys_the_model() {
    let module = legacy("moduleForModel('user', 'Unit | Model | user', { needs: [] });");
    assert_eq!(module.kind, ModuleKind::ForModel);
    assert_eq!(module.setup, SetupStrategy::SetupTest);
    assert_eq!(module.subject_key.as_deref(), Some("model:user"));
    assert!(module.options.is_some());
}

#[test]
fn component_modules_render_by_default() {
    let module = legacy("moduleForComponent('x-foo', { integration: true });");
    assert_eq!(module.setup, SetupStrategy::SetupRenderingTest);
    assert!(module.subject_key.is_none());

    let module = legacy("moduleForComponent('x-foo', 'Integration | x-foo');");
    assert_eq!(module.setup, SetupStrategy::SetupRenderingTest);
}

#[test]
fn component_modules_with_unit_or_needs_are_unit_tests() {
    let module = legacy("moduleForComponent('x-foo', { unit: true });");
    assert_eq!(module.setup, SetupStrategy::SetupTest);
    assert_eq!(module.subject_key.as_deref(), Some("component:x-foo"));

    let module = legacy("moduleForComponent('x-foo', { needs: ['service:a'] });");
    assert_eq!(module.setup, SetupStrategy::SetupTest);
}

#[test]
fn integration_flag_strategy_requires_the_flag() {
    let classification = classify_with("moduleForComponent('x-foo', 'X');", ComponentStrategy::IntegrationFlag);
    let Some(Classification::Legacy(module)) = classification else {
        panic!("expected a legacy module");
    };
    assert_eq!(module.setup, SetupStrategy::SetupTest);
}

#[test]
fn plain_module_has_no_setup() {
    let module = legacy("module('Unit | foo', { beforeEach() {} });");
    assert_eq!(module.kind, ModuleKind::Plain);
    assert_eq!(module.setup, SetupStrategy::None);
    assert!(module.subject_key.is_none());
}

#[test]
fn custom_subject_is_detected() {
    let module = legacy("moduleFor('service:foo', 'foo', { subject() { return 1; } });");
    assert!(module.has_custom_subject);
}

#[test]
fn nested_modules_are_recognized() {
    let classification = classify_with(
        "module('foo', function(hooks) { setupTest(hooks); });",
        ComponentStrategy::LegacyDefaults,
    );
    assert!(matches!(classification, Some(Classification::Nested)));

    let classification = classify_with("module('foo', () => {});", ComponentStrategy::LegacyDefaults);
    assert!(matches!(classification, Some(Classification::Nested)));
}

#[test]
fn odd_shapes_are_unrecognized() {
    assert_eq!(unrecognized("moduleFor();"), "missing module name");
    assert_eq!(unrecognized("moduleFor(key, 'name');"), "container key is not a string");
    assert_eq!(unrecognized("moduleForModel(name);"), "model name is not a string");
    assert_eq!(unrecognized("module('a', withMoar(tests));"), "second argument is not a callback");
    assert_eq!(unrecognized("moduleFor('a', 'b', c, d);"), "unexpected extra arguments");
    assert_eq!(
        unrecognized("moduleFor('a', 'b', { ...shared });"),
        "spread in module options"
    );
    assert_eq!(
        unrecognized("moduleFor('a', 'b', { get x() { return 1; } });"),
        "accessor in module options"
    );
}

#[test]
fn other_statements_are_not_modules() {
    assert!(classify_with("test('a', function() {});", ComponentStrategy::LegacyDefaults).is_none());
    assert!(classify_with("var moduleFor = 1;", ComponentStrategy::LegacyDefaults).is_none());
    assert!(classify_with("this.moduleFor('a');", ComponentStrategy::LegacyDefaults).is_none());
}

#[test]
fn test_descriptors_cover_test_skip_and_todo() {
    let (arena, root) = parse(
        "test('a', function() {});\nskip('b', async function() {});\ntodo('c', async () => {});\nfoo('d', function() {});\n",
    );
    let statements = arena.statement_list(root).unwrap().nodes.clone();
    let tests: Vec<Option<bool>> = statements
        .iter()
        .map(|&statement| TestDescriptor::from_statement(&arena, statement).map(|test| test.is_async))
        .collect();
    assert_eq!(tests, vec![Some(false), Some(true), Some(true), None]);
}

#[test]
fn test_without_callback_has_no_scope() {
    let (arena, root) = parse("test('a');\n");
    let test = TestDescriptor::from_statement(&arena, first_statement(&arena, root)).unwrap();
    assert!(test.callback.is_none());
    assert!(!test.is_async);
}

#[test]
fn multi_line_statements_are_detected() {
    let (arena, root) = parse("a();\nb(function() { c(); });\nd({\n  e: 1\n});\nf({ g: 1 });\nh(function() {});\n");
    let statements = arena.statement_list(root).unwrap().nodes.clone();
    let spans: Vec<bool> = statements
        .iter()
        .map(|&statement| spans_multiple_lines(&arena, statement))
        .collect();
    assert_eq!(spans, vec![false, true, true, false, false]);
}

#[test]
fn closing_a_module_splices_the_body_into_the_callback() {
    let (mut arena, root) = parse("moduleFor('service:foo', 'foo');\ntest('a', function() {});\n");
    let statements = arena.statement_list(root).unwrap().nodes.clone();
    let Some(Classification::Legacy(mut module)) =
        classify(&arena, statements[0], ComponentStrategy::LegacyDefaults)
    else {
        panic!("expected a legacy module");
    };

    module.build_invocation(&mut arena);
    module.push_statement(statements[1]);
    let callback = module.close(&mut arena);

    let function = arena.get_function(callback).unwrap();
    assert_eq!(function.parameters.len(), 1);
    let body = arena.statement_list(function.body).unwrap();
    assert_eq!(body.len(), 2);
    assert_eq!(body.get(1), Some(statements[1]));
}

#[test]
fn before_each_is_created_once_after_the_setup_call() {
    let (mut arena, root) = parse("moduleFor('service:foo', 'foo');\n");
    let statement = first_statement(&arena, root);
    let Some(Classification::Legacy(mut module)) =
        classify(&arena, statement, ComponentStrategy::LegacyDefaults)
    else {
        panic!("expected a legacy module");
    };
    module.build_invocation(&mut arena);

    let first = module.ensure_before_each(&mut arena);
    let second = module.ensure_before_each(&mut arena);
    assert_eq!(first, second);
    assert_eq!(module.body().len(), 2);

    module.ensure_send_dispatcher(&mut arena);
    module.ensure_send_dispatcher(&mut arena);
    assert!(module.has_send_dispatcher());
    assert_eq!(arena.statement_list(first).unwrap().len(), 2);
}
