//! Tests for statement parsing in the parser.
use crate::parser::node::{NodeData, VariableKind};
use crate::parser::{NodeIndex, NodeKind, ParserState};

fn parse_source(source: &str) -> (ParserState, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    (parser, root)
}

fn statement_kinds(parser: &ParserState, root: NodeIndex) -> Vec<NodeKind> {
    let arena = parser.get_arena();
    arena
        .get_source_file(root)
        .unwrap()
        .statements
        .iter()
        .map(|s| arena.kind(s).unwrap())
        .collect()
}

#[test]
fn parse_legacy_test_module_file() {
    let source = "import { moduleFor, test } from 'ember-qunit';\n\
                  \n\
                  moduleFor('service:foo', 'Unit | Service | Foo', {\n\
                  \x20 beforeEach() {\n\
                  \x20   this.x = 1;\n\
                  \x20 }\n\
                  });\n\
                  \n\
                  test('it exists', function(assert) {\n\
                  \x20 assert.ok(this.subject());\n\
                  });\n";
    let (parser, root) = parse_source(source);
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    assert_eq!(
        statement_kinds(&parser, root),
        vec![
            NodeKind::ImportDeclaration,
            NodeKind::ExpressionStatement,
            NodeKind::ExpressionStatement,
        ]
    );
}

#[test]
fn parse_import_forms() {
    let (parser, root) = parse_source(
        "import a from 'a';\nimport * as b from 'b';\nimport c, { d, e as f } from 'c';\nimport 'side';\nimport {} from 'empty';",
    );
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let statements = arena.get_source_file(root).unwrap().statements.clone();
    assert_eq!(statements.len(), 5);

    let first = arena.get_import_decl(statements.nodes[0]).unwrap();
    assert_eq!(arena.identifier_text(first.default_binding), Some("a"));
    assert!(first.named_bindings.is_none());

    let second = arena.get_import_decl(statements.nodes[1]).unwrap();
    assert_eq!(arena.identifier_text(second.namespace_binding), Some("b"));

    let third = arena.get_import_decl(statements.nodes[2]).unwrap();
    let named = third.named_bindings.as_ref().unwrap();
    assert_eq!(named.len(), 2);
    let renamed = arena.get_import_specifier(named.nodes[1]).unwrap();
    assert_eq!(arena.identifier_text(renamed.property_name), Some("e"));
    assert_eq!(arena.identifier_text(renamed.name), Some("f"));

    let fourth = arena.get_import_decl(statements.nodes[3]).unwrap();
    assert!(fourth.is_side_effect_only());
    assert_eq!(arena.string_literal_value(fourth.module_specifier), Some("side"));

    let fifth = arena.get_import_decl(statements.nodes[4]).unwrap();
    assert!(fifth.named_bindings.as_ref().is_some_and(|n| n.is_empty()));
}

#[test]
fn parse_variable_kinds_and_asi() {
    let (parser, root) = parse_source("let a = 1\nconst b = 2\nvar c\nlet { d } = e");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let kinds: Vec<VariableKind> = arena
        .get_source_file(root)
        .unwrap()
        .statements
        .iter()
        .map(|s| arena.get_variable_statement(s).unwrap().kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            VariableKind::Let,
            VariableKind::Const,
            VariableKind::Var,
            VariableKind::Let
        ]
    );
}

#[test]
fn parse_control_flow_statements() {
    let source = "if (a) { b(); } else c();\n\
                  for (let i = 0; i < 3; i++) {}\n\
                  for (const k in o) {}\n\
                  for await (const v of list) {}\n\
                  while (x) break;\n\
                  do { continue; } while (y);\n\
                  try { t(); } catch (e) { } finally { f(); }\n\
                  switch (s) { case 1: one(); break; default: other(); }\n\
                  label: for (;;) { break label; }\n\
                  throw new Error('x');\n";
    let (parser, root) = parse_source(source);
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    assert_eq!(
        statement_kinds(&parser, root),
        vec![
            NodeKind::IfStatement,
            NodeKind::ForStatement,
            NodeKind::ForInStatement,
            NodeKind::ForOfStatement,
            NodeKind::WhileStatement,
            NodeKind::DoStatement,
            NodeKind::TryStatement,
            NodeKind::SwitchStatement,
            NodeKind::LabeledStatement,
            NodeKind::ThrowStatement,
        ]
    );
}

#[test]
fn parse_class_with_members() {
    let source = "export default class Foo extends Bar {\n\
                  \x20 static x = 1;\n\
                  \x20 #secret;\n\
                  \x20 get value() { return 1; }\n\
                  \x20 async load() { await this.fetch(); }\n\
                  \x20 static { init(); }\n\
                  }\n";
    let (parser, root) = parse_source(source);
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    let arena = parser.get_arena();
    let statement = arena.get_source_file(root).unwrap().statements.nodes[0];
    let Some(NodeData::Export(export)) = arena.data(statement) else {
        panic!("expected export");
    };
    assert!(export.is_default);
    let class = arena.get_class(export.declaration).unwrap();
    assert_eq!(class.members.len(), 5);
}

#[test]
fn parse_export_forms() {
    let (parser, root) = parse_source(
        "export { a, b as c };\nexport * from 'x';\nexport * as ns from 'y';\nexport const d = 1;\nexport function e() {}",
    );
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    assert_eq!(statement_kinds(&parser, root).len(), 5);
}

#[test]
fn parse_statement_recovery_on_malformed_input() {
    let (parser, root) = parse_source("const x = 1\nconst y = ;\nconst z = 3;");
    let arena = parser.get_arena();
    assert!(arena.get_source_file(root).unwrap().statements.len() >= 2);
    assert!(!parser.get_diagnostics().is_empty());
}

#[test]
fn missing_semicolon_on_same_line_is_an_error() {
    let (parser, _root) = parse_source("a b");
    assert!(!parser.get_diagnostics().is_empty());
}

#[test]
fn deep_nesting_reports_diagnostic_instead_of_overflowing() {
    // Debug-build frames are large; give the parser room to reach the limit.
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let source = format!("x = {}1{};", "(".repeat(2000), ")".repeat(2000));
            let (parser, _root) = parse_source(&source);
            parser.get_diagnostics().iter().any(|d| {
                d.code
                    == qunitmod_common::diagnostics::diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED
            })
        })
        .unwrap();
    assert!(handle.join().unwrap());
}

#[test]
fn statement_comments_and_blank_lines_are_attached() {
    let source = "a();\n\n// leading\nb(); // trailing\nc();\n";
    let (parser, root) = parse_source(source);
    let arena = parser.get_arena();
    let statements = arena.get_source_file(root).unwrap().statements.clone();
    let b = statements.nodes[1];
    assert_eq!(arena.leading_comments(b).len(), 1);
    assert_eq!(arena.leading_comments(b)[0].text, "// leading");
    assert_eq!(arena.trailing_comments(b).len(), 1);
    assert_eq!(arena.trailing_comments(b)[0].text, "// trailing");
    assert!(arena.has_blank_line_before(b));
    assert!(!arena.has_blank_line_before(statements.nodes[2]));
    assert!(arena.leading_comments(statements.nodes[2]).is_empty());
}

#[test]
fn comments_before_closing_brace_are_dangling() {
    let source = "function f() {\n  a();\n  // done\n}\n";
    let (parser, root) = parse_source(source);
    let arena = parser.get_arena();
    let func = arena.get_source_file(root).unwrap().statements.nodes[0];
    let body = arena.get_function(func).unwrap().body;
    assert_eq!(arena.dangling_comments(body).len(), 1);
    assert_eq!(arena.dangling_comments(body)[0].text, "// done");
}
