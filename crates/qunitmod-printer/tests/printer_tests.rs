//! Integration tests for the printer.

use qunitmod_parser::ParserState;
use qunitmod_parser::parser::{NodeArena, NodeIndex, NodeKind};
use qunitmod_parser::query::{find_first, relocate, replace};
use qunitmod_printer::{PrintOptions, Printer, QuoteStyle};

fn parse(source: &str) -> (NodeArena, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        parser.get_diagnostics()
    );
    (parser.into_arena(), root)
}

fn print_with(arena: &NodeArena, root: NodeIndex, options: PrintOptions) -> String {
    let mut printer = Printer::new(arena, options);
    printer.print(root);
    printer.finish().code
}

fn reprint(source: &str) -> String {
    let (arena, root) = parse(source);
    print_with(&arena, root, PrintOptions::default())
}

#[test]
fn nested_module_file_prints_unchanged() {
    let source = "import { module, test } from 'qunit';\n\
                  import { setupTest } from 'ember-qunit';\n\
                  \n\
                  module('Unit | Service | Foo', function(hooks) {\n\
                  \x20 setupTest(hooks);\n\
                  \n\
                  \x20 test('it exists', function(assert) {\n\
                  \x20   let service = this.owner.lookup('service:foo');\n\
                  \x20   assert.ok(service);\n\
                  \x20 });\n\
                  });\n";
    assert_eq!(reprint(source), source);
}

#[test]
fn control_flow_prints_unchanged() {
    let source = "if (a) {\n\
                  \x20 b();\n\
                  } else if (c) {\n\
                  \x20 d();\n\
                  } else {\n\
                  \x20 e();\n\
                  }\n\
                  for (let i = 0; i < 3; i++) {\n\
                  \x20 f(i);\n\
                  }\n\
                  for (const key in object) {}\n\
                  try {\n\
                  \x20 risky();\n\
                  } catch (error) {\n\
                  \x20 handle(error);\n\
                  } finally {\n\
                  \x20 cleanup();\n\
                  }\n\
                  switch (kind) {\n\
                  \x20 case 'a':\n\
                  \x20   one();\n\
                  \x20   break;\n\
                  \x20 default:\n\
                  \x20   other();\n\
                  }\n";
    assert_eq!(reprint(source), source);
}

#[test]
fn functions_and_classes_print_in_house_style() {
    let source = "async function load(a, ...rest) {\n\
                  \x20 await a;\n\
                  }\n\
                  let double = x => x * 2;\n\
                  let make = (a, b) => ({ a, b });\n\
                  class Foo extends Bar {\n\
                  \x20 static count = 0;\n\
                  \x20 get value() {\n\
                  \x20   return this._value;\n\
                  \x20 }\n\
                  \x20 async fetch() {}\n\
                  }\n";
    assert_eq!(reprint(source), source);
}

#[test]
fn non_block_bodies_move_to_their_own_line() {
    assert_eq!(reprint("while (x) x--;"), "while (x)\n  x--;\n");
    assert_eq!(reprint("if (a) b(); else c();"), "if (a)\n  b();\nelse\n  c();\n");
}

#[test]
fn string_literals_keep_their_source_quotes() {
    let (arena, root) = parse("foo(\"double\", 'single');");
    let options = PrintOptions {
        quote: QuoteStyle::Double,
        ..PrintOptions::default()
    };
    assert_eq!(print_with(&arena, root, options), "foo(\"double\", 'single');\n");
}

#[test]
fn synthesized_strings_use_the_configured_quote() {
    let mut arena = NodeArena::new();
    let key = arena.create_string_literal("service:foo");
    let owner = arena.create_this_property("owner");
    let lookup = arena.create_method_call(owner, "lookup", vec![key]);

    assert_eq!(
        print_with(&arena, lookup, PrintOptions::default()),
        "this.owner.lookup('service:foo')"
    );
    let options = PrintOptions {
        quote: QuoteStyle::Double,
        ..PrintOptions::default()
    };
    assert_eq!(print_with(&arena, lookup, options), "this.owner.lookup(\"service:foo\")");
}

#[test]
fn wrapping_a_call_in_await() {
    let (mut arena, root) = parse("this.render(hbs`{{foo-bar}}`);");
    let call = find_first(&arena, root, |arena, node| {
        arena.is_kind(node, NodeKind::CallExpression)
    })
    .unwrap();
    let arguments = arena.get_call_expr(call).unwrap().arguments.nodes.clone();
    let render = arena.create_named_call("render", arguments);
    let awaited = arena.create_await(render);
    replace(&mut arena, call, awaited);
    assert_eq!(
        print_with(&arena, root, PrintOptions::default()),
        "await render(hbs`{{foo-bar}}`);\n"
    );
}

#[test]
fn synthesized_structure_gets_parentheses() {
    let (mut arena, root) = parse("render();");
    let call = find_first(&arena, root, |arena, node| {
        arena.is_kind(node, NodeKind::CallExpression)
    })
    .unwrap();
    let moved = relocate(&mut arena, call);
    let awaited = arena.create_await(moved);
    let access = arena.create_property_access(awaited, "then");
    let statement = arena.create_expression_statement(access);
    assert_eq!(
        print_with(&arena, statement, PrintOptions::default()),
        "(await render()).then;"
    );

    let function = arena.create_function_expression(vec![], vec![]);
    let statement = arena.create_expression_statement(function);
    assert_eq!(
        print_with(&arena, statement, PrintOptions::default()),
        "(function() {});"
    );

    let object = arena.create_object_literal(vec![]);
    let arrow = arena.create_arrow_function(vec![], object);
    assert_eq!(print_with(&arena, arrow, PrintOptions::default()), "() => ({})");
}

#[test]
fn synthesized_function_body_is_indented() {
    let mut arena = NodeArena::new();
    let hooks = arena.create_identifier("hooks");
    let setup_argument = arena.create_identifier("hooks");
    let setup = arena.create_named_call("setupTest", vec![setup_argument]);
    let setup_statement = arena.create_expression_statement(setup);
    let callback = arena.create_function_expression(vec![hooks], vec![setup_statement]);
    let name = arena.create_string_literal("Unit | Foo");
    let module = arena.create_named_call("module", vec![name, callback]);
    let statement = arena.create_expression_statement(module);
    assert_eq!(
        print_with(&arena, statement, PrintOptions::default()),
        "module('Unit | Foo', function(hooks) {\n  setupTest(hooks);\n});"
    );
}

#[test]
fn short_objects_stay_on_one_line() {
    assert_eq!(reprint("x = { a: 1, b };"), "x = { a: 1, b };\n");
    assert_eq!(reprint("x = {\n  a: 1\n};"), "x = {\n  a: 1\n};\n");
}

#[test]
fn long_objects_break_one_property_per_line() {
    let source = format!(
        "x = {{ first: '{}', second: '{}', third: '{}' }};",
        "a".repeat(30),
        "b".repeat(30),
        "c".repeat(30)
    );
    let expected = format!(
        "x = {{\n  first: '{}',\n  second: '{}',\n  third: '{}'\n}};\n",
        "a".repeat(30),
        "b".repeat(30),
        "c".repeat(30)
    );
    assert_eq!(reprint(&source), expected);
}

#[test]
fn long_import_clauses_break() {
    let source = "import { aaaaaaaaaaaaaaaaaaaa, bbbbbbbbbbbbbbbbbbbbbbbbb, cccccccccccccccccccccccc, dddddddddddddddddddd } from 'some-module';";
    assert_eq!(
        reprint(source),
        "import {\n  aaaaaaaaaaaaaaaaaaaa,\n  bbbbbbbbbbbbbbbbbbbbbbbbb,\n  cccccccccccccccccccccccc,\n  dddddddddddddddddddd\n} from 'some-module';\n"
    );

    let (arena, root) = parse("import { render, settled } from '@ember/test-helpers';");
    let narrow = PrintOptions {
        wrap_column: 30,
        ..PrintOptions::default()
    };
    assert_eq!(
        print_with(&arena, root, narrow),
        "import {\n  render,\n  settled\n} from '@ember/test-helpers';\n"
    );
}

#[test]
fn import_forms() {
    let source = "import a from 'a';\n\
                  import * as b from 'b';\n\
                  import c, { d, e as f } from 'c';\n\
                  import 'side-effect';\n\
                  import {} from 'empty';\n";
    assert_eq!(reprint(source), source);
}

#[test]
fn export_forms() {
    let source = "export { a, b as c };\n\
                  export * from 'x';\n\
                  export const d = 1;\n\
                  export default function() {}\n";
    assert_eq!(reprint(source), source);
}

#[test]
fn print_options_deserialize_with_defaults() {
    let options: PrintOptions = serde_json::from_str(r#"{ "quote": "double" }"#).unwrap();
    assert_eq!(options.quote, QuoteStyle::Double);
    assert_eq!(options.wrap_column, 100);
    assert_eq!(options.indent_width, 2);

    let options: PrintOptions = serde_json::from_str(r#"{ "wrapColumn": 80, "indentWidth": 4 }"#).unwrap();
    assert_eq!(options.quote, QuoteStyle::Single);
    assert_eq!(options.wrap_column, 80);
    assert_eq!(options.indent_width, 4);
}
