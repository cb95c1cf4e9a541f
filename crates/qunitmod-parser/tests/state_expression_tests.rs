//! Tests for expression parsing in the parser.
use crate::parser::node::{FunctionFlavor, NodeData, PropertyKind};
use crate::parser::{NodeArena, NodeIndex, NodeKind, ParserState};
use qunitmod_scanner::SyntaxKind;

/// Parse `source` as a single expression statement and return its expression.
fn parse_expression(source: &str) -> (NodeArena, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        parser.get_diagnostics()
    );
    let arena = parser.into_arena();
    let statement = arena.get_source_file(root).unwrap().statements.nodes[0];
    let expression = arena.get_expression_statement(statement).unwrap().expression;
    (arena, expression)
}

#[test]
fn binary_precedence_and_associativity() {
    let (arena, expr) = parse_expression("a + b * c - d;");
    let outer = arena.get_binary_expr(expr).unwrap();
    assert_eq!(outer.operator_token, SyntaxKind::MinusToken);
    let left = arena.get_binary_expr(outer.left).unwrap();
    assert_eq!(left.operator_token, SyntaxKind::PlusToken);
    let product = arena.get_binary_expr(left.right).unwrap();
    assert_eq!(product.operator_token, SyntaxKind::AsteriskToken);

    let (arena, expr) = parse_expression("a ** b ** c;");
    let outer = arena.get_binary_expr(expr).unwrap();
    assert_eq!(arena.identifier_text(outer.left), Some("a"));
    assert!(arena.get_binary_expr(outer.right).is_some());
}

#[test]
fn assignment_is_right_associative() {
    let (arena, expr) = parse_expression("a = b = c;");
    let outer = arena.get_binary_expr(expr).unwrap();
    assert_eq!(outer.operator_token, SyntaxKind::EqualsToken);
    assert_eq!(arena.identifier_text(outer.left), Some("a"));
    assert_eq!(
        arena.get_binary_expr(outer.right).unwrap().operator_token,
        SyntaxKind::EqualsToken
    );
}

#[test]
fn member_calls_and_optional_chains() {
    let (arena, expr) = parse_expression("this.owner.lookup('service:foo')?.bar?.[0]?.();");
    let call = arena.get_call_expr(expr).unwrap();
    assert!(call.question_dot);
    assert_eq!(arena.kind(call.expression), Some(NodeKind::ElementAccessExpression));
}

#[test]
fn arrow_functions() {
    let (arena, expr) = parse_expression("(a, ...rest) => a;");
    let func = arena.get_function(expr).unwrap();
    assert_eq!(func.flavor, FunctionFlavor::Arrow);
    assert_eq!(func.parameters.len(), 2);
    assert_eq!(arena.kind(func.parameters.nodes[1]), Some(NodeKind::SpreadElement));
    assert_eq!(arena.identifier_text(func.body), Some("a"));

    let (arena, expr) = parse_expression("async x => { await x; };");
    let func = arena.get_function(expr).unwrap();
    assert!(func.is_async);
    assert!(!func.parenthesized_params);
    assert_eq!(arena.kind(func.body), Some(NodeKind::Block));
}

#[test]
fn parenthesized_expression_is_not_an_arrow() {
    let (arena, expr) = parse_expression("(a, b);");
    assert_eq!(arena.kind(expr), Some(NodeKind::ParenthesizedExpression));
}

#[test]
fn object_literal_property_kinds() {
    let (arena, expr) = parse_expression(
        "({ a: 1, b, 'c-d': 2, [e]: 3, f() {}, get g() { return 1; }, async h() {}, ...rest });",
    );
    let Some(NodeData::Parenthesized(inner)) = arena.data(expr) else {
        panic!("expected parentheses");
    };
    let object = arena.get_object_literal(inner.expression).unwrap();
    let kinds: Vec<Option<PropertyKind>> = object
        .properties
        .iter()
        .map(|p| arena.get_property(p).map(|data| data.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            Some(PropertyKind::Init),
            Some(PropertyKind::Shorthand),
            Some(PropertyKind::Init),
            Some(PropertyKind::Init),
            Some(PropertyKind::Method),
            Some(PropertyKind::Getter),
            Some(PropertyKind::Method),
            None,
        ]
    );
    let computed = arena.get_property(object.properties.nodes[3]).unwrap();
    assert!(computed.computed);
    let method = arena.get_property(object.properties.nodes[6]).unwrap();
    assert!(arena.get_function(method.initializer).unwrap().is_async);
}

#[test]
fn object_literal_records_multi_line_and_blank_lines() {
    let (arena, expr) = parse_expression("x = {\n  a: 1,\n\n  b: 2 // two\n};");
    let object_index = arena.get_binary_expr(expr).unwrap().right;
    let object = arena.get_object_literal(object_index).unwrap();
    assert!(object.multi_line);
    let b = object.properties.nodes[1];
    assert!(arena.has_blank_line_before(b));
    assert_eq!(arena.trailing_comments(b)[0].text, "// two");
}

#[test]
fn template_literals() {
    let (arena, expr) = parse_expression("hbs`{{foo-bar x=${y}}} and ${z}`;");
    let Some(NodeData::TaggedTemplate(tagged)) = arena.data(expr) else {
        panic!("expected tagged template");
    };
    let Some(NodeData::Template(template)) = arena.data(tagged.template) else {
        panic!("expected template");
    };
    assert_eq!(template.quasis, vec!["{{foo-bar x=", "}} and ", ""]);
    assert_eq!(template.expressions.len(), 2);
}

#[test]
fn await_is_contextual() {
    let (arena, expr) = parse_expression("await render();");
    assert_eq!(arena.kind(expr), Some(NodeKind::AwaitExpression));

    let mut parser = ParserState::new(
        "test.js".to_string(),
        "function f() { var await = 1; }".to_string(),
    );
    parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty());
}

#[test]
fn new_expressions() {
    let (arena, expr) = parse_expression("new Foo.Bar(1);");
    let Some(NodeData::New(new_expr)) = arena.data(expr) else {
        panic!("expected new");
    };
    assert_eq!(new_expr.arguments.len(), 1);
    assert_eq!(arena.kind(new_expr.expression), Some(NodeKind::PropertyAccessExpression));
}

#[test]
fn string_literals_keep_raw_text() {
    let (arena, expr) = parse_expression("\"it's\";");
    let Some(NodeData::StringLiteral(lit)) = arena.data(expr) else {
        panic!("expected string");
    };
    assert_eq!(lit.text, "it's");
    assert_eq!(lit.raw.as_deref(), Some("\"it's\""));
}

#[test]
fn regex_and_division() {
    let (arena, expr) = parse_expression("x = a / b / /re/g.source.length;");
    let assignment = arena.get_binary_expr(expr).unwrap();
    let division = arena.get_binary_expr(assignment.right).unwrap();
    assert_eq!(division.operator_token, SyntaxKind::SlashToken);
}
