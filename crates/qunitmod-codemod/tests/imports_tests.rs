//! Tests for the import registry.
use crate::imports::{
    ImportRegistry, InsertPosition, default_import_name, find_imports, named_imports,
};
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

#[test]
fn ensure_import_returns_existing_declaration() {
    let (mut arena, root) = parse("import { module } from 'qunit';\nfoo();\n");
    let mut imports = ImportRegistry::new();
    let existing = find_imports(&arena, root, "qunit")[0];

    let found = imports.ensure_import(&mut arena, root, "qunit", None, InsertPosition::After);
    assert_eq!(found, existing);
    assert_eq!(imports.edits(), 0);
}

#[test]
fn ensure_specifiers_merges_sorted_and_unique() {
    let (mut arena, root) = parse("import { test, module } from 'qunit';\n");
    let mut imports = ImportRegistry::new();

    let declaration =
        imports.ensure_specifiers(&mut arena, root, "qunit", &["skip", "module"], None, InsertPosition::After);
    assert_eq!(named_imports(&arena, declaration), vec!["module", "skip", "test"]);
    assert_eq!(imports.edits(), 1);
}

#[test]
fn merging_names_already_present_is_not_an_edit() {
    let (mut arena, root) = parse("import { module, test } from 'qunit';\n");
    let mut imports = ImportRegistry::new();

    imports.ensure_specifiers(&mut arena, root, "qunit", &["test"], None, InsertPosition::After);
    assert_eq!(imports.edits(), 0);
}

#[test]
fn new_declaration_goes_before_anchor() {
    let (mut arena, root) = parse("import Ember from 'ember';\nimport { moduleFor } from 'ember-qunit';\n");
    let mut imports = ImportRegistry::new();

    imports.ensure_specifiers(
        &mut arena,
        root,
        "qunit",
        &["module"],
        Some("ember-qunit"),
        InsertPosition::Before,
    );
    assert_eq!(
        print(&arena, root),
        "import Ember from 'ember';\n\
         import { module } from 'qunit';\n\
         import { moduleFor } from 'ember-qunit';\n"
    );
}

#[test]
fn new_declaration_goes_after_anchor() {
    let (mut arena, root) =
        parse("import { setupRenderingTest } from 'ember-qunit';\nimport hbs from 'htmlbars-inline-precompile';\n");
    let mut imports = ImportRegistry::new();

    imports.ensure_specifiers(
        &mut arena,
        root,
        "ember-test-helpers",
        &["render"],
        Some("ember-qunit"),
        InsertPosition::After,
    );
    assert_eq!(
        print(&arena, root),
        "import { setupRenderingTest } from 'ember-qunit';\n\
         import { render } from 'ember-test-helpers';\n\
         import hbs from 'htmlbars-inline-precompile';\n"
    );
}

#[test]
fn without_anchor_new_declaration_follows_last_import() {
    let (mut arena, root) = parse("import a from 'a';\n\nfoo();\n");
    let mut imports = ImportRegistry::new();

    imports.ensure_specifiers(&mut arena, root, "@ember/runloop", &["run"], None, InsertPosition::After);
    assert_eq!(
        print(&arena, root),
        "import a from 'a';\nimport { run } from '@ember/runloop';\n\nfoo();\n"
    );
}

#[test]
fn without_any_import_new_declaration_is_first() {
    let (mut arena, root) = parse("foo();\n");
    let mut imports = ImportRegistry::new();

    imports.ensure_specifiers(&mut arena, root, "qunit", &["module"], None, InsertPosition::After);
    let first = arena.statement_list(root).and_then(|list| list.first()).unwrap();
    assert_eq!(named_imports(&arena, first), vec!["module"]);
}

#[test]
fn duplicate_declarations_are_folded_into_the_first() {
    let (mut arena, root) = parse(
        "import { test } from 'qunit';\n\
         import Ember from 'ember';\n\
         import { module, test as t } from 'qunit';\n",
    );
    let mut imports = ImportRegistry::new();

    let declaration = imports.ensure_import(&mut arena, root, "qunit", None, InsertPosition::After);
    assert_eq!(find_imports(&arena, root, "qunit"), vec![declaration]);
    assert_eq!(named_imports(&arena, declaration), vec!["module", "test"]);
    imports.assert_unique(&arena, root);
}

#[test]
fn folding_keeps_a_default_binding() {
    let (mut arena, root) = parse("import { a } from 'x';\nimport x from 'x';\n");
    let mut imports = ImportRegistry::new();

    let declaration = imports.ensure_import(&mut arena, root, "x", None, InsertPosition::After);
    assert_eq!(default_import_name(&arena, declaration), Some("x"));
    assert_eq!(find_imports(&arena, root, "x").len(), 1);
}

#[test]
fn namespace_imports_are_not_merged_into() {
    let (mut arena, root) = parse("import * as qunit from 'qunit';\n");
    let mut imports = ImportRegistry::new();

    imports.ensure_specifiers(&mut arena, root, "qunit", &["module"], None, InsertPosition::After);
    assert_eq!(find_imports(&arena, root, "qunit").len(), 2);
    imports.assert_unique(&arena, root);
}

#[test]
fn remove_import_moves_spacing_and_comments_to_next_statement() {
    let (mut arena, root) = parse("import a from 'a';\n\n// wait\nimport wait from 'wait';\nfoo();\n");
    let mut imports = ImportRegistry::new();

    let declaration = find_imports(&arena, root, "wait")[0];
    imports.remove_import(&mut arena, root, declaration);
    assert_eq!(print(&arena, root), "import a from 'a';\n\n// wait\nfoo();\n");
    assert_eq!(imports.edits(), 1);
}

#[test]
#[should_panic(expected = "declarations for 'qunit'")]
fn assert_unique_rejects_duplicates() {
    let (mut arena, root) = parse("import { module } from 'qunit';\n");
    let mut imports = ImportRegistry::new();
    imports.ensure_import(&mut arena, root, "qunit", None, InsertPosition::After);

    let duplicate = arena.create_import_declaration(Vec::new(), "qunit");
    imports.merge_specifiers(&mut arena, duplicate, &["test"]);
    qunitmod_parser::query::insert_statement(&mut arena, root, 1, duplicate);
    imports.assert_unique(&arena, root);
}
