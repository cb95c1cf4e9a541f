//! Properties every migration has to keep: idempotence, one import
//! declaration per source with sorted bindings, and option order.
use qunitmod_codemod::imports::{import_source, named_imports};
use qunitmod_codemod::{CodemodConfig, transform_source};
use qunitmod_parser::ParserState;
use qunitmod_parser::parser::NodeKind;

const INPUTS: &[&str] = &[
    "import { moduleFor, test } from 'ember-qunit';

moduleFor('service:foo', 'Unit | Service | foo', {
  needs: ['service:bar'],
  beforeEach() {
    this.container.lookup('service:bar');
  }
});

test('it exists', function(assert) {
  let service = this.subject();
  this.inject.service('bar', { as: 'baz' });
  assert.ok(service);
});
",
    "import { moduleForComponent, test, skip } from 'ember-qunit';
import { test } from 'qunit';
import hbs from 'htmlbars-inline-precompile';
import wait from 'ember-test-helpers/wait';

moduleForComponent('x-foo', 'Integration | Component | x-foo', {
  integration: true,
  setupStuff() {
    return 1;
  }
});

test('it renders', function(assert) {
  this.on('go', () => {});
  this.render(hbs`{{x-foo go=(action 'go')}}`);
  return wait();
});

skip('clears', function(assert) {
  this.clearRender();
});
",
    "import { moduleForModel, test } from 'ember-qunit';

moduleForModel('post', 'Unit | Model | post', { needs: [] });

test('creates', function(assert) {
  let post = this.subject({ title: 'x' });
  assert.ok(post);
});

moduleForModel('comment', 'Unit | Model | comment');

test('creates', function(assert) {
  assert.ok(this.subject());
});
",
    "import { module, test } from 'qunit';

module('plain', {
  before() {},
  beforeEach() {},
  afterEach() {},
  after() {}
});

test('a', function(assert) {
  assert.ok(getOwner(this));
});
",
    "import { moduleFor, test } from 'ember-qunit';
import { setupTest } from 'ember-qunit';

moduleFor('service:foo', 'Unit | Service | foo');

test('it exists', function(assert) {
  assert.ok(this.subject());
});
",
    "import { moduleForComponent, moduleForModel, test } from 'ember-qunit';
import hbs from 'htmlbars-inline-precompile';

moduleForComponent('x-foo', 'Integration | Component | x-foo', { integration: true });

test('it renders', function(assert) {
  this.render(hbs`{{x-foo}}`);
});

moduleForModel('post', 'Unit | Model | post');

test('creates', function(assert) {
  assert.ok(this.subject({ title: 'x' }));
});
",
];

fn migrate(source: &str) -> String {
    match transform_source(source, &CodemodConfig::default()) {
        Ok(output) => output.code,
        Err(err) => panic!("transform failed: {err:#}"),
    }
}

#[test]
fn migrating_twice_changes_nothing() {
    for input in INPUTS {
        let once = migrate(input);
        let output = transform_source(&once, &CodemodConfig::default()).unwrap();
        assert!(!output.changed, "second run changed:\n{once}\n---\n{}", output.code);
        assert_eq!(output.code, once);
    }
}

#[test]
fn each_source_is_imported_once_with_sorted_bindings() {
    for input in INPUTS {
        let code = migrate(input);
        let mut parser = ParserState::new("out.js".to_string(), code.clone());
        let root = parser.parse_source_file();
        assert!(parser.get_diagnostics().is_empty(), "output does not parse:\n{code}");
        let arena = parser.into_arena();

        let mut seen: Vec<String> = Vec::new();
        for statement in arena.statement_list(root).unwrap().iter() {
            if !arena.is_kind(statement, NodeKind::ImportDeclaration) {
                continue;
            }
            let has_named_clause = arena
                .get_import_decl(statement)
                .is_some_and(|import| import.named_bindings.is_some());
            if !has_named_clause {
                continue;
            }
            let source = import_source(&arena, statement).unwrap().to_string();
            assert!(!seen.contains(&source), "duplicate import of '{source}':\n{code}");
            seen.push(source);

            let names = named_imports(&arena, statement);
            assert!(
                names.windows(2).all(|pair| pair[0] < pair[1]),
                "unsorted bindings {names:?}:\n{code}"
            );
        }
    }
}

#[test]
fn helpers_used_by_rewritten_calls_are_imported() {
    let code = migrate(INPUTS[5]);
    assert!(code.contains("await render(hbs`{{x-foo}}`);"), "{code}");
    assert!(code.contains("import { render } from 'ember-test-helpers';"), "{code}");
    assert!(code.contains("run(() => this.owner.lookup('service:store')"), "{code}");
    assert!(code.contains("import { run } from '@ember/runloop';"), "{code}");
}

#[test]
fn lifecycle_hooks_keep_their_relative_order() {
    let code = migrate(INPUTS[3]);
    let order: Vec<usize> = ["hooks.before(", "hooks.beforeEach(", "hooks.afterEach(", "hooks.after("]
        .iter()
        .map(|hook| code.find(hook).unwrap_or_else(|| panic!("missing {hook}:\n{code}")))
        .collect();
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]), "{code}");
}

#[test]
fn legacy_test_imports_are_consolidated_into_qunit() {
    let code = migrate(INPUTS[1]);
    assert!(code.contains("import { module, skip, test } from 'qunit';"), "{code}");
    assert!(code.contains("import { setupRenderingTest } from 'ember-qunit';"), "{code}");
    assert!(code.contains("import { clearRender, render, settled } from 'ember-test-helpers';"), "{code}");
    assert!(!code.contains("ember-test-helpers/wait"), "{code}");
}
