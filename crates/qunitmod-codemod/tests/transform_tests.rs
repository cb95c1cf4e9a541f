//! End-to-end migrations through `transform_source`.
use qunitmod_codemod::{CodemodConfig, TransformOutput, transform_file, transform_source};

fn migrate_with(source: &str, config: &CodemodConfig) -> TransformOutput {
    match transform_source(source, config) {
        Ok(output) => output,
        Err(err) => panic!("transform failed: {err:#}"),
    }
}

fn migrate(source: &str) -> String {
    migrate_with(source, &CodemodConfig::default()).code
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in:\n{haystack}"))
}

// =============================================================================
// Module segmentation
// =============================================================================

#[test]
fn module_for_with_sibling_test_is_nested() {
    let source = "import { moduleFor, test } from 'ember-qunit';

moduleFor('service:foo-bar', 'Unit | Service | FooBar', {});

test('it exists', function(assert) {
  this.inject.service('foo');
});
";
    let expected = "import { module, test } from 'qunit';
import { setupTest } from 'ember-qunit';

module('Unit | Service | FooBar', function(hooks) {
  setupTest(hooks);

  test('it exists', function(assert) {
    this.foo = this.owner.lookup('service:foo');
  });
});
";
    let output = migrate_with(source, &CodemodConfig::default());
    assert_eq!(output.code, expected);
    assert!(output.changed);
    assert_eq!(output.report.modules_rewritten, 1);
    assert_eq!(output.report.statements_moved, 1);
}

#[test]
fn inject_calls_in_several_tests() {
    let source = "import { moduleFor, test } from 'ember-qunit';

moduleFor('service:foo-bar', 'Unit | Service | FooBar', {
});

test('it exists', function(assert) {
  this.inject.service('foo');
  this.inject.service('foo', { as: 'bar' });
});

test('handles dasherized names', function(assert) {
  this.inject.service('foo-bar');
});

test('handle cuted (long) services names', function(assert) {
  this.inject.service('foo-bar-with-a' +
    '-very-long-name');
});
";
    let expected = "import { module, test } from 'qunit';
import { setupTest } from 'ember-qunit';

module('Unit | Service | FooBar', function(hooks) {
  setupTest(hooks);

  test('it exists', function(assert) {
    this.foo = this.owner.lookup('service:foo');
    this.bar = this.owner.lookup('service:foo');
  });

  test('handles dasherized names', function(assert) {
    this['foo-bar'] = this.owner.lookup('service:foo-bar');
  });

  test('handle cuted (long) services names', function(assert) {
    this['foo-bar-with-a-very-long-name'] = this.owner.lookup('service:foo-bar-with-a-very-long-name');
  });
});
";
    assert_eq!(migrate(source), expected);
}

#[test]
fn consecutive_modules_each_collect_their_own_tests() {
    let source = "import { moduleFor, test } from 'ember-qunit';

moduleFor('service:a', 'A');

test('a', function() {});

moduleFor('service:b', 'B');

test('b', function() {});
";
    let code = migrate(source);
    let module_a = position(&code, "module('A'");
    let test_a = position(&code, "test('a'");
    let module_b = position(&code, "module('B'");
    let test_b = position(&code, "test('b'");
    assert!(module_a < test_a && test_a < module_b && module_b < test_b);
    assert_eq!(code.matches("setupTest(hooks);").count(), 2);
}

#[test]
fn nested_module_closes_the_open_module() {
    let source = "import { module, test } from 'qunit';

module('legacy');

test('a', function() {});

module('modern', function() {
  test('b', function() {});
});
";
    let expected = "import { module, test } from 'qunit';

module('legacy', function() {
  test('a', function() {});
});

module('modern', function() {
  test('b', function() {});
});
";
    assert_eq!(migrate(source), expected);
}

#[test]
fn unrecognized_module_calls_are_left_untouched() {
    let source = "import { module, test } from 'qunit';

moduleFor(dynamicKey, 'Name');

test('a', function() {});
";
    let output = migrate_with(source, &CodemodConfig::default());
    assert_eq!(output.code, source);
    assert!(!output.changed);
    assert_eq!(output.report.unrecognized_modules, 1);
}

#[test]
fn statements_before_the_first_module_stay_in_place() {
    let source = "import { module, test } from 'qunit';

const helper = () => 1;

module('thing');

test('a', function() {
  helper();
});
";
    let code = migrate(source);
    assert!(code.contains("const helper = () => 1;\n\nmodule('thing', function() {\n"));
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn lifecycle_hooks_and_custom_fields_keep_their_order() {
    let source = "import { module, test } from 'qunit';

module('Unit | thing', {
  beforeEach() {
    this.a = 1;
  },
  foo: 'bar',
  afterEach: function() {
    teardown();
  },
  'dashed-key': 2,
  integration: true
});

test('a', function(assert) {
  assert.ok(true);
});
";
    let code = migrate(source);
    let custom = position(&code, "this.foo = 'bar';");
    let dashed = position(&code, "this['dashed-key'] = 2;");
    let before_each = position(&code, "hooks.beforeEach(function() {\n    this.a = 1;");
    let after_each = position(&code, "hooks.afterEach(function() {\n    teardown();");
    let test = position(&code, "test('a'");
    assert!(custom < dashed);
    assert!(before_each < after_each && after_each < test);
    assert!(code.contains("module('Unit | thing', function(hooks) {"));
    assert!(!code.contains("integration"));
    assert_eq!(code.matches("hooks.beforeEach").count(), 2);
}

#[test]
fn property_comments_move_with_the_generated_statement() {
    let source = "import { module, test } from 'qunit';

module('thing', {
  // set things up
  beforeEach() {
    setup();
  }
});
";
    let code = migrate(source);
    assert!(code.contains("  // set things up\n  hooks.beforeEach(function() {\n"));
}

#[test]
fn resolver_is_passed_to_the_setup_call() {
    let source = "import { moduleFor, test } from 'ember-qunit';

moduleFor('service:a', 'A', {
  resolver: myResolver
});
";
    let code = migrate(source);
    assert!(code.contains("setupTest(hooks, { resolver: myResolver });"));
}

#[test]
fn get_owner_in_options_is_rewritten_in_the_option_scope_only() {
    let source = "import { moduleFor, test } from 'ember-qunit';

moduleFor('service:a', 'A', {
  beforeEach() {
    let owner = getOwner(this);
    later(() => getOwner(this));
  }
});
";
    let code = migrate(source);
    assert!(code.contains("let owner = this.owner;"));
    assert!(code.contains("later(() => getOwner(this));"));
}

// =============================================================================
// Call sites in tests
// =============================================================================

#[test]
fn container_and_registry_calls_use_the_owner() {
    let source = "import { moduleFor, test } from 'ember-qunit';

moduleFor('route:index', 'Unit | Route | index');

test('a', function(assert) {
  this.register('service:a', A);
  this.registry.register('service:b', B);
  let c = this.container.lookup('service:c');
  let owner = Ember.getOwner(this);
});
";
    let code = migrate(source);
    assert!(code.contains("this.owner.register('service:a', A);"));
    assert!(code.contains("this.owner.register('service:b', B);"));
    assert!(code.contains("let c = this.owner.lookup('service:c');"));
    assert!(code.contains("let owner = this.owner;"));
}

#[test]
fn action_handlers_install_the_dispatcher_once() {
    let source = "import { moduleForComponent, test } from 'ember-qunit';

moduleForComponent('x-foo', 'Integration | x-foo', { integration: true });

test('a', function(assert) {
  this.on('save', function() {});
  this.on('cancel', cancel);
});

test('b', function(assert) {
  this.on('save', save);
});
";
    let code = migrate(source);
    assert!(code.contains("this.actions.save = function() {};"));
    assert!(code.contains("this.actions.cancel = cancel;"));
    assert_eq!(code.matches("this.actions = {};").count(), 1);
    assert_eq!(
        code.matches("this.send = (actionName, ...args) => this.actions[actionName].apply(this, args);")
            .count(),
        1
    );
    assert!(position(&code, "setupRenderingTest(hooks);") < position(&code, "hooks.beforeEach"));
}

// =============================================================================
// Subject resolution
// =============================================================================

#[test]
fn singleton_subject_is_looked_up() {
    let source = "moduleFor('service:foo-bar', 'Unit | Service | foo bar');

test('a', function(assert) {
  let service = this.subject();
});
";
    assert!(migrate(source).contains("let service = this.owner.lookup('service:foo-bar');"));
}

#[test]
fn model_subject_creates_a_record_in_a_run_loop() {
    let source = "import { moduleForModel, test } from 'ember-qunit';

moduleForModel('post', 'Unit | Model | post', { needs: [] });

test('a', function(assert) {
  let model = this.subject({ a: 1 });
});
";
    let code = migrate(source);
    assert!(code.contains(
        "let model = run(() => this.owner.lookup('service:store').createRecord('post', { a: 1 }));"
    ));
    assert!(code.contains("import { run } from '@ember/runloop';"));
}

#[test]
fn component_subject_uses_the_factory() {
    let source = "moduleForComponent('foo-bar', 'Unit | Component | foo bar', { unit: true });

test('a', function(assert) {
  let component = this.subject({ x: 1 });
});
";
    assert!(migrate(source).contains("this.owner.factoryFor('component:foo-bar').create({ x: 1 })"));
}

#[test]
fn custom_subject_is_not_resolved() {
    let source = "moduleFor('service:foo', 'foo', {
  subject() {
    return 1;
  }
});

test('a', function(assert) {
  this.subject();
});
";
    let code = migrate(source);
    assert!(code.contains("this.subject();"));
    assert!(code.contains("this.subject = function() {"));
}

// =============================================================================
// Rendering and wait
// =============================================================================

#[test]
fn render_calls_are_awaited() {
    let source = "import { moduleForComponent, test } from 'ember-qunit';
import hbs from 'htmlbars-inline-precompile';

moduleForComponent('foo-bar', 'Integration | Component | foo bar', {
  integration: true
});

test('it renders', function(assert) {
  this.render(hbs`{{foo-bar}}`);
  assert.equal(this._element.textContent, '');
});
";
    let expected = "import { module, test } from 'qunit';
import { setupRenderingTest } from 'ember-qunit';
import { render } from 'ember-test-helpers';
import hbs from 'htmlbars-inline-precompile';

module('Integration | Component | foo bar', function(hooks) {
  setupRenderingTest(hooks);

  test('it renders', async function(assert) {
    await render(hbs`{{foo-bar}}`);
    assert.equal(this.element.textContent, '');
  });
});
";
    assert_eq!(migrate(source), expected);
}

#[test]
fn clear_render_and_render_share_one_import() {
    let source = "import { moduleForComponent, test } from 'ember-qunit';

moduleForComponent('foo-bar', 'Integration | foo bar', { integration: true });

test('a', function(assert) {
  this.render(tpl);
  this.clearRender();
});
";
    let code = migrate(source);
    assert!(code.contains("import { clearRender, render } from 'ember-test-helpers';"));
    assert!(code.contains("await clearRender();"));
}

#[test]
fn helper_imports_added_while_nesting_are_kept() {
    let source = "import { moduleForComponent, moduleForModel, test } from 'ember-qunit';

moduleForComponent('x-foo', 'Integration | x-foo', { integration: true });

test('renders', function(assert) {
  this.render();
});

moduleForModel('post', 'Unit | Model | post');

test('creates', function(assert) {
  let post = this.subject({ a: 1 });
});
";
    let code = migrate(source);
    assert_eq!(code.matches("import { render } from 'ember-test-helpers';").count(), 1, "{code}");
    assert_eq!(code.matches("import { run } from '@ember/runloop';").count(), 1, "{code}");
    assert!(code.contains("await render();"), "{code}");
    assert!(code.contains("run(() => this.owner.lookup('service:store')"), "{code}");
    assert!(position(&code, "from '@ember/runloop'") < position(&code, "module('Integration | x-foo'"));
}

#[test]
fn duplicate_ember_qunit_imports_are_folded() {
    let source = "import { moduleFor, test } from 'ember-qunit';
import { setupTest } from 'ember-qunit';

moduleFor('service:foo', 'Unit | Service | foo');

test('it exists', function(assert) {
  assert.ok(this.subject());
});
";
    let code = migrate(source);
    assert_eq!(code.matches("from 'ember-qunit'").count(), 1, "{code}");
    assert_eq!(code.matches("setupTest }").count(), 1, "{code}");
    assert!(code.contains("import { setupTest } from 'ember-qunit';"), "{code}");
    assert!(code.contains("import { module, test } from 'qunit';"), "{code}");
}

#[test]
fn mixed_component_modules_import_both_setups() {
    let source = "import { moduleForComponent, test } from 'ember-qunit';

moduleForComponent('a', 'A', { integration: true });

test('a', function() {});

moduleForComponent('b', 'B', { unit: true });

test('b', function() {});
";
    let code = migrate(source);
    assert!(code.contains("import { setupRenderingTest, setupTest } from 'ember-qunit';"));
}

#[test]
fn wait_import_becomes_settled() {
    let source = "import { module, test } from 'qunit';
import wait from 'ember-test-helpers/wait';

module('Integration | Component | FooBar', function() {
  test('absolute value works', async function(assert) {
    await wait();
    await click('.foo');
  });
});
";
    let expected = "import { module, test } from 'qunit';
import { settled } from '@ember/test-helpers';

module('Integration | Component | FooBar', function() {
  test('absolute value works', async function(assert) {
    await settled();
    await click('.foo');
  });
});
";
    let config = CodemodConfig {
        test_helpers_module: "@ember/test-helpers".to_string(),
        ..CodemodConfig::default()
    };
    let output = migrate_with(source, &config);
    assert_eq!(output.code, expected);
    assert_eq!(output.report.wait_imports_migrated, 1);
}

#[test]
fn renamed_wait_import_renames_its_calls() {
    let source = "import { module, test } from 'qunit';
import flush from 'ember-test-helpers/wait';

test('a', function() {
  return flush().then(() => {});
});
";
    let code = migrate(source);
    assert!(code.contains("import { settled } from 'ember-test-helpers';"));
    assert!(code.contains("return settled().then(() => {});"));
    assert!(!code.contains("flush"));
}

#[test]
fn global_wait_is_left_alone() {
    let source = "test('a', async function() {
  await wait();
});
";
    let output = migrate_with(source, &CodemodConfig::default());
    assert_eq!(output.code, source);
    assert!(!output.changed);
}

// =============================================================================
// Pass-through, errors, files
// =============================================================================

#[test]
fn modern_file_is_returned_unchanged() {
    let source = "import { module, test } from 'qunit';
import { setupTest } from 'ember-qunit';
import { withMoar } from 'foo-bar';

module('Acceptance | foo-bar', function () {
  setupTest();

  function tests() {
    test('test one', function() {});
    test('test two', function() {});
  }

  tests();
  module('[moar enabled]', withMoar(tests)); // This should stay the same
});
";
    let output = migrate_with(source, &CodemodConfig::default());
    assert_eq!(output.code, source);
    assert!(!output.changed);
    assert_eq!(output.report.nested_modules, 1);
}

#[test]
fn parse_errors_are_reported_with_positions() {
    let err = transform_source("moduleFor('a', {\n", &CodemodConfig::default()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("failed to parse input.js"), "{message}");
    assert!(message.contains("input.js:"), "{message}");
}

#[test]
fn transform_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foo-test.js");
    std::fs::write(&path, "moduleFor('service:a', 'A');\n").unwrap();

    let output = transform_file(&path, &CodemodConfig::default()).unwrap();
    assert_eq!(output.code, "module('A', function(hooks) {\n  setupTest(hooks);\n});\n");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "moduleFor('service:a', 'A');\n");
}

#[test]
fn transform_file_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.js");
    let err = transform_file(&path, &CodemodConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read test module"));
}
