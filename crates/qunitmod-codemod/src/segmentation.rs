//! Body segmentation: flat legacy modules to nested modules.
//!
//! The legacy convention declares a module and then lists its tests as
//! following siblings:
//!
//! ```js
//! moduleFor('service:foo', 'Unit | Service | foo');
//! test('it exists', function(assert) { ... });
//! ```
//!
//! The top-level statements are walked once as a two-state machine. A
//! recognized module call opens a `ModuleDescriptor` and is replaced by the
//! nested `module(...)` skeleton in place; following statements are moved
//! into the open module until the next module call or the end of the file,
//! at which point the collected body is spliced into the callback.

use qunitmod_parser::parser::NodeKind;
use qunitmod_parser::query::replace;
use qunitmod_parser::syntax::matchers::{property_key, property_value};
use indexmap::IndexSet;
use qunitmod_parser::{NodeArena, NodeIndex};
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::config::CodemodConfig;
use crate::imports::ImportRegistry;
use crate::module_info::{
    Classification, HOOKS, ModuleDescriptor, SetupStrategy, TestDescriptor, classify,
};
use crate::options::{OptionPropertyClass, classify_option, detach_method};
use crate::rendering::convert_render_calls;
use crate::rules::{apply_call_site_rules, context_member};
use crate::subject::resolve_subject_calls;

/// What the segmentation pass did to one file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SegmentationReport {
    pub modules_rewritten: usize,
    pub nested_modules: usize,
    pub unrecognized_modules: usize,
    pub statements_moved: usize,
    pub call_sites_rewritten: usize,
}

enum State {
    Scanning,
    InModule(ModuleDescriptor),
}

struct Segmenter<'a> {
    arena: &'a mut NodeArena,
    file: NodeIndex,
    imports: &'a mut ImportRegistry,
    config: &'a CodemodConfig,
    report: SegmentationReport,
}

#[instrument(level = "debug", skip_all)]
pub fn segment_modules(
    arena: &mut NodeArena,
    file: NodeIndex,
    imports: &mut ImportRegistry,
    config: &CodemodConfig,
) -> SegmentationReport {
    let statements = arena
        .statement_list(file)
        .map(|list| list.nodes.clone())
        .unwrap_or_default();
    let mut segmenter = Segmenter {
        arena,
        file,
        imports,
        config,
        report: SegmentationReport::default(),
    };

    // Imports added while rewriting land in the live list, so the adopted
    // statements are filtered out of it rather than rebuilding from the copy.
    let mut adopted: IndexSet<NodeIndex> = IndexSet::new();
    let mut state = State::Scanning;
    for statement in statements {
        match classify(segmenter.arena, statement, config.component_strategy) {
            Some(Classification::Legacy(descriptor)) => {
                segmenter.close(state);
                state = State::InModule(segmenter.open(statement, descriptor));
            }
            Some(Classification::Nested) => {
                segmenter.close(state);
                state = State::Scanning;
                segmenter.report.nested_modules += 1;
            }
            Some(Classification::Unrecognized(reason)) => {
                debug!(statement = statement.0, reason, "legacy module call left untouched");
                segmenter.close(state);
                state = State::Scanning;
                segmenter.report.unrecognized_modules += 1;
            }
            None => match &mut state {
                State::InModule(module) if !is_module_level(segmenter.arena, statement) => {
                    segmenter.adopt(module, statement);
                    adopted.insert(statement);
                }
                _ => {}
            },
        }
    }
    segmenter.close(state);

    if let Some(list) = segmenter.arena.statement_list_mut(file) {
        list.nodes.retain(|statement| !adopted.contains(statement));
    }
    segmenter.report
}

/// Imports and exports stay at the top level even inside a module's range.
fn is_module_level(arena: &NodeArena, statement: NodeIndex) -> bool {
    matches!(
        arena.kind(statement),
        Some(NodeKind::ImportDeclaration | NodeKind::ExportDeclaration)
    )
}

impl Segmenter<'_> {
    /// Replace the legacy call with the nested skeleton and fold the
    /// options into it.
    fn open(&mut self, statement: NodeIndex, mut module: ModuleDescriptor) -> ModuleDescriptor {
        debug!(
            kind = module.kind.callee_name(),
            setup = ?module.setup,
            subject = ?module.subject_key,
            "opening module"
        );
        let invocation = module.build_invocation(self.arena);

        if let Some(options) = module.options {
            let properties = self
                .arena
                .get_object_literal(options)
                .map(|object| object.properties.nodes.clone())
                .unwrap_or_default();
            for property in properties {
                self.fold_option(&mut module, property);
            }

            let body = module.body().to_vec();
            match module.setup {
                SetupStrategy::SetupRenderingTest => {
                    for statement in body {
                        self.report.call_sites_rewritten += convert_render_calls(
                            self.arena,
                            self.file,
                            statement,
                            &self.config.test_helpers_module,
                            self.imports,
                        );
                    }
                }
                SetupStrategy::SetupTest => self.resolve_subjects(&module, &body),
                SetupStrategy::None => {}
            }
        }

        replace(self.arena, statement, invocation);
        self.report.modules_rewritten += 1;
        module
    }

    fn fold_option(&mut self, module: &mut ModuleDescriptor, property: NodeIndex) {
        let value = property_value(self.arena, property);
        if module.setup.is_some() {
            if let Some(value) = value {
                self.report.call_sites_rewritten +=
                    apply_call_site_rules(self.arena, value, module, Some(value));
            }
        }

        match classify_option(self.arena, property, module.setup) {
            OptionPropertyClass::IgnoredFlag => {}
            OptionPropertyClass::Resolver => {
                let resolver = self.arena.create_object_literal(vec![property]);
                module.add_setup_argument(self.arena, resolver);
            }
            OptionPropertyClass::LifecycleHook(hook) => {
                let Some(value) = value else {
                    return;
                };
                detach_method(self.arena, value);
                let hooks = self.arena.create_identifier(HOOKS);
                let call = self.arena.create_method_call(hooks, hook, vec![value]);
                let statement = self.arena.create_expression_statement(call);
                self.carry_property_trivia(property, statement);
                module.ensure_hooks_param(self.arena);
                module.push_statement(statement);
                trace!(hook, "lifecycle hook");
            }
            OptionPropertyClass::CustomField => {
                let Some(value) = value else {
                    return;
                };
                detach_method(self.arena, value);
                let target = self.custom_field_target(property);
                let assignment = self.arena.create_assignment(target, value);
                let statement = self.arena.create_expression_statement(assignment);
                self.carry_property_trivia(property, statement);
                module.add_to_before_each(self.arena, statement);
                trace!(key = ?property_key(self.arena, property), "custom field");
            }
        }
    }

    /// `this.key`, `this['key']`, or `this[<computed key>]`.
    fn custom_field_target(&mut self, property: NodeIndex) -> NodeIndex {
        if let Some(key) = property_key(self.arena, property).map(str::to_string) {
            return context_member(self.arena, &key);
        }
        let name = self
            .arena
            .get_property(property)
            .map_or(NodeIndex::NONE, |data| data.name);
        let this = self.arena.create_this();
        self.arena.create_element_access(this, name)
    }

    fn carry_property_trivia(&mut self, property: NodeIndex, statement: NodeIndex) {
        let comments = self.arena.take_comments(property);
        self.arena.add_leading_comments(statement, comments.leading);
        self.arena.add_trailing_comments(statement, comments.trailing);
        let blank = self.arena.has_blank_line_before(property);
        self.arena.set_blank_line_before(statement, blank);
    }

    fn resolve_subjects(&mut self, module: &ModuleDescriptor, roots: &[NodeIndex]) {
        if module.has_custom_subject {
            return;
        }
        let Some(subject_key) = module.subject_key.as_deref() else {
            return;
        };
        for &root in roots {
            self.report.call_sites_rewritten +=
                resolve_subject_calls(self.arena, self.file, root, subject_key, self.imports);
        }
    }

    /// Move a following statement into the open module, rewriting it when
    /// it is a test.
    fn adopt(&mut self, module: &mut ModuleDescriptor, statement: NodeIndex) {
        module.push_statement(statement);
        self.report.statements_moved += 1;

        let Some(test) = TestDescriptor::from_statement(self.arena, statement) else {
            return;
        };
        trace!(statement = statement.0, is_async = test.is_async, "rewriting test");
        let owner_scope = test.callback.into_option();
        self.report.call_sites_rewritten +=
            apply_call_site_rules(self.arena, test.statement, module, owner_scope);
        match module.setup {
            SetupStrategy::SetupRenderingTest => {
                self.report.call_sites_rewritten += convert_render_calls(
                    self.arena,
                    self.file,
                    test.statement,
                    &self.config.test_helpers_module,
                    self.imports,
                );
            }
            SetupStrategy::SetupTest => self.resolve_subjects(module, &[test.statement]),
            SetupStrategy::None => {}
        }
    }

    fn close(&mut self, state: State) {
        if let State::InModule(module) = state {
            trace!(statements = module.body().len(), "closing module");
            module.close(self.arena);
        }
    }
}
