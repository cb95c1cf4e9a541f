//! Legacy module calls and the descriptors built from them.
//!
//! `classify` looks at one top-level statement. A recognized legacy call
//! (`moduleFor('service:foo', 'Unit | Service | foo', { ... })`) becomes a
//! `ModuleDescriptor`; the descriptor then builds the nested
//! `module(name, function(hooks) { ... })` skeleton and collects the module
//! body until the segmentation pass closes it.

use qunitmod_parser::parser::NodeKind;
use qunitmod_parser::parser::node::{NodeData, PropertyKind};
use qunitmod_parser::syntax::matchers::{
    callee_name, expression_statement_call, is_function_or_arrow, property_key, skip_parentheses,
};
use qunitmod_parser::{NodeArena, NodeIndex, NodeList};

use crate::config::ComponentStrategy;

/// Parameter name of the nested module callback.
pub const HOOKS: &str = "hooks";

/// Callee names treated as tests inside a module body.
pub const TEST_CALLEES: [&str; 3] = ["test", "skip", "todo"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// `module(name, options?)`
    Plain,
    /// `moduleFor(key, name?, options?)`
    ForGeneric,
    /// `moduleForComponent(name, description?, options?)`
    ForComponent,
    /// `moduleForModel(name, description?, options?)`
    ForModel,
}

impl ModuleKind {
    pub fn from_callee(name: &str) -> Option<ModuleKind> {
        match name {
            "module" => Some(ModuleKind::Plain),
            "moduleFor" => Some(ModuleKind::ForGeneric),
            "moduleForComponent" => Some(ModuleKind::ForComponent),
            "moduleForModel" => Some(ModuleKind::ForModel),
            _ => None,
        }
    }

    pub fn callee_name(self) -> &'static str {
        match self {
            ModuleKind::Plain => "module",
            ModuleKind::ForGeneric => "moduleFor",
            ModuleKind::ForComponent => "moduleForComponent",
            ModuleKind::ForModel => "moduleForModel",
        }
    }
}

/// Which setup call the nested module starts with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetupStrategy {
    None,
    SetupTest,
    SetupRenderingTest,
}

impl SetupStrategy {
    pub fn function_name(self) -> Option<&'static str> {
        match self {
            SetupStrategy::None => None,
            SetupStrategy::SetupTest => Some("setupTest"),
            SetupStrategy::SetupRenderingTest => Some("setupRenderingTest"),
        }
    }

    pub fn is_some(self) -> bool {
        self != SetupStrategy::None
    }
}

/// Result of looking at a top-level statement whose callee is one of the
/// legacy module names.
#[derive(Debug)]
pub enum Classification {
    Legacy(ModuleDescriptor),
    /// Already `module(name, function() { ... })`.
    Nested,
    /// Looks like a module call but cannot be migrated safely.
    Unrecognized(&'static str),
}

/// Classify `statement`. `None` when it is not a module call at all.
pub fn classify(
    arena: &NodeArena,
    statement: NodeIndex,
    strategy: ComponentStrategy,
) -> Option<Classification> {
    let call = expression_statement_call(arena, statement)?;
    let kind = ModuleKind::from_callee(callee_name(arena, call)?)?;
    let mut arguments = arena.get_call_expr(call)?.arguments.nodes.clone();

    let options = match arguments.last() {
        Some(&last) if arena.is_kind(skip_parentheses(arena, last), NodeKind::ObjectLiteralExpression) => {
            arguments.pop();
            Some(skip_parentheses(arena, last))
        }
        _ => None,
    };
    if arguments
        .get(1)
        .is_some_and(|&second| is_function_or_arrow(arena, second))
    {
        return Some(Classification::Nested);
    }
    let Some(&first) = arguments.first() else {
        return Some(Classification::Unrecognized("missing module name"));
    };
    if arguments.len() > 2 {
        return Some(Classification::Unrecognized("unexpected extra arguments"));
    }
    if kind == ModuleKind::Plain && arguments.len() == 2 {
        return Some(Classification::Unrecognized("second argument is not a callback"));
    }

    let mut option_keys: Vec<&str> = Vec::new();
    if let Some(options) = options {
        for property in arena.get_object_literal(options)?.properties.iter() {
            let Some(data) = arena.get_property(property) else {
                return Some(Classification::Unrecognized("spread in module options"));
            };
            if matches!(data.kind, PropertyKind::Getter | PropertyKind::Setter) {
                return Some(Classification::Unrecognized("accessor in module options"));
            }
            if let Some(key) = property_key(arena, property) {
                option_keys.push(key);
            }
        }
    }
    let has_option = |name: &str| option_keys.contains(&name);

    let name = arguments.get(1).copied().unwrap_or(first);
    let token = arena.string_literal_value(first);
    let (setup, subject_key) = match kind {
        ModuleKind::Plain => (SetupStrategy::None, None),
        ModuleKind::ForGeneric => {
            let Some(key) = token else {
                return Some(Classification::Unrecognized("container key is not a string"));
            };
            (SetupStrategy::SetupTest, Some(key.to_string()))
        }
        ModuleKind::ForModel => {
            let Some(model) = token else {
                return Some(Classification::Unrecognized("model name is not a string"));
            };
            (SetupStrategy::SetupTest, Some(format!("model:{model}")))
        }
        ModuleKind::ForComponent => {
            let Some(component) = token else {
                return Some(Classification::Unrecognized("component name is not a string"));
            };
            let rendering = match strategy {
                ComponentStrategy::LegacyDefaults => {
                    has_option("integration") || !(has_option("unit") || has_option("needs"))
                }
                ComponentStrategy::IntegrationFlag => has_option("integration"),
            };
            if rendering {
                (SetupStrategy::SetupRenderingTest, None)
            } else {
                (SetupStrategy::SetupTest, Some(format!("component:{component}")))
            }
        }
    };

    Some(Classification::Legacy(ModuleDescriptor {
        kind,
        name,
        setup,
        subject_key,
        has_custom_subject: has_option("subject"),
        options,
        callback: NodeIndex::NONE,
        setup_call: NodeIndex::NONE,
        body: Vec::new(),
        before_each: None,
        send_dispatcher_installed: false,
    }))
}

/// A legacy module being rewritten.
#[derive(Debug)]
pub struct ModuleDescriptor {
    pub kind: ModuleKind,
    /// Display name expression, moved into the new `module(...)` call.
    pub name: NodeIndex,
    pub setup: SetupStrategy,
    /// Container key `this.subject()` resolves to, e.g. `component:foo`.
    pub subject_key: Option<String>,
    pub has_custom_subject: bool,
    /// The trailing options object of the legacy call.
    pub options: Option<NodeIndex>,
    callback: NodeIndex,
    setup_call: NodeIndex,
    /// Statements of the module callback, spliced in by `close`.
    body: Vec<NodeIndex>,
    /// Block of the synthesized `hooks.beforeEach(function() { ... })`.
    before_each: Option<NodeIndex>,
    send_dispatcher_installed: bool,
}

impl ModuleDescriptor {
    /// Build `module(name, function() { setupX(hooks); })` and return its
    /// expression statement.
    pub fn build_invocation(&mut self, arena: &mut NodeArena) -> NodeIndex {
        self.callback = arena.create_function_expression(Vec::new(), Vec::new());
        if let Some(setup_name) = self.setup.function_name() {
            let hooks = arena.create_identifier(HOOKS);
            self.setup_call = arena.create_named_call(setup_name, vec![hooks]);
            let statement = arena.create_expression_statement(self.setup_call);
            self.body.push(statement);
            self.ensure_hooks_param(arena);
        }
        let call = arena.create_named_call("module", vec![self.name, self.callback]);
        arena.create_expression_statement(call)
    }

    pub fn body(&self) -> &[NodeIndex] {
        &self.body
    }

    pub fn push_statement(&mut self, statement: NodeIndex) {
        self.body.push(statement);
    }

    /// Append an argument to the setup call: `setupTest(hooks, { resolver })`.
    pub fn add_setup_argument(&mut self, arena: &mut NodeArena, argument: NodeIndex) {
        if let Some(call) = arena.get_call_expr_mut(self.setup_call) {
            call.arguments.nodes.push(argument);
        }
    }

    /// Give the callback its `hooks` parameter (once).
    pub fn ensure_hooks_param(&mut self, arena: &mut NodeArena) {
        let has_param = arena
            .get_function(self.callback)
            .is_some_and(|func| !func.parameters.is_empty());
        if has_param {
            return;
        }
        let hooks = arena.create_identifier(HOOKS);
        if let Some(func) = arena.get_function_mut(self.callback) {
            func.parameters = NodeList::with_nodes(vec![hooks]);
        }
    }

    /// The body block of the module's synthesized `beforeEach` hook,
    /// created on first use right after the setup call.
    pub fn ensure_before_each(&mut self, arena: &mut NodeArena) -> NodeIndex {
        if let Some(block) = self.before_each {
            return block;
        }
        self.ensure_hooks_param(arena);
        let function = arena.create_function_expression(Vec::new(), Vec::new());
        let block = arena
            .get_function(function)
            .map_or(NodeIndex::NONE, |func| func.body);
        let hooks = arena.create_identifier(HOOKS);
        let call = arena.create_method_call(hooks, "beforeEach", vec![function]);
        let statement = arena.create_expression_statement(call);
        let at = if self.setup.is_some() { 1 } else { 0 };
        self.body.insert(at.min(self.body.len()), statement);
        self.before_each = Some(block);
        block
    }

    pub fn add_to_before_each(&mut self, arena: &mut NodeArena, statement: NodeIndex) {
        let block = self.ensure_before_each(arena);
        if let Some(statements) = arena.statement_list_mut(block) {
            statements.nodes.push(statement);
        }
    }

    /// Install `this.actions = {}` and the `this.send` dispatcher in the
    /// `beforeEach` hook (once per module).
    pub fn ensure_send_dispatcher(&mut self, arena: &mut NodeArena) {
        if self.send_dispatcher_installed {
            return;
        }
        self.send_dispatcher_installed = true;

        let actions = arena.create_this_property("actions");
        let empty = arena.create_object_literal(Vec::new());
        let init = arena.create_assignment(actions, empty);
        let init = arena.create_expression_statement(init);
        self.add_to_before_each(arena, init);

        // this.send = (actionName, ...args) => this.actions[actionName].apply(this, args);
        let action_name = arena.create_identifier("actionName");
        let args = arena.create_identifier("args");
        let rest = arena.create_spread(args);
        let actions = arena.create_this_property("actions");
        let key = arena.create_identifier("actionName");
        let handler = arena.create_element_access(actions, key);
        let this = arena.create_this();
        let forwarded = arena.create_identifier("args");
        let apply = arena.create_method_call(handler, "apply", vec![this, forwarded]);
        let arrow = arena.create_arrow_function(vec![action_name, rest], apply);
        let send = arena.create_this_property("send");
        let assignment = arena.create_assignment(send, arrow);
        let statement = arena.create_expression_statement(assignment);
        self.add_to_before_each(arena, statement);
    }

    pub fn has_send_dispatcher(&self) -> bool {
        self.send_dispatcher_installed
    }

    /// Splice the collected statements into the callback body.
    pub fn close(self, arena: &mut NodeArena) -> NodeIndex {
        space_statements(arena, &self.body);
        if let Some(block) = self.before_each {
            let statements = arena
                .statement_list(block)
                .map(|list| list.nodes.clone())
                .unwrap_or_default();
            space_statements(arena, &statements);
        }
        let block = arena
            .get_function(self.callback)
            .map_or(NodeIndex::NONE, |func| func.body);
        if let Some(statements) = arena.statement_list_mut(block) {
            statements.nodes = self.body;
        }
        self.callback
    }
}

/// A `test`/`skip`/`todo` call in a module body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TestDescriptor {
    pub statement: NodeIndex,
    pub call: NodeIndex,
    /// The test function, `NONE` when the call has none.
    pub callback: NodeIndex,
    pub is_async: bool,
}

impl TestDescriptor {
    pub fn from_statement(arena: &NodeArena, statement: NodeIndex) -> Option<TestDescriptor> {
        let call = expression_statement_call(arena, statement)?;
        let name = callee_name(arena, call)?;
        if !TEST_CALLEES.contains(&name) {
            return None;
        }
        let callback = arena
            .get_call_expr(call)?
            .arguments
            .get(1)
            .filter(|&argument| is_function_or_arrow(arena, argument))
            .unwrap_or(NodeIndex::NONE);
        let is_async = arena.get_function(callback).is_some_and(|func| func.is_async);
        Some(TestDescriptor {
            statement,
            call,
            callback,
            is_async,
        })
    }
}

/// Whether a statement prints across several lines: it holds a non-empty
/// block or a multi-line object or array literal.
pub fn spans_multiple_lines(arena: &NodeArena, statement: NodeIndex) -> bool {
    qunitmod_parser::query::find_first(arena, statement, |arena, node| match arena.data(node) {
        Some(NodeData::Block(block)) => !block.statements.is_empty(),
        Some(NodeData::ObjectLiteral(object)) => object.multi_line && !object.properties.is_empty(),
        Some(NodeData::ArrayLiteral(array)) => array.multi_line && !array.elements.is_empty(),
        _ => false,
    })
    .is_some()
}

/// Blank lines for a rebuilt statement list: the first statement gets none,
/// later ones keep their own, and multi-line statements are set off from
/// their neighbours.
pub fn space_statements(arena: &mut NodeArena, statements: &[NodeIndex]) {
    let multi_line: Vec<bool> = statements
        .iter()
        .map(|&statement| spans_multiple_lines(arena, statement))
        .collect();
    for (i, &statement) in statements.iter().enumerate() {
        let blank = i > 0
            && (arena.has_blank_line_before(statement) || multi_line[i] || multi_line[i - 1]);
        arena.set_blank_line_before(statement, blank);
    }
}
