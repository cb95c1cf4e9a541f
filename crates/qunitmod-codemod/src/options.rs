//! Legacy module option properties.

use qunitmod_parser::parser::node::{FunctionFlavor, NodeData};
use qunitmod_parser::syntax::matchers::{is_method_property, property_key, property_value};
use qunitmod_parser::{NodeArena, NodeIndex};

use crate::module_info::SetupStrategy;

/// QUnit hooks that map onto `hooks.<name>(fn)`.
pub const LIFECYCLE_HOOKS: [&str; 4] = ["before", "beforeEach", "afterEach", "after"];

/// Flags that only selected the legacy setup; they have no runtime effect
/// in nested modules.
pub const IGNORED_FLAGS: [&str; 3] = ["integration", "needs", "unit"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionPropertyClass {
    /// `beforeEach() {}` becomes `hooks.beforeEach(function() {})`.
    LifecycleHook(&'static str),
    IgnoredFlag,
    /// `resolver` is passed to the setup call.
    Resolver,
    /// Anything else is assigned to the test context in `beforeEach`.
    CustomField,
}

pub fn classify_option(
    arena: &NodeArena,
    property: NodeIndex,
    setup: SetupStrategy,
) -> OptionPropertyClass {
    let Some(key) = property_key(arena, property) else {
        return OptionPropertyClass::CustomField;
    };
    if let Some(&hook) = LIFECYCLE_HOOKS.iter().find(|&&hook| hook == key) {
        let is_function = is_method_property(arena, property)
            || property_value(arena, property).is_some_and(|value| {
                matches!(
                    arena.data(value),
                    Some(NodeData::Function(func)) if func.flavor == FunctionFlavor::Expression
                )
            });
        if is_function {
            return OptionPropertyClass::LifecycleHook(hook);
        }
    }
    if IGNORED_FLAGS.contains(&key) {
        return OptionPropertyClass::IgnoredFlag;
    }
    if key == "resolver" && setup.is_some() {
        return OptionPropertyClass::Resolver;
    }
    OptionPropertyClass::CustomField
}

/// Turn an object method (`key() {}`) into a function expression so it can
/// stand on its own as a call argument or assignment value.
pub fn detach_method(arena: &mut NodeArena, value: NodeIndex) {
    if let Some(func) = arena.get_function_mut(value) {
        if func.flavor == FunctionFlavor::Method {
            func.flavor = FunctionFlavor::Expression;
        }
    }
}
