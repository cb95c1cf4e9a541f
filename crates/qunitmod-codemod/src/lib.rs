//! Rewrite engine for legacy ember-qunit test modules.
//!
//! Passes, in the order the driver runs them:
//! - `legacy_imports` - move `module`/`test` imports to `qunit` and remap the
//!   `moduleFor*` imports to setup functions
//! - `segmentation` - regroup flat `moduleFor(...)` + sibling tests into
//!   nested `module(name, function(hooks) { ... })` calls
//! - `wait` - replace the deprecated `wait` helper with `settled`
//!
//! Supporting modules:
//! - `imports` - per-file import registry (find, create, merge, sort)
//! - `module_info` - legacy module call classification and descriptors
//! - `options` - classification of legacy module option properties
//! - `rules` - call-site rewrites (lookup, register, inject, actions, getOwner)
//! - `subject` - `this.subject()` resolution
//! - `rendering` - `this.render()` to `await render()`
//! - `driver` - `Codemod`, `transform_source`, `transform_file`

pub mod config;
pub mod driver;
pub mod imports;
pub mod legacy_imports;
pub mod module_info;
pub mod options;
pub mod rendering;
pub mod rules;
pub mod segmentation;
pub mod subject;
pub mod wait;

pub use config::{CodemodConfig, ComponentStrategy};
pub use driver::{Codemod, TransformOutput, TransformReport, transform_file, transform_source};
pub use imports::{ImportRegistry, InsertPosition};
pub use module_info::{Classification, ModuleDescriptor, ModuleKind, SetupStrategy};

#[cfg(test)]
#[path = "../tests/imports_tests.rs"]
mod imports_tests;

#[cfg(test)]
#[path = "../tests/module_info_tests.rs"]
mod module_info_tests;

#[cfg(test)]
#[path = "../tests/rules_tests.rs"]
mod rules_tests;
