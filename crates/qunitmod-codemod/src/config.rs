//! Codemod configuration.
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! reproduces the classic migration: single quotes, 100 column wrapping,
//! helpers imported from `ember-test-helpers`.

use std::path::Path;

use anyhow::{Context, Result};
use qunitmod_printer::PrintOptions;
use serde::{Deserialize, Serialize};

/// Default module for `render`, `clearRender`, and `settled`.
pub const DEFAULT_TEST_HELPERS_MODULE: &str = "ember-test-helpers";

/// How a `moduleForComponent` call decides between a rendering test and a
/// unit test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentStrategy {
    /// Rendering unless the options carry `unit` or `needs` (an explicit
    /// `integration` flag always means rendering). Matches the legacy
    /// runtime default.
    #[default]
    LegacyDefaults,
    /// Rendering only when the options carry `integration`.
    IntegrationFlag,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodemodConfig {
    pub print: PrintOptions,
    pub component_strategy: ComponentStrategy,
    /// Source of `render`, `clearRender`, and `settled`. Newer apps use
    /// `@ember/test-helpers`.
    pub test_helpers_module: String,
}

impl Default for CodemodConfig {
    fn default() -> Self {
        CodemodConfig {
            print: PrintOptions::default(),
            component_strategy: ComponentStrategy::default(),
            test_helpers_module: DEFAULT_TEST_HELPERS_MODULE.to_string(),
        }
    }
}

impl CodemodConfig {
    pub fn from_json_str(source: &str) -> Result<CodemodConfig> {
        let config = serde_json::from_str(source).context("failed to parse codemod config JSON")?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<CodemodConfig> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read codemod config: {}", path.display()))?;
        CodemodConfig::from_json_str(&source)
            .with_context(|| format!("failed to load codemod config: {}", path.display()))
    }

    /// Import specifiers whose default export is the deprecated `wait`
    /// helper.
    pub fn wait_modules(&self) -> Vec<String> {
        let mut modules = vec![format!("{DEFAULT_TEST_HELPERS_MODULE}/wait")];
        let configured = format!("{}/wait", self.test_helpers_module);
        if !modules.contains(&configured) {
            modules.push(configured);
        }
        modules
    }
}
