//! Per-file driver: parse, run the passes in order, print.

use std::path::Path;

use anyhow::{Context, Result, bail};
use qunitmod_common::LineMap;
use qunitmod_parser::{NodeArena, NodeIndex, ParserState};
use qunitmod_printer::Printer;
use serde::Serialize;
use tracing::{debug, info_span, instrument};

use crate::config::CodemodConfig;
use crate::imports::ImportRegistry;
use crate::legacy_imports::{move_qunit_imports, remap_setup_imports};
use crate::segmentation::segment_modules;
use crate::wait::migrate_wait_imports;

/// Counters for one transformed file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformReport {
    pub import_edits: usize,
    pub modules_rewritten: usize,
    pub nested_modules: usize,
    pub unrecognized_modules: usize,
    pub statements_moved: usize,
    pub call_sites_rewritten: usize,
    pub wait_imports_migrated: usize,
}

impl TransformReport {
    /// Whether any pass changed the tree. Nested and unrecognized modules
    /// are only observed.
    pub fn changed(&self) -> bool {
        self.import_edits > 0
            || self.modules_rewritten > 0
            || self.statements_moved > 0
            || self.call_sites_rewritten > 0
            || self.wait_imports_migrated > 0
    }
}

#[derive(Clone, Debug)]
pub struct TransformOutput {
    pub code: String,
    pub changed: bool,
    pub report: TransformReport,
}

/// Runs the migration passes over parsed files.
#[derive(Clone, Debug, Default)]
pub struct Codemod {
    config: CodemodConfig,
}

impl Codemod {
    pub fn new(config: CodemodConfig) -> Codemod {
        Codemod { config }
    }

    pub fn config(&self) -> &CodemodConfig {
        &self.config
    }

    /// Rewrite the tree rooted at `file` in place.
    #[instrument(level = "debug", skip_all)]
    pub fn run(&self, arena: &mut NodeArena, file: NodeIndex) -> TransformReport {
        let mut imports = ImportRegistry::new();

        move_qunit_imports(arena, file, &mut imports);
        remap_setup_imports(arena, file, &mut imports, &self.config);
        let segmentation = segment_modules(arena, file, &mut imports, &self.config);
        let wait_imports_migrated = migrate_wait_imports(arena, file, &mut imports, &self.config);

        if cfg!(debug_assertions) {
            imports.assert_unique(arena, file);
        }

        let report = TransformReport {
            import_edits: imports.edits(),
            modules_rewritten: segmentation.modules_rewritten,
            nested_modules: segmentation.nested_modules,
            unrecognized_modules: segmentation.unrecognized_modules,
            statements_moved: segmentation.statements_moved,
            call_sites_rewritten: segmentation.call_sites_rewritten,
            wait_imports_migrated,
        };
        debug!(?report, "codemod finished");
        report
    }

    /// Parse, rewrite, and print one source text. A file no pass touched is
    /// returned byte for byte.
    pub fn transform(&self, file_name: &str, source: &str) -> Result<TransformOutput> {
        let _span = info_span!("transform", file = file_name).entered();

        let mut parser = ParserState::new(file_name.to_string(), source.to_string());
        let root = parser.parse_source_file();
        if !parser.get_diagnostics().is_empty() {
            let line_map = LineMap::build(source);
            let messages: Vec<String> = parser
                .get_diagnostics()
                .iter()
                .map(|diagnostic| diagnostic.format(file_name, &line_map))
                .collect();
            bail!("failed to parse {file_name}:\n{}", messages.join("\n"));
        }

        let mut arena = parser.into_arena();
        let report = self.run(&mut arena, root);
        if !report.changed() {
            debug!(file = file_name, "no legacy constructs found");
            return Ok(TransformOutput {
                code: source.to_string(),
                changed: false,
                report,
            });
        }

        let mut printer = Printer::new(&arena, self.config.print.clone());
        printer.print(root);
        let code = printer.finish().code;
        let changed = code != source;
        Ok(TransformOutput {
            code,
            changed,
            report,
        })
    }
}

/// Transform `source` with `config`, naming it `input.js` in diagnostics.
pub fn transform_source(source: &str, config: &CodemodConfig) -> Result<TransformOutput> {
    Codemod::new(config.clone()).transform("input.js", source)
}

/// Read and transform the file at `path`. The file is not written back.
pub fn transform_file(path: &Path, config: &CodemodConfig) -> Result<TransformOutput> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test module: {}", path.display()))?;
    Codemod::new(config.clone())
        .transform(&path.display().to_string(), &source)
        .with_context(|| format!("failed to transform test module: {}", path.display()))
}
