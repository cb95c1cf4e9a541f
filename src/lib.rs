//! qunitmod: migrate legacy ember-qunit test modules to nested QUnit modules.
//!
//! The workspace crates are re-exported under short names; the common entry
//! points are re-exported at the top level.
//!
//! ```no_run
//! use qunitmod::{CodemodConfig, transform_source};
//!
//! let output = transform_source("moduleFor('service:foo', 'foo');\n", &CodemodConfig::default())?;
//! assert!(output.changed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Shared diagnostics, comments, and positions
pub use qunitmod_common as common;

// Tokens and scanning
pub use qunitmod_scanner as scanner;

// Syntax tree, parser, and tree queries
pub use qunitmod_parser as parser;
pub use qunitmod_parser::{NodeArena, NodeIndex, ParserState};

// Printing trees back to source text
pub use qunitmod_printer as printer;
pub use qunitmod_printer::{PrintOptions, Printer, QuoteStyle};

// The rewrite engine
pub use qunitmod_codemod as codemod;
pub use qunitmod_codemod::{
    Codemod, CodemodConfig, ComponentStrategy, TransformOutput, TransformReport, transform_file,
    transform_source,
};

// Tracing configuration (text / tree / json output)
pub mod tracing_config;
