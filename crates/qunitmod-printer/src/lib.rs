//! Printer for qunitmod syntax trees.
//!
//! Turns a `NodeArena` back into JavaScript source. Parsed nodes keep their
//! literal text, comments, and blank-line spacing; synthesized nodes are
//! printed in a fixed house style (two-space indent, single quotes,
//! `function(` with no space) so rewritten files read like hand-written ones.

pub mod printer;

pub use printer::{PrintOptions, PrintResult, Printer, QuoteStyle};
