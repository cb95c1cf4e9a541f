//! JavaScript parser and syntax tree for qunitmod.
//!
//! - `parser` - `NodeArena` storage, node data types, node factory, and the
//!   recursive-descent `ParserState`
//! - `query` - structural search, scope-aware matching, and in-place tree
//!   edits (replace, relocate, remove, insert)
//! - `syntax` - shape matchers shared by the rewrite passes

pub mod parser;
pub mod query;
pub mod syntax;

pub use parser::{NodeArena, NodeIndex, NodeList, ParserState};

#[cfg(test)]
#[path = "../tests/state_statement_tests.rs"]
mod state_statement_tests;

#[cfg(test)]
#[path = "../tests/state_expression_tests.rs"]
mod state_expression_tests;

#[cfg(test)]
#[path = "../tests/query_tests.rs"]
mod query_tests;
