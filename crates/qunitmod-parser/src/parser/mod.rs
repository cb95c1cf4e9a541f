//! Parser module: arena-backed syntax tree and the parser state machine.

pub mod base;
pub mod node;
mod node_access;
mod node_arena;
pub mod node_factory;
mod state;
mod state_expressions;
mod state_statements;

pub use base::{NodeIndex, NodeList};
pub use node::{NodeArena, NodeKind};
pub use state::ParserState;

