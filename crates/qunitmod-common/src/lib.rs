//! Common types and utilities for qunitmod.
//!
//! This crate provides foundational types used across all qunitmod crates:
//! - Comments attached to syntax nodes (`Comment`, `CommentKind`)
//! - Diagnostics produced while scanning and parsing (`Diagnostic`)
//! - Line/column lookup for byte offsets (`LineMap`)
//! - Recursion limits shared by the parser and printer

// Comment trivia carried through the tree
pub mod comments;
pub use comments::{Comment, CommentKind};

// Diagnostics reported by the scanner and parser
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Byte offset to line/column mapping
pub mod position;
pub use position::{LineMap, Position};

// Centralized limits
pub mod limits;
