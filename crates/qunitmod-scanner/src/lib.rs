//! JavaScript scanner/tokenizer for qunitmod.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer that turns source text into a token vector
//! - `char_codes` - Character classification utilities

pub mod char_codes;

mod syntax_kind;
pub use syntax_kind::{SyntaxKind, keyword_from_str, token_text};

mod scanner;
pub use scanner::{ScanResult, ScannerState, Token, token_flags};
