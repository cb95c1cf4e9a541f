//! Centralized limits shared by the parser and printer.

/// Maximum nesting depth of expressions and statements the parser accepts.
///
/// Deeper input is reported with `MAXIMUM_NESTING_DEPTH_EXCEEDED` instead of
/// overflowing the stack; real test files stay far below it.
pub const MAX_PARSER_RECURSION_DEPTH: u32 = 512;

/// Maximum number of tokens the parser may fail to consume in a row while
/// recovering from an error before it gives up on the rest of the file.
pub const MAX_RECOVERY_SKIPS: u32 = 10_000;
