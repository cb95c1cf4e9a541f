//! Syntax helpers shared by rewrite passes.

pub mod matchers;
