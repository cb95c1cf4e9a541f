//! Tracing configuration for debugging migrations.
//!
//! Supports three output formats controlled by `QUNITMOD_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`, easy to follow
//!   pass by pass
//! - `json`: One JSON object per span/event, machine-readable
//!
//! ## Quick start
//!
//! ```bash
//! # Which modules were recognized, and why some were skipped
//! QUNITMOD_LOG=debug QUNITMOD_LOG_FORMAT=tree <driver> foo-test.js
//!
//! # Every rewritten call site
//! QUNITMOD_LOG="qunitmod_codemod=trace" QUNITMOD_LOG_FORMAT=tree <driver> foo-test.js
//!
//! # JSON (for tooling or sharing full traces)
//! QUNITMOD_LOG=debug QUNITMOD_LOG_FORMAT=json <driver> foo-test.js
//! ```
//!
//! The subscriber is only initialised when `QUNITMOD_LOG` (or `RUST_LOG`) is
//! set, so there is no overhead in normal runs.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Primary filter variable.
pub const LOG_ENV: &str = "QUNITMOD_LOG";
/// Output format variable.
pub const LOG_FORMAT_ENV: &str = "QUNITMOD_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name; anything unknown is `Text`.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(LOG_FORMAT_ENV).unwrap_or_default())
    }
}

/// `QUNITMOD_LOG` takes precedence over `RUST_LOG`. Values use the same
/// syntax as `RUST_LOG` (e.g. `debug`, `qunitmod_codemod::segmentation=trace`).
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var(LOG_ENV) {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `QUNITMOD_LOG` nor `RUST_LOG` is set. All output
/// goes to stderr so it never mixes with migrated source on stdout.
pub fn init_tracing() {
    let has_own_log = std::env::var(LOG_ENV).is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_own_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LogFormat;

    #[test]
    fn format_names_are_case_insensitive() {
        assert_eq!(LogFormat::parse("TREE"), LogFormat::Tree);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
    }
}
