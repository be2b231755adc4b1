//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::line::Line;

/// Domain errors represent structural misuse or malformed persistent data.
/// Transient conditions (stale lookups, duplicate view registration) are
/// logged and absorbed instead.
#[derive(Error, Debug)]
pub enum OutlineError {
    #[error("line does not resolve to a slot: {0:?}")]
    StaleLine(Line),

    #[error("invalid path key '{key}': {reason}")]
    InvalidPath { key: String, reason: String },

    #[error("no parent for path key: {key}")]
    DanglingParent { key: String },
}

/// Result type for outline operations.
pub type OutlineResult<T> = Result<T, OutlineError>;
