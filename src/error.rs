//! Loading errors.
//!
//! The compiler itself has no failure modes: malformed attributes degrade
//! locally. Only getting records and configuration off disk can fail.
use std::path::PathBuf;

use crate::path_de::PathError;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to parse {}: {source}", path.display())]
    Json { path: PathBuf, source: PathError },

    #[error("failed to apply jq expression to {}: {message}", path.display())]
    Jq { path: PathBuf, message: String },

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Glob(#[from] glob::GlobError),

    #[error("glob pattern matched no files: {0}")]
    EmptyGlob(String),
}
