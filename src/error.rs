//! Error types for reading and parsing sources.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a source file into a syntax tree.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("incompatible JavaScript grammar: {0}")]
    Language(String),
    #[error("parser returned no tree")]
    Parse,
}
