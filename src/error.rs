//! Error types for source loading and resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or resolving source units.
///
/// None of these escape the extraction, schema or synthesis entry points as
/// panics: callers degrade them to empty results and log them.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The file could not be read from disk.
    #[error("cannot read {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// tree-sitter produced no tree for the file.
    #[error("failed to parse {0}")]
    Parse(PathBuf),
    /// The file extension is not a TypeScript source.
    #[error("unsupported source file {0}")]
    Unsupported(PathBuf),
    #[error("tree-sitter language error: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("invalid tree-sitter query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    /// The requested class is not declared in the file.
    #[error("class {class} not found in {path}")]
    ClassNotFound { path: PathBuf, class: String },
}

impl AnalysisError {
    /// Whether this is a "requested thing is absent" failure rather than an I/O
    /// or parser failure.
    pub fn is_not_found(&self) -> bool {
        match self {
            AnalysisError::ClassNotFound { .. } => true,
            AnalysisError::Load { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
