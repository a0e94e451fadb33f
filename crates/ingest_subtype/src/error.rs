//! Error types for subtype rules and classification

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A rule specification could not be compiled.
///
/// Raised only at compile time. Matching itself never fails: a rule that
/// is missing a component simply yields `false`.
#[derive(Error, Debug)]
pub enum RuleCompileError {
    #[error("Invalid name pattern '{pattern}': {source}")]
    NamePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid directory pattern '{segment}' (segment {index}): {source}")]
    DirectoryPattern {
        segment: String,
        index: usize,
        #[source]
        source: regex::Error,
    },
}

/// A filesystem path cannot be turned into a candidate path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Path is not absolute: {0}")]
    Relative(PathBuf),

    #[error("Path contains '.' or '..' components: {0}")]
    NotNormalized(PathBuf),

    #[error("Path has no file name: {0}")]
    NoFileName(PathBuf),
}

/// Subtype error type
#[derive(Error, Debug)]
pub enum SubtypeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Subtype '{subtype}' has an invalid rule: {source}")]
    Rule {
        subtype: String,
        #[source]
        source: RuleCompileError,
    },

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Unsupported file format '{format}' for subtype '{subtype}'")]
    UnsupportedFormat { subtype: String, format: String },

    #[error("Duplicate subtype name: {0}")]
    DuplicateSubtype(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SubtypeError>;
