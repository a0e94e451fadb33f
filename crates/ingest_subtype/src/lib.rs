//! Ingest Subtype - Rule-based file subtype selection
//!
//! Before any file content is parsed, the ingester decides which subtype
//! profile a file belongs to by looking only at its path.
//!
//! # Core Concepts
//!
//! - **RuleSpec / RuleSet**: name regex plus directory rule, compiled once
//! - **Token**: one segment of a directory rule (`!ROOT!`, `!DIRS!`,
//!   `!DIRS_N!`, or a directory-name regex)
//! - **Matcher**: single-pass automaton deciding whether a path satisfies a rule
//! - **SubtypeRegistry**: ordered subtypes; the first matching one wins

pub mod config;
pub mod error;
pub mod matcher;
pub mod path;
pub mod rules;
pub mod subtype;
pub mod tokens;

// Re-exports for convenience
pub use config::IngestConfig;
pub use error::{PathError, Result, RuleCompileError, SubtypeError};
pub use matcher::{directories_match, explain, matches, name_matches, MatchDiagnostic, Verdict};
pub use path::CandidatePath;
pub use rules::{RuleSet, RuleSpec};
pub use subtype::{CsvLayout, FileFormat, FileSubtype, Layout, SubtypeRegistry, SubtypeSpec};
pub use tokens::{tokenize, RuleDiagnostic, Token, Tokenized};
