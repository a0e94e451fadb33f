//! Compiled path-matching rules

use crate::error::RuleCompileError;
use crate::matcher;
use crate::path::CandidatePath;
use crate::tokens::{self, RuleDiagnostic, Token};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Declarative rule as written in configuration.
///
/// Both keys are optional, but a rule missing either one never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Regex tested against the file's base name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Directory rule, e.g. `!ROOT!/data/!DIRS!/exports`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directories: Option<String>,
}

impl RuleSpec {
    pub fn new(name: Option<&str>, directories: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            directories: directories.map(str::to_string),
        }
    }
}

/// Immutable, compiled form of a [`RuleSpec`].
///
/// Safe to share between threads; matching never mutates it.
#[derive(Debug, Clone)]
pub struct RuleSet {
    spec: RuleSpec,
    name_pattern: Option<Regex>,
    directory_tokens: Option<Vec<Token>>,
    diagnostics: Vec<RuleDiagnostic>,
}

impl RuleSet {
    /// Compile a rule specification.
    pub fn compile(spec: &RuleSpec) -> Result<Self, RuleCompileError> {
        let name_pattern = spec
            .name
            .as_deref()
            .map(|pattern| {
                tokens::anchored_regex(pattern).map_err(|e| RuleCompileError::NamePattern {
                    pattern: pattern.to_string(),
                    source: e,
                })
            })
            .transpose()?;

        let (directory_tokens, diagnostics) = match spec.directories.as_deref() {
            Some(raw) => {
                let tokenized = tokens::tokenize(raw)?;
                (Some(tokenized.tokens), tokenized.diagnostics)
            }
            None => (None, Vec::new()),
        };

        Ok(Self {
            spec: spec.clone(),
            name_pattern,
            directory_tokens,
            diagnostics,
        })
    }

    /// Shorthand for compiling from string slices.
    pub fn from_parts(name: Option<&str>, directories: Option<&str>) -> Result<Self, RuleCompileError> {
        Self::compile(&RuleSpec::new(name, directories))
    }

    pub fn spec(&self) -> &RuleSpec {
        &self.spec
    }

    pub fn name_source(&self) -> Option<&str> {
        self.spec.name.as_deref()
    }

    pub fn directories_source(&self) -> Option<&str> {
        self.spec.directories.as_deref()
    }

    pub fn name_pattern(&self) -> Option<&Regex> {
        self.name_pattern.as_ref()
    }

    /// Tokens in root-to-parent order, `None` if no directory rule was given.
    pub fn directory_tokens(&self) -> Option<&[Token]> {
        self.directory_tokens.as_deref()
    }

    /// Non-fatal problems found while compiling the directory rule.
    pub fn diagnostics(&self) -> &[RuleDiagnostic] {
        &self.diagnostics
    }

    /// Whether `path` satisfies both the name and the directory rule.
    pub fn matches(&self, path: &CandidatePath) -> bool {
        matcher::matches(self, path)
    }
}
