//! Directory rule tokenizer
//!
//! A directory rule is a `/`-separated list of segments, written from the
//! filesystem root (outermost) to the file's parent directory (innermost):
//!
//! ```text
//! !ROOT!/data/!DIRS!/exports/!DIRS_1!
//! ```
//!
//! Special segments:
//! - `!ROOT!`: the path is absolute and nothing lies outside this point.
//!   Only meaningful as the first segment.
//! - `!DIRS!`: zero or more arbitrary directories.
//! - `!DIRS_N!`: exactly `N` arbitrary directories (`N >= 1`).
//!
//! Every other segment is a regex matched against a single directory name.

use crate::error::RuleCompileError;
use regex::Regex;
use std::fmt;
use tracing::warn;

/// Separator between rule segments. Never part of a directory name.
pub const SEPARATOR: char = '/';

const ROOT_LITERAL: &str = "!ROOT!";
const SKIP_VARIABLE_LITERAL: &str = "!DIRS!";
const SKIP_FIXED_PREFIX: &str = "!DIRS_";
const SKIP_FIXED_SUFFIX: &str = "!";

/// A prefix-anchored regex matched against one directory name.
#[derive(Clone)]
pub struct DirPattern {
    source: String,
    regex: Regex,
}

impl DirPattern {
    fn compile(source: &str, pattern: &str, index: usize) -> Result<Self, RuleCompileError> {
        let regex = anchored_regex(pattern).map_err(|e| RuleCompileError::DirectoryPattern {
            segment: source.to_string(),
            index,
            source: e,
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The segment text this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, dir_name: &str) -> bool {
        self.regex.is_match(dir_name)
    }
}

impl PartialEq for DirPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for DirPattern {}

impl fmt::Debug for DirPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DirPattern").field(&self.source).finish()
    }
}

/// One parsed segment of a directory rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `!ROOT!`
    Root,
    /// `!DIRS!`
    SkipVariable,
    /// `!DIRS_N!`, always `N >= 1`
    SkipFixed(usize),
    /// Any other segment
    DirName(DirPattern),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Root => f.write_str(ROOT_LITERAL),
            Token::SkipVariable => f.write_str(SKIP_VARIABLE_LITERAL),
            Token::SkipFixed(n) => write!(f, "{}{}{}", SKIP_FIXED_PREFIX, n, SKIP_FIXED_SUFFIX),
            Token::DirName(pattern) => f.write_str(pattern.as_str()),
        }
    }
}

/// Non-fatal problem found while tokenizing a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleDiagnostic {
    /// `!ROOT!/!DIRS!` says nothing more than `!DIRS!`.
    RedundantRoot,
    /// `!ROOT!` after the first segment.
    MisplacedRoot { index: usize },
    /// `!DIRS_...!` without a usable count; matched as a literal name instead.
    MalformedFixedSkip { segment: String },
    /// Empty segment from a leading, trailing or doubled `/`. It matches
    /// any directory name but never stands for the filesystem root.
    EmptySegment { index: usize },
}

impl fmt::Display for RuleDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleDiagnostic::RedundantRoot => {
                write!(f, "{} is unnecessary when followed by {}", ROOT_LITERAL, SKIP_VARIABLE_LITERAL)
            }
            RuleDiagnostic::MisplacedRoot { index } => {
                write!(f, "{} should be the first segment, found at segment {}", ROOT_LITERAL, index)
            }
            RuleDiagnostic::MalformedFixedSkip { segment } => write!(
                f,
                "'{}' has no positive directory count; matching it as a literal directory name",
                segment
            ),
            RuleDiagnostic::EmptySegment { index } => write!(
                f,
                "segment {} is empty and matches any directory; use {} to anchor at the root",
                index, ROOT_LITERAL
            ),
        }
    }
}

/// Output of [`tokenize`]: tokens in root-to-parent order plus diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<RuleDiagnostic>,
}

/// Split a directory rule into tokens.
///
/// Fails only when a directory-name segment is not a valid regex.
pub fn tokenize(raw: &str) -> Result<Tokenized, RuleCompileError> {
    let mut out = Tokenized::default();

    for (index, segment) in raw.split(SEPARATOR).enumerate() {
        let token = classify_segment(segment, index, &mut out.diagnostics)?;
        if segment.is_empty() {
            out.diagnostics.push(RuleDiagnostic::EmptySegment { index });
        }
        if token == Token::Root && index > 0 {
            out.diagnostics.push(RuleDiagnostic::MisplacedRoot { index });
        }
        out.tokens.push(token);
    }

    if matches!(out.tokens.as_slice(), [Token::Root, Token::SkipVariable, ..]) {
        out.diagnostics.push(RuleDiagnostic::RedundantRoot);
    }

    for diagnostic in &out.diagnostics {
        warn!(rule = raw, "{}", diagnostic);
    }

    Ok(out)
}

fn classify_segment(
    segment: &str,
    index: usize,
    diagnostics: &mut Vec<RuleDiagnostic>,
) -> Result<Token, RuleCompileError> {
    match segment {
        ROOT_LITERAL => return Ok(Token::Root),
        SKIP_VARIABLE_LITERAL => return Ok(Token::SkipVariable),
        _ => {}
    }

    if let Some(count) = fixed_skip_count(segment) {
        return match count {
            Some(n) => Ok(Token::SkipFixed(n)),
            None => {
                diagnostics.push(RuleDiagnostic::MalformedFixedSkip {
                    segment: segment.to_string(),
                });
                let literal = regex::escape(segment);
                Ok(Token::DirName(DirPattern::compile(segment, &literal, index)?))
            }
        };
    }

    Ok(Token::DirName(DirPattern::compile(segment, segment, index)?))
}

/// `None` if the segment is not shaped like `!DIRS_...!` at all,
/// `Some(None)` if it is but the count is unusable.
fn fixed_skip_count(segment: &str) -> Option<Option<usize>> {
    let digits = segment
        .strip_prefix(SKIP_FIXED_PREFIX)?
        .strip_suffix(SKIP_FIXED_SUFFIX)?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Some(None);
    }
    Some(digits.parse::<usize>().ok().filter(|n| *n >= 1))
}

pub(crate) fn anchored_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})", pattern))
}
