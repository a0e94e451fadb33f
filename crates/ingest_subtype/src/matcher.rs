//! Path matching automaton
//!
//! The directory rule and the candidate's ancestor directories are walked
//! together from the innermost end (the file's parent) outward. Each step
//! looks at one token and decides whether to consume directories, move to
//! the next token, or settle the verdict. Decisions are never revisited, so
//! a run is linear in the number of tokens plus the path depth.
//!
//! All cursor state lives in a [`Run`] created per call; a [`RuleSet`] is
//! only ever read.

use crate::path::CandidatePath;
use crate::rules::RuleSet;
use crate::tokens::Token;
use std::fmt;
use tracing::{trace, warn};

/// Non-fatal observation made while matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDiagnostic {
    /// `!ROOT!` was reached right after `!DIRS!` had absorbed directories.
    RedundantRoot,
}

impl fmt::Display for MatchDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchDiagnostic::RedundantRoot => f.write_str("!ROOT! is unnecessary when followed by !DIRS!"),
        }
    }
}

/// Outcome of matching one rule against one path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    pub name: bool,
    pub directories: bool,
    pub diagnostics: Vec<MatchDiagnostic>,
}

impl Verdict {
    /// Both halves are required.
    pub fn matched(&self) -> bool {
        self.name && self.directories
    }
}

/// Whether `path` satisfies `rules`: base name and directories must both match.
pub fn matches(rules: &RuleSet, path: &CandidatePath) -> bool {
    name_matches(rules, path) && directories_match(rules, path)
}

/// Whether the base name matches the name pattern. `false` without one.
pub fn name_matches(rules: &RuleSet, path: &CandidatePath) -> bool {
    rules
        .name_pattern()
        .is_some_and(|re| re.is_match(path.base_name()))
}

/// Whether the ancestor directories satisfy the directory rule. `false` without one.
pub fn directories_match(rules: &RuleSet, path: &CandidatePath) -> bool {
    match rules.directory_tokens() {
        Some(tokens) => Run::new(tokens, path.components()).finish().0,
        None => false,
    }
}

/// Evaluate both halves and collect match-time diagnostics.
pub fn explain(rules: &RuleSet, path: &CandidatePath) -> Verdict {
    let name = name_matches(rules, path);
    let (directories, diagnostics) = match rules.directory_tokens() {
        Some(tokens) => Run::new(tokens, path.components()).finish(),
        None => (false, Vec::new()),
    };
    trace!(
        base_name = path.base_name(),
        name,
        directories,
        "rule evaluated"
    );
    Verdict {
        name,
        directories,
        diagnostics,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchState {
    Undetermined,
    Succeeded,
    Failed,
}

/// What the directory cursor currently points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot<'a> {
    Dir(&'a str),
    /// The filesystem root: past the outermost named directory.
    Root,
    /// Past the root.
    Exhausted,
}

/// One matching run. Cursors count steps taken from the innermost end.
struct Run<'a> {
    tokens: &'a [Token],
    dirs: &'a [String],
    token_pos: usize,
    dir_pos: usize,
    variable_skip: bool,
    state: MatchState,
    diagnostics: Vec<MatchDiagnostic>,
}

impl<'a> Run<'a> {
    fn new(tokens: &'a [Token], dirs: &'a [String]) -> Self {
        Self {
            tokens,
            dirs,
            token_pos: 0,
            dir_pos: 0,
            variable_skip: false,
            state: MatchState::Undetermined,
            diagnostics: Vec::new(),
        }
    }

    fn finish(mut self) -> (bool, Vec<MatchDiagnostic>) {
        if self.tokens.is_empty() {
            self.state = MatchState::Failed;
        }
        while self.state == MatchState::Undetermined {
            self.step();
            if self.state == MatchState::Undetermined {
                self.check_exhaustion();
            }
        }
        (self.state == MatchState::Succeeded, self.diagnostics)
    }

    fn token(&self) -> Option<&'a Token> {
        let tokens: &'a [Token] = self.tokens;
        tokens
            .len()
            .checked_sub(self.token_pos + 1)
            .map(|i| &tokens[i])
    }

    fn slot(&self) -> Slot<'a> {
        let dirs: &'a [String] = self.dirs;
        let len = dirs.len();
        if self.dir_pos < len {
            Slot::Dir(dirs[len - 1 - self.dir_pos].as_str())
        } else if self.dir_pos == len {
            Slot::Root
        } else {
            Slot::Exhausted
        }
    }

    /// Directories between the cursor and the root, the cursor's own included.
    fn dirs_remaining(&self) -> usize {
        self.dirs.len().saturating_sub(self.dir_pos)
    }

    fn step(&mut self) {
        let Some(token) = self.token() else {
            self.state = MatchState::Succeeded;
            return;
        };

        match token {
            Token::Root => self.eval_root(),
            Token::SkipFixed(n) => self.eval_skip_fixed(*n),
            Token::SkipVariable => {
                self.token_pos += 1;
                self.variable_skip = true;
            }
            Token::DirName(pattern) => {
                let is_match = matches!(self.slot(), Slot::Dir(name) if pattern.is_match(name));
                if is_match {
                    self.token_pos += 1;
                    self.dir_pos += 1;
                    self.variable_skip = false;
                } else if self.variable_skip {
                    self.dir_pos += 1;
                } else {
                    self.state = MatchState::Failed;
                }
            }
        }
    }

    fn eval_root(&mut self) {
        if self.slot() == Slot::Root {
            self.state = MatchState::Succeeded;
        } else if self.variable_skip {
            warn!("{}", MatchDiagnostic::RedundantRoot);
            self.diagnostics.push(MatchDiagnostic::RedundantRoot);
            self.state = MatchState::Succeeded;
        } else {
            self.state = MatchState::Failed;
        }
    }

    fn eval_skip_fixed(&mut self, n: usize) {
        if self.dirs_remaining() < n {
            self.state = MatchState::Failed;
            return;
        }
        self.dir_pos += n;
        self.token_pos += 1;

        // Outermost fixed skip: the skipped block must end at the root,
        // unless a `!DIRS!` just inside it may absorb the rest.
        if self.token().is_none() && !self.variable_skip && self.slot() != Slot::Root {
            self.state = MatchState::Failed;
        }
    }

    fn check_exhaustion(&mut self) {
        if self.token().is_none() {
            self.state = MatchState::Succeeded;
        } else if self.slot() == Slot::Exhausted {
            self.state = MatchState::Failed;
        }
    }
}
