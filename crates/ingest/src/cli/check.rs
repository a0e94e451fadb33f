//! Check command - evaluate an ad-hoc rule against one path

use super::output::yes_no;
use anyhow::{Context, Result};
use ingest_subtype::{explain, CandidatePath, RuleSet, RuleSpec};
use std::path::PathBuf;

/// Arguments for the check command
#[derive(Debug)]
pub struct CheckArgs {
    pub name: Option<String>,
    pub directories: Option<String>,
    pub path: PathBuf,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let spec = RuleSpec {
        name: args.name,
        directories: args.directories,
    };
    let rules = RuleSet::compile(&spec).context("Failed to compile rule")?;

    let absolute = super::absolute_path(&args.path)?;
    let candidate = CandidatePath::from_path(&absolute)
        .with_context(|| format!("Cannot match path: {}", absolute.display()))?;

    if let Some(tokens) = rules.directory_tokens() {
        let shown: Vec<String> = tokens.iter().map(|t| format!("[{}]", t)).collect();
        println!("tokens:      {}", shown.join(" "));
    }

    let verdict = explain(&rules, &candidate);
    println!("path:        {}", absolute.display());
    println!("name:        {}", yes_no(verdict.name));
    println!("directories: {}", yes_no(verdict.directories));
    println!("match:       {}", yes_no(verdict.matched()));

    for diagnostic in rules.diagnostics() {
        println!("warning:     {}", diagnostic);
    }
    for diagnostic in &verdict.diagnostics {
        println!("warning:     {}", diagnostic);
    }
    Ok(())
}
