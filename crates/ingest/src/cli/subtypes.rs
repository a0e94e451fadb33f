//! Subtypes command - list configured subtypes

use super::output::{print_json, print_table};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct SubtypeRow<'a> {
    name: &'a str,
    format: String,
    name_rule: Option<&'a str>,
    directories_rule: Option<&'a str>,
    warnings: Vec<String>,
}

pub fn run(config: Option<PathBuf>, json: bool) -> Result<()> {
    let registry = super::load_registry(config.as_deref())?;

    let rows: Vec<SubtypeRow<'_>> = registry
        .iter()
        .map(|s| SubtypeRow {
            name: s.name(),
            format: s.format().to_string(),
            name_rule: s.rules().name_source(),
            directories_rule: s.rules().directories_source(),
            warnings: s.rules().diagnostics().iter().map(|d| d.to_string()).collect(),
        })
        .collect();

    if json {
        return print_json(&rows);
    }

    let table_rows = rows
        .iter()
        .map(|r| {
            vec![
                r.name.to_string(),
                r.format.clone(),
                r.name_rule.unwrap_or("(none)").to_string(),
                r.directories_rule.unwrap_or("(none)").to_string(),
            ]
        })
        .collect();
    print_table(&["SUBTYPE", "FORMAT", "NAME", "DIRECTORIES"], table_rows);

    for row in &rows {
        for warning in &row.warnings {
            println!("{}: {}", row.name, warning);
        }
    }
    Ok(())
}
