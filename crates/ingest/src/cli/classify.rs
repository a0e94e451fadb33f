//! Classify command - print the subtype of each given file

use super::output::{print_json, print_table, NO_SUBTYPE};
use anyhow::Result;
use ingest_subtype::SubtypeRegistry;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Arguments for the classify command
#[derive(Debug)]
pub struct ClassifyArgs {
    pub config: Option<PathBuf>,
    pub paths: Vec<PathBuf>,
    pub json: bool,
}

/// One classified file
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub path: String,
    pub subtype: Option<String>,
    pub format: Option<String>,
    /// Set when the path could not be matched at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Classification {
    fn subtype_label(&self) -> String {
        match (&self.subtype, &self.error) {
            (Some(name), _) => name.clone(),
            (None, Some(err)) => format!("{} ({})", NO_SUBTYPE, err),
            (None, None) => NO_SUBTYPE.to_string(),
        }
    }
}

/// Classify one absolute path against the registry.
pub fn classify(registry: &SubtypeRegistry, path: &Path) -> Classification {
    let display_path = path.display().to_string();
    match registry.determine_path(path) {
        Ok(Some(subtype)) => Classification {
            path: display_path,
            subtype: Some(subtype.name().to_string()),
            format: Some(subtype.format().to_string()),
            error: None,
        },
        Ok(None) => Classification {
            path: display_path,
            subtype: None,
            format: None,
            error: None,
        },
        Err(e) => {
            warn!(path = %display_path, "cannot classify: {}", e);
            Classification {
                path: display_path,
                subtype: None,
                format: None,
                error: Some(e.to_string()),
            }
        }
    }
}

pub fn run(args: ClassifyArgs) -> Result<()> {
    let registry = super::load_registry(args.config.as_deref())?;

    let mut results = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        let absolute = super::absolute_path(path)?;
        results.push(classify(&registry, &absolute));
    }

    if args.json {
        return print_json(&results);
    }

    let rows = results
        .iter()
        .map(|c| vec![c.path.clone(), c.subtype_label()])
        .collect();
    print_table(&["PATH", "SUBTYPE"], rows);
    Ok(())
}
