//! Scan command - classify every file under a directory

use super::classify::{classify, Classification};
use super::output::{print_json, print_table, NO_SUBTYPE};
use anyhow::{bail, Result};
use ingest_subtype::SubtypeRegistry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Arguments for the scan command
#[derive(Debug)]
pub struct ScanArgs {
    pub config: Option<PathBuf>,
    pub path: PathBuf,
    pub depth: Option<usize>,
    pub json: bool,
}

/// Result of classifying a directory tree
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    pub root: String,
    pub files: Vec<Classification>,
    /// Subtype name -> file count
    pub counts: BTreeMap<String, usize>,
    pub unmatched: usize,
}

/// Walk `root` and classify each regular file.
pub fn scan_tree(registry: &SubtypeRegistry, root: &Path, depth: Option<usize>) -> ScanReport {
    let mut walker = WalkDir::new(root).sort_by_file_name();
    if let Some(depth) = depth {
        walker = walker.max_depth(depth);
    }

    let mut report = ScanReport {
        root: root.display().to_string(),
        ..Default::default()
    };

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let classification = classify(registry, entry.path());
        match &classification.subtype {
            Some(name) => *report.counts.entry(name.clone()).or_insert(0) += 1,
            None => report.unmatched += 1,
        }
        report.files.push(classification);
    }

    info!(
        root = %report.root,
        files = report.files.len(),
        unmatched = report.unmatched,
        "scan complete"
    );
    report
}

pub fn run(args: ScanArgs) -> Result<()> {
    let root = super::absolute_path(&args.path)?;
    if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }
    let registry = super::load_registry(args.config.as_deref())?;

    let report = scan_tree(&registry, &root, args.depth);

    if args.json {
        return print_json(&report);
    }

    let rows = report
        .files
        .iter()
        .map(|c| {
            let shown = Path::new(&c.path)
                .strip_prefix(&root)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| c.path.clone());
            vec![shown, c.subtype.clone().unwrap_or_else(|| NO_SUBTYPE.to_string())]
        })
        .collect();
    print_table(&["FILE", "SUBTYPE"], rows);

    for (name, count) in &report.counts {
        println!("{}: {}", name, count);
    }
    println!("unmatched: {}", report.unmatched);
    Ok(())
}
