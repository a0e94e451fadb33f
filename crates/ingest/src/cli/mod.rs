//! Command implementations for the `ingest` binary

pub mod check;
pub mod classify;
pub mod output;
pub mod scan;
pub mod subtypes;

use anyhow::{Context, Result};
use ingest_subtype::{config::CONFIG_FILE_NAME, IngestConfig, SubtypeRegistry};
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Config file to use: the explicit one, else `<ingest home>/subtypes.toml`.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| ingest_logging::ingest_home().join(CONFIG_FILE_NAME))
}

/// Load the configuration and compile every subtype.
pub fn load_registry(explicit: Option<&Path>) -> Result<SubtypeRegistry> {
    let path = config_path(explicit);
    let config = IngestConfig::load(&path)
        .with_context(|| format!("Failed to load subtype configuration: {}", path.display()))?;
    let registry = config
        .registry()
        .with_context(|| format!("Invalid subtype configuration: {}", path.display()))?;
    info!(config = %path.display(), subtypes = registry.len(), "loaded subtypes");
    Ok(registry)
}

/// Make a user-supplied path absolute so it can be matched.
///
/// Normalization is lexical: `.` and `..` are folded, symlinks are kept as
/// given so the rule sees the directories the user named.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to read current directory")?
            .join(path)
    };
    Ok(normalize_lexically(&joined))
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            Component::Normal(name) => out.push(name),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_absolute_path_folds_dot_segments() {
        assert_eq!(
            absolute_path(Path::new("/a/./b/../c.csv")).unwrap(),
            PathBuf::from("/a/c.csv")
        );
        assert_eq!(
            absolute_path(Path::new("/../../x/f")).unwrap(),
            PathBuf::from("/x/f")
        );
    }

    #[test]
    fn test_absolute_path_joins_relative_to_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            absolute_path(Path::new("./data/f.csv")).unwrap(),
            cwd.join("data").join("f.csv")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_path_keeps_symlinked_directories() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let target = root.join("archive");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("f.csv"), "a\n").unwrap();
        let link = root.join("incoming");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let given = link.join("f.csv");
        assert_eq!(absolute_path(&given).unwrap(), given);
    }
}
