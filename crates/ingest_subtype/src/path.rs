//! Candidate paths handed to the matcher

use crate::error::PathError;
use std::path::{Component, Path};

/// A file path split into its ancestor directories and base name.
///
/// `components` runs from the filesystem root (exclusive) to the file's
/// immediate parent. The root itself is implicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    components: Vec<String>,
    base_name: String,
}

impl CandidatePath {
    pub fn new<I, S>(components: I, base_name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components.into_iter().map(Into::into).collect(),
            base_name: base_name.into(),
        }
    }

    /// Split an absolute, normalized filesystem path.
    pub fn from_path(path: &Path) -> Result<Self, PathError> {
        if !path.is_absolute() {
            return Err(PathError::Relative(path.to_path_buf()));
        }

        let mut names = Vec::new();
        for component in path.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => {}
                Component::CurDir | Component::ParentDir => {
                    return Err(PathError::NotNormalized(path.to_path_buf()));
                }
                Component::Normal(name) => names.push(name.to_string_lossy().into_owned()),
            }
        }

        let base_name = names
            .pop()
            .ok_or_else(|| PathError::NoFileName(path.to_path_buf()))?;

        Ok(Self {
            components: names,
            base_name,
        })
    }

    /// Ancestor directory names, root side first.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }
}

impl TryFrom<&Path> for CandidatePath {
    type Error = PathError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        Self::from_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[cfg(unix)]
    #[test]
    fn test_from_absolute_path() {
        let p = CandidatePath::from_path(Path::new("/usr/local/file.txt")).unwrap();
        assert_eq!(p.components(), &["usr".to_string(), "local".to_string()]);
        assert_eq!(p.base_name(), "file.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_at_root() {
        let p = CandidatePath::from_path(Path::new("/file")).unwrap();
        assert!(p.components().is_empty());
        assert_eq!(p.base_name(), "file");
    }

    #[test]
    fn test_relative_rejected() {
        let err = CandidatePath::from_path(Path::new("data/file.csv")).unwrap_err();
        assert_eq!(err, PathError::Relative(PathBuf::from("data/file.csv")));
    }

    #[cfg(unix)]
    #[test]
    fn test_parent_dir_rejected() {
        let err = CandidatePath::from_path(Path::new("/data/../file.csv")).unwrap_err();
        assert!(matches!(err, PathError::NotNormalized(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_bare_root_has_no_file_name() {
        let err = CandidatePath::from_path(Path::new("/")).unwrap_err();
        assert!(matches!(err, PathError::NoFileName(_)));
    }

    #[test]
    fn test_new_from_parts() {
        let p = CandidatePath::new(["a", "b"], "c.csv");
        assert_eq!(p.components().len(), 2);
        assert_eq!(p.base_name(), "c.csv");
    }
}
