//! File subtypes and subtype selection
//!
//! A subtype is a named profile for one category of input file: its base
//! format, the path rule that recognizes it, and format-specific layout
//! metadata for the parser that will eventually read it.

use crate::error::{Result, SubtypeError};
use crate::path::CandidatePath;
use crate::rules::{RuleSet, RuleSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Base format of a file. The subtype says which flavour of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Csv,
}

impl FileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where CSV data starts and what its columns are called.
///
/// Passed through to the parser untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvLayout {
    /// Zero-based index of the first data row
    #[serde(default)]
    pub first_row: usize,
    #[serde(default)]
    pub columns: Vec<String>,
}

fn default_file_format() -> String {
    FileFormat::Csv.as_str().to_string()
}

/// Subtype definition as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtypeSpec {
    pub name: String,
    #[serde(default = "default_file_format")]
    pub file_format: String,
    #[serde(default)]
    pub rules: RuleSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv: Option<CsvLayout>,
}

/// Format-specific layout of a subtype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    Csv(CsvLayout),
}

/// A compiled subtype.
#[derive(Debug, Clone)]
pub struct FileSubtype {
    name: String,
    rules: RuleSet,
    layout: Layout,
}

impl FileSubtype {
    /// Build a subtype from its definition, compiling its rule.
    pub fn from_spec(spec: SubtypeSpec) -> Result<Self> {
        let format = FileFormat::parse(&spec.file_format).ok_or_else(|| SubtypeError::UnsupportedFormat {
            subtype: spec.name.clone(),
            format: spec.file_format.clone(),
        })?;

        let rules = RuleSet::compile(&spec.rules).map_err(|source| SubtypeError::Rule {
            subtype: spec.name.clone(),
            source,
        })?;

        let layout = match format {
            FileFormat::Csv => Layout::Csv(spec.csv.unwrap_or_default()),
        };

        Ok(Self {
            name: spec.name,
            rules,
            layout,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> FileFormat {
        match self.layout {
            Layout::Csv(_) => FileFormat::Csv,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn csv_layout(&self) -> Option<&CsvLayout> {
        match &self.layout {
            Layout::Csv(layout) => Some(layout),
        }
    }

    /// Whether `path` belongs to this subtype.
    pub fn check_path(&self, path: &CandidatePath) -> bool {
        self.rules.matches(path)
    }
}

/// Ordered set of subtypes. Earlier subtypes take precedence.
#[derive(Debug, Clone, Default)]
pub struct SubtypeRegistry {
    subtypes: Vec<FileSubtype>,
}

impl SubtypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every definition, keeping declaration order.
    pub fn from_specs<I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = SubtypeSpec>,
    {
        let mut registry = Self::new();
        for spec in specs {
            registry.register(FileSubtype::from_spec(spec)?)?;
        }
        Ok(registry)
    }

    /// Append a subtype. Names must be unique.
    pub fn register(&mut self, subtype: FileSubtype) -> Result<()> {
        if self.get(subtype.name()).is_some() {
            return Err(SubtypeError::DuplicateSubtype(subtype.name().to_string()));
        }
        debug!(
            subtype = subtype.name(),
            name = ?subtype.rules().name_source(),
            directories = ?subtype.rules().directories_source(),
            "registered subtype"
        );
        self.subtypes.push(subtype);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FileSubtype> {
        self.subtypes.iter().find(|s| s.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileSubtype> {
        self.subtypes.iter()
    }

    pub fn len(&self) -> usize {
        self.subtypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subtypes.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.subtypes.iter().map(|s| s.name()).collect()
    }

    /// First subtype whose rule matches `path`.
    pub fn determine(&self, path: &CandidatePath) -> Option<&FileSubtype> {
        let found = self.subtypes.iter().find(|s| s.check_path(path));
        debug!(
            base_name = path.base_name(),
            subtype = ?found.map(|s| s.name()),
            "determined subtype"
        );
        found
    }

    /// Every subtype whose rule matches `path`, in registry order.
    pub fn matching(&self, path: &CandidatePath) -> Vec<&FileSubtype> {
        self.subtypes.iter().filter(|s| s.check_path(path)).collect()
    }

    /// [`determine`](Self::determine) for a filesystem path.
    pub fn determine_path(&self, path: &Path) -> Result<Option<&FileSubtype>> {
        let candidate = CandidatePath::from_path(path)?;
        Ok(self.determine(&candidate))
    }

    /// Distinct formats in use, first-seen order.
    pub fn formats(&self) -> Vec<FileFormat> {
        let mut seen = HashSet::new();
        self.subtypes
            .iter()
            .map(|s| s.format())
            .filter(|f| seen.insert(*f))
            .collect()
    }
}
