//! Catalog records produced by the scanner.
//!
//! A `Catalog` is built once and then only read; examples keep the on-disk
//! locations of both pair members so the validator can load them lazily.

use crate::catalog::identity::ExampleName;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq)]
/// One discovered example. Either half may be missing.
pub struct Example {
    pub name: ExampleName,
    pub script: Option<PathBuf>,
    pub data: Option<PathBuf>,
}

impl Example {
    pub fn is_complete(&self) -> bool {
        self.script.is_some() && self.data.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Examples under one root, ordered by name.
pub struct Catalog {
    root: PathBuf,
    examples: Vec<Example>,
}

impl Catalog {
    /// Build a catalog, sorting examples by name.
    pub fn new(root: impl Into<PathBuf>, mut examples: Vec<Example>) -> Self {
        examples.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            root: root.into(),
            examples,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn get(&self, name: &str) -> Option<&Example> {
        self.examples.iter().find(|example| example.name.as_str() == name)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Path of `path` relative to the root, for display.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}
