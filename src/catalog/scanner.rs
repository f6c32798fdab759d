//! Directory walk that groups script/data files into examples.
//!
//! Pairing is by relative stem: `fractals/menger.es` and
//! `fractals/menger.json` form the example `fractals/menger`. Unpaired files
//! still produce an example so the validator can report the missing half.

use crate::catalog::identity::ExampleName;
use crate::catalog::model::{Catalog, Example};
use crate::config::CatalogConfig;
use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

#[derive(Default)]
struct PairSlots {
    script: Option<PathBuf>,
    data: Option<PathBuf>,
}

/// Walk `config.root` and collect every example.
///
/// The root must be an existing directory. Hidden files and directories are
/// skipped and symlinks are not followed. Unreadable entries are logged and
/// skipped rather than failing the scan.
pub fn scan_catalog(config: &CatalogConfig) -> Result<Catalog> {
    let root = &config.root;
    if !root.exists() {
        bail!("catalog root {} does not exist", root.display());
    }
    if !root.is_dir() {
        bail!("catalog root {} is not a directory", root.display());
    }

    let mut slots: BTreeMap<ExampleName, PairSlots> = BTreeMap::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {}: {err}", root.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_script = config.is_script(path);
        let is_data = config.is_data(path);
        if !is_script && !is_data {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .with_context(|| format!("{} is not under {}", path.display(), root.display()))?;
        let Some(name) = ExampleName::from_relative(relative) else {
            warn!("skipping {}: name is not valid UTF-8", path.display());
            continue;
        };

        debug!("found {} for example {name}", relative.display());
        let slot = slots.entry(name).or_default();
        if is_script {
            slot.script = Some(path.to_path_buf());
        } else {
            slot.data = Some(path.to_path_buf());
        }
    }

    let examples = slots
        .into_iter()
        .map(|(name, slot)| Example {
            name,
            script: slot.script,
            data: slot.data,
        })
        .collect();
    Ok(Catalog::new(root.clone(), examples))
}

pub(crate) fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &std::path::Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn pairs_by_relative_stem_and_sorts() {
        let temp = TempDir::new().expect("temp dir");
        let root = temp.path();
        touch(root, "spiral.es");
        touch(root, "spiral.json");
        touch(root, "fractals/menger.es");
        touch(root, "fractals/menger.json");
        touch(root, "fractals/menger.es.xml");
        touch(root, "README.md");

        let catalog = scan_catalog(&CatalogConfig::new(root)).expect("scan");
        let names: Vec<&str> = catalog.examples().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["fractals/menger", "spiral"]);
        assert!(catalog.examples().iter().all(Example::is_complete));
    }

    #[test]
    fn unpaired_files_still_produce_examples() {
        let temp = TempDir::new().expect("temp dir");
        touch(temp.path(), "lonely.es");
        touch(temp.path(), "orphan.json");

        let catalog = scan_catalog(&CatalogConfig::new(temp.path())).expect("scan");
        let lonely = catalog.get("lonely").expect("lonely");
        assert!(lonely.script.is_some() && lonely.data.is_none());
        let orphan = catalog.get("orphan").expect("orphan");
        assert!(orphan.script.is_none() && orphan.data.is_some());
    }

    #[test]
    fn hidden_entries_are_skipped() {
        let temp = TempDir::new().expect("temp dir");
        touch(temp.path(), ".git/objects/x.json");
        touch(temp.path(), ".draft.es");
        touch(temp.path(), "shown.es");

        let catalog = scan_catalog(&CatalogConfig::new(temp.path())).expect("scan");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("shown").is_some());
    }

    #[test]
    fn empty_directory_is_empty_catalog() {
        let temp = TempDir::new().expect("temp dir");
        let catalog = scan_catalog(&CatalogConfig::new(temp.path())).expect("scan");
        assert!(catalog.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = TempDir::new().expect("temp dir");
        let err = scan_catalog(&CatalogConfig::new(temp.path().join("absent")))
            .expect_err("missing root");
        assert!(err.to_string().contains("does not exist"));
    }
}
