//! Scan configuration shared by the library and the binaries.
//!
//! Binaries build a `CatalogConfig` from CLI flags with environment
//! fallbacks; library code only ever sees the resolved struct.

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

pub const ROOT_ENV: &str = "EISEN_CATALOG_ROOT";
pub const FORMAT_ENV: &str = "EISEN_CATALOG_FORMAT";
pub const SCHEMA_ENV: &str = "EISEN_CATALOG_SCHEMA";

pub const DEFAULT_SCRIPT_EXTENSION: &str = "es";
pub const DEFAULT_DATA_EXTENSION: &str = "json";

/// Which directory to scan and how pair members are recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub root: PathBuf,
    pub script_extension: String,
    pub data_extension: String,
}

impl CatalogConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            script_extension: DEFAULT_SCRIPT_EXTENSION.to_string(),
            data_extension: DEFAULT_DATA_EXTENSION.to_string(),
        }
    }

    /// Override the pair extensions. Leading dots are stripped; the two must
    /// differ or every file would pair with itself.
    pub fn with_extensions(mut self, script: &str, data: &str) -> Result<Self> {
        let script = normalize_extension(script);
        let data = normalize_extension(data);
        if script.is_empty() || data.is_empty() {
            bail!("pair extensions must not be empty");
        }
        if script == data {
            bail!("script and data extensions must differ, both are '{script}'");
        }
        self.script_extension = script;
        self.data_extension = data;
        Ok(self)
    }

    pub fn is_script(&self, path: &Path) -> bool {
        has_extension(path, &self.script_extension)
    }

    pub fn is_data(&self, path: &Path) -> bool {
        has_extension(path, &self.data_extension)
    }
}

fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn has_extension(path: &Path, expected: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_normalized_and_matched_caselessly() {
        let config = CatalogConfig::new("examples-root")
            .with_extensions(".ES", "Json")
            .expect("valid extensions");
        assert_eq!(config.script_extension, "es");
        assert!(config.is_script(Path::new("a/b/menger.Es")));
        assert!(config.is_data(Path::new("menger.JSON")));
        assert!(!config.is_data(Path::new("menger.es.xml")));
    }

    #[test]
    fn identical_or_empty_extensions_are_rejected() {
        assert!(CatalogConfig::new(".").with_extensions("es", ".es").is_err());
        assert!(CatalogConfig::new(".").with_extensions("", "json").is_err());
    }
}
