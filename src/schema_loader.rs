//! JSON Schema loading for example descriptions.
//!
//! The canonical schema ships inside the binary; callers may point at another
//! file (via `--schema` or `EISEN_CATALOG_SCHEMA`) when iterating on the
//! description format.

use anyhow::{Context, Result, anyhow};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const CANONICAL_DESCRIPTION_SCHEMA_PATH: &str = "schema/example_description.schema.json";

const EMBEDDED_DESCRIPTION_SCHEMA: &str =
    include_str!("../schema/example_description.schema.json");

/// Compiled description schema plus a label for error messages.
pub struct DescriptionSchema {
    compiled: JSONSchema,
    source: String,
}

impl DescriptionSchema {
    /// The schema compiled into the crate.
    pub fn embedded() -> Result<Self> {
        let value: Value = serde_json::from_str(EMBEDDED_DESCRIPTION_SCHEMA)
            .context("parsing embedded description schema")?;
        Self::compile(&value, format!("embedded {CANONICAL_DESCRIPTION_SCHEMA_PATH}"))
    }

    /// Load a schema from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing schema {}", path.display()))?;
        Self::compile(&value, path.display().to_string())
    }

    /// Use `path` when given, the embedded schema otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    fn compile(value: &Value, source: String) -> Result<Self> {
        // Compile errors borrow the schema value; render them before returning.
        let compiled = JSONSchema::compile(value)
            .map_err(|err| anyhow!("compiling schema {source}: {err}"))?;
        Ok(Self { compiled, source })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every violation as `<instance path>: <message>`; empty when valid.
    pub fn violations(&self, instance: &Value) -> Vec<String> {
        match self.compiled.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|err| {
                    let location = err.instance_path.to_string();
                    if location.is_empty() {
                        err.to_string()
                    } else {
                        format!("{location}: {err}")
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::NamedTempFile;

    #[test]
    fn embedded_schema_accepts_minimal_description() {
        let schema = DescriptionSchema::embedded().expect("embedded schema");
        let value = json!({
            "max_depth": 100,
            "rules": [{"name": "entry", "calls": [{"shape": "box", "transforms": "tx 1"}]}]
        });
        assert!(schema.violations(&value).is_empty());
    }

    #[test]
    fn embedded_schema_reports_paths() {
        let schema = DescriptionSchema::embedded().expect("embedded schema");
        let value = json!({
            "rules": [{"name": "entry", "calls": [{"rule": "R1", "shape": "box"}]}]
        });
        let violations = schema.violations(&value);
        assert!(!violations.is_empty());
        assert!(
            violations.iter().any(|v| v.starts_with("/rules/0/calls/0")),
            "violations should point at the call: {violations:?}"
        );
    }

    #[test]
    fn schema_can_be_loaded_from_disk() {
        let mut file = NamedTempFile::new().expect("temp file");
        serde_json::to_writer(&mut file, &json!({"type": "object", "required": ["rules"]}))
            .expect("write schema");
        let schema = DescriptionSchema::from_path(file.path()).expect("load schema");
        assert_eq!(schema.violations(&json!({})).len(), 1);
        assert!(schema.source().ends_with(&file.path().display().to_string()));
    }
}
