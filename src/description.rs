//! JSON half of an example pair.
//!
//! A description is the EisenXML rule set in JSON form plus optional
//! human-facing metadata (title, link to the write-up the example came from).
//! Loading is three-staged so errors say which layer rejected the file:
//! JSON syntax, schema, then typed deserialisation.

use crate::ruleset::RuleSet;
use crate::schema_loader::DescriptionSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Where the example is explained (blog post, forum thread).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub rule_set: RuleSet,
}

impl ExampleDescription {
    pub fn new(title: Option<String>, rule_set: RuleSet) -> Self {
        Self {
            title,
            source: None,
            rule_set,
        }
    }
}

#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("unable to read: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("schema violation: {}", .0.join("; "))]
    Schema(Vec<String>),
    #[error("unexpected structure: {0}")]
    Structure(#[source] serde_json::Error),
}

/// Parse and validate description text.
pub fn parse_description(
    text: &str,
    schema: &DescriptionSchema,
) -> Result<ExampleDescription, DescriptionError> {
    let value: Value = serde_json::from_str(text).map_err(DescriptionError::Json)?;
    let violations = schema.violations(&value);
    if !violations.is_empty() {
        return Err(DescriptionError::Schema(violations));
    }
    serde_json::from_value(value).map_err(DescriptionError::Structure)
}

/// Read, parse and validate a description file.
pub fn load_description(
    path: &Path,
    schema: &DescriptionSchema,
) -> Result<ExampleDescription, DescriptionError> {
    let text = fs::read_to_string(path)?;
    parse_description(&text, schema)
}
