//! Shared library for the eisencat tools.
//!
//! The crate parses StructureSynth EisenScript into the EisenXML rule model
//! used by Sverchok's generative-art node, catalogs example pairs (script +
//! JSON description) on disk, validates that both halves agree, and renders
//! reports. Public functions here form the contract the `eisen-catalog` and
//! `eisen-translate` binaries depend on.

use anyhow::Result;
use std::path::Path;

pub mod catalog;
pub mod config;
pub mod description;
pub mod report;
pub mod ruleset;
pub mod schema_loader;
pub mod script;
pub mod translate;
pub mod validation;
pub mod xml;

pub use catalog::{Catalog, Example, ExampleName, scan_catalog};
pub use config::CatalogConfig;
pub use description::{DescriptionError, ExampleDescription, load_description, parse_description};
pub use report::{Report, ReportFormat};
pub use ruleset::{Call, CallTarget, Numeric, Rule, RuleSet};
pub use schema_loader::DescriptionSchema;
pub use script::{ScriptError, parse_script};
pub use translate::{OutputFormat, translate_file, translate_source};
pub use validation::{Discrepancy, ValidationOutcome, Validator, validate_catalog};
pub use xml::to_eisenxml;

/// Scan, validate and summarise a catalog in one call.
///
/// Only an unusable root or schema is an error; per-example problems land in
/// the report.
pub fn run_catalog(config: &CatalogConfig, schema_path: Option<&Path>) -> Result<Report> {
    let validator = Validator::new(DescriptionSchema::resolve(schema_path)?);
    let catalog = scan_catalog(config)?;
    log::info!(
        "validating {} example(s) under {}",
        catalog.len(),
        config.root.display()
    );
    let outcomes = validate_catalog(&catalog, &validator);
    Ok(Report::new(&catalog, &outcomes))
}

/// Install the `env_logger` backend used by the binaries.
///
/// `RUST_LOG` wins when set; otherwise warnings are shown, or only errors
/// when `quiet` is requested.
pub fn init_logging(quiet: bool) {
    let default_filter = if quiet { "error" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
