//! Rendering of a validation pass.
//!
//! Reports are deterministic: examples appear in catalog order, paths are
//! shown relative to the catalog root, and nothing time-dependent is
//! included, so two runs over unchanged input produce identical output.

use crate::catalog::Catalog;
use crate::validation::ValidationOutcome;
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExampleReport {
    pub name: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    pub discrepancies: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    pub root: String,
    pub summary: Summary,
    pub examples: Vec<ExampleReport>,
}

impl Report {
    pub fn new(catalog: &Catalog, outcomes: &[ValidationOutcome]) -> Self {
        let examples: Vec<ExampleReport> = outcomes
            .iter()
            .map(|outcome| ExampleReport {
                name: outcome.name.to_string(),
                status: if outcome.passed() {
                    Status::Pass
                } else {
                    Status::Fail
                },
                script: outcome.script.as_deref().map(|p| catalog.display_path(p)),
                data: outcome.data.as_deref().map(|p| catalog.display_path(p)),
                discrepancies: outcome
                    .discrepancies
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            })
            .collect();
        let valid = examples
            .iter()
            .filter(|example| example.status == Status::Pass)
            .count();
        Report {
            root: catalog.root().display().to_string(),
            summary: Summary {
                total: examples.len(),
                valid,
                invalid: examples.len() - valid,
            },
            examples,
        }
    }

    pub fn all_valid(&self) -> bool {
        self.summary.invalid == 0
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => {
                let mut json = serde_json::to_string_pretty(self)?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        for example in &self.examples {
            let label = match example.status {
                Status::Pass => "PASS",
                Status::Fail => "FAIL",
            };
            let _ = writeln!(out, "{label}  {}", example.name);
            for discrepancy in &example.discrepancies {
                let _ = writeln!(out, "      - {discrepancy}");
            }
        }
        let _ = writeln!(
            out,
            "{} example(s) under {}: {} valid, {} invalid",
            self.summary.total, self.root, self.summary.valid, self.summary.invalid
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Example, ExampleName};
    use crate::validation::Discrepancy;
    use std::path::PathBuf;

    fn sample() -> (Catalog, Vec<ValidationOutcome>) {
        let root = PathBuf::from("/srv/examples");
        let good = Example {
            name: ExampleName("menger".into()),
            script: Some(root.join("menger.es")),
            data: Some(root.join("menger.json")),
        };
        let lonely = Example {
            name: ExampleName("spiral".into()),
            script: Some(root.join("spiral.es")),
            data: None,
        };
        let outcomes = vec![
            ValidationOutcome {
                name: good.name.clone(),
                script: good.script.clone(),
                data: good.data.clone(),
                discrepancies: Vec::new(),
            },
            ValidationOutcome {
                name: lonely.name.clone(),
                script: lonely.script.clone(),
                data: None,
                discrepancies: vec![Discrepancy::MissingData],
            },
        ];
        (Catalog::new(root, vec![good, lonely]), outcomes)
    }

    #[test]
    fn text_report_lists_findings_and_summary() {
        let (catalog, outcomes) = sample();
        let report = Report::new(&catalog, &outcomes);
        assert!(!report.all_valid());
        let text = report.render(ReportFormat::Text).expect("render");
        assert_eq!(
            text,
            "PASS  menger\n\
FAIL  spiral\n      - script has no matching data file\n\
2 example(s) under /srv/examples: 1 valid, 1 invalid\n"
        );
    }

    #[test]
    fn json_report_uses_relative_paths() {
        let (catalog, outcomes) = sample();
        let json = Report::new(&catalog, &outcomes)
            .render(ReportFormat::Json)
            .expect("render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["summary"]["invalid"], 1);
        assert_eq!(value["examples"][0]["script"], "menger.es");
        assert_eq!(value["examples"][1]["status"], "fail");
        assert!(value["examples"][1].get("data").is_none());
    }

    #[test]
    fn empty_catalog_reports_zero() {
        let catalog = Catalog::new("/srv/empty", Vec::new());
        let report = Report::new(&catalog, &[]);
        assert!(report.all_valid());
        assert_eq!(report.summary.total, 0);
    }
}
