//! Per-example validation.
//!
//! Each example is checked for pair completeness, then each half is parsed,
//! then the two rule sets are compared. Findings are collected rather than
//! short-circuiting so one run surfaces everything wrong with an example;
//! nothing here aborts the scan.

use crate::catalog::{Catalog, Example, ExampleName};
use crate::description::load_description;
use crate::ruleset::{Call, CallTarget, Numeric, Rule, RuleSet};
use crate::schema_loader::DescriptionSchema;
use log::debug;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which half of a pair a finding refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Script,
    Data,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Script => "script",
            Side::Data => "data",
        })
    }
}

/// One problem found with an example.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Discrepancy {
    #[error("script has no matching data file")]
    MissingData,
    #[error("data file has no matching script")]
    MissingScript,
    #[error("malformed script: {0}")]
    MalformedScript(String),
    #[error("malformed data: {0}")]
    MalformedData(String),
    #[error("{side}: rule '{caller}' calls undefined rule '{target}'")]
    UndefinedRule {
        side: Side,
        caller: String,
        target: String,
    },
    #[error("{side}: rule '{rule}' names undefined successor '{successor}'")]
    UndefinedSuccessor {
        side: Side,
        rule: String,
        successor: String,
    },
    #[error("max_depth differs: script={script} data={data}")]
    MaxDepthMismatch { script: String, data: String },
    #[error("rule '{0}' is only in the script")]
    RuleOnlyInScript(String),
    #[error("rule '{0}' is only in the data")]
    RuleOnlyInData(String),
    #[error("rule '{rule}' has {script} definition(s) in the script but {data} in the data")]
    VariantCountMismatch {
        rule: String,
        script: usize,
        data: usize,
    },
    #[error("rule '{rule}' #{variant} {parameter} differs: script={script} data={data}")]
    ParameterMismatch {
        rule: String,
        variant: usize,
        parameter: &'static str,
        script: String,
        data: String,
    },
    #[error("rule '{rule}' #{variant} call {index} differs: script=[{script}] data=[{data}]")]
    CallMismatch {
        rule: String,
        variant: usize,
        index: usize,
        script: String,
        data: String,
    },
}

/// Outcome for one example.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub name: ExampleName,
    pub script: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub discrepancies: Vec<Discrepancy>,
}

impl ValidationOutcome {
    pub fn passed(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// Validates examples against a description schema.
pub struct Validator {
    schema: DescriptionSchema,
}

impl Validator {
    pub fn new(schema: DescriptionSchema) -> Self {
        Self { schema }
    }

    pub fn validate(&self, example: &Example) -> ValidationOutcome {
        let discrepancies = match (&example.script, &example.data) {
            (Some(_), None) => vec![Discrepancy::MissingData],
            (None, Some(_)) => vec![Discrepancy::MissingScript],
            (None, None) => Vec::new(),
            (Some(script), Some(data)) => self.check_pair(script, data),
        };
        debug!(
            "validated {}: {} discrepancy(ies)",
            example.name,
            discrepancies.len()
        );
        ValidationOutcome {
            name: example.name.clone(),
            script: example.script.clone(),
            data: example.data.clone(),
            discrepancies,
        }
    }

    fn check_pair(&self, script_path: &Path, data_path: &Path) -> Vec<Discrepancy> {
        let mut discrepancies = Vec::new();

        let script = fs::read_to_string(script_path)
            .map_err(|err| format!("unable to read: {err}"))
            .and_then(|text| RuleSet::from_source(&text).map_err(|err| err.to_string()));
        let script = match script {
            Ok(rules) => Some(rules),
            Err(message) => {
                discrepancies.push(Discrepancy::MalformedScript(message));
                None
            }
        };

        let data = match load_description(data_path, &self.schema) {
            Ok(description) => Some(description.rule_set),
            Err(err) => {
                discrepancies.push(Discrepancy::MalformedData(err.to_string()));
                None
            }
        };

        if let Some(rules) = &script {
            discrepancies.extend(undefined_references(rules, Side::Script));
        }
        if let Some(rules) = &data {
            discrepancies.extend(undefined_references(rules, Side::Data));
        }
        if let (Some(script), Some(data)) = (&script, &data) {
            discrepancies.extend(compare_rule_sets(script, data));
        }
        discrepancies
    }
}

/// Validate every example in catalog order.
pub fn validate_catalog(catalog: &Catalog, validator: &Validator) -> Vec<ValidationOutcome> {
    catalog
        .examples()
        .iter()
        .map(|example| validator.validate(example))
        .collect()
}

/// Calls and successors that name rules the set does not define.
pub fn undefined_references(rule_set: &RuleSet, side: Side) -> Vec<Discrepancy> {
    let defined: BTreeSet<&str> = rule_set.rules.iter().map(|r| r.name.as_str()).collect();
    let mut found = Vec::new();
    // Report each missing (caller, target) once even if called repeatedly.
    let mut seen = BTreeSet::new();
    for rule in &rule_set.rules {
        for call in &rule.calls {
            let CallTarget::Rule(target) = &call.target else {
                continue;
            };
            if defined.contains(target.as_str()) || !seen.insert((&rule.name, target)) {
                continue;
            }
            found.push(Discrepancy::UndefinedRule {
                side,
                caller: rule.name.clone(),
                target: target.clone(),
            });
        }
        if let Some(successor) = &rule.successor {
            if !defined.contains(successor.as_str()) {
                found.push(Discrepancy::UndefinedSuccessor {
                    side,
                    rule: rule.name.clone(),
                    successor: successor.clone(),
                });
            }
        }
    }
    found
}

/// Compare the parameter sets of two rule sets.
///
/// Rules are grouped by name; same-named (ambiguous) rules are matched in
/// declaration order.
pub fn compare_rule_sets(script: &RuleSet, data: &RuleSet) -> Vec<Discrepancy> {
    let mut found = Vec::new();
    if script.max_depth != data.max_depth {
        found.push(Discrepancy::MaxDepthMismatch {
            script: script.max_depth.canonical(),
            data: data.max_depth.canonical(),
        });
    }

    let script_names = rule_names(script);
    let data_names = rule_names(data);
    for name in script_names.difference(&data_names) {
        found.push(Discrepancy::RuleOnlyInScript(name.to_string()));
    }
    for name in data_names.difference(&script_names) {
        found.push(Discrepancy::RuleOnlyInData(name.to_string()));
    }

    for name in script_names.intersection(&data_names) {
        let script_variants: Vec<&Rule> = script.variants(name).collect();
        let data_variants: Vec<&Rule> = data.variants(name).collect();
        if script_variants.len() != data_variants.len() {
            found.push(Discrepancy::VariantCountMismatch {
                rule: name.to_string(),
                script: script_variants.len(),
                data: data_variants.len(),
            });
            continue;
        }
        for (variant, (left, right)) in script_variants.iter().zip(&data_variants).enumerate() {
            compare_rules(left, right, variant + 1, &mut found);
        }
    }
    found
}

fn rule_names(rule_set: &RuleSet) -> BTreeSet<&str> {
    rule_set.rules.iter().map(|r| r.name.as_str()).collect()
}

fn compare_rules(script: &Rule, data: &Rule, variant: usize, found: &mut Vec<Discrepancy>) {
    let mut parameter = |parameter: &'static str, left: Option<String>, right: Option<String>| {
        if left != right {
            found.push(Discrepancy::ParameterMismatch {
                rule: script.name.clone(),
                variant,
                parameter,
                script: left.unwrap_or_else(|| "-".to_string()),
                data: right.unwrap_or_else(|| "-".to_string()),
            });
        }
    };
    parameter(
        "weight",
        script.weight.as_ref().map(Numeric::canonical),
        data.weight.as_ref().map(Numeric::canonical),
    );
    parameter(
        "max_depth",
        script.max_depth.as_ref().map(Numeric::canonical),
        data.max_depth.as_ref().map(Numeric::canonical),
    );
    parameter("successor", script.successor.clone(), data.successor.clone());
    parameter(
        "call count",
        Some(script.calls.len().to_string()),
        Some(data.calls.len().to_string()),
    );

    for (index, (left, right)) in script.calls.iter().zip(&data.calls).enumerate() {
        let (left, right) = (call_signature(left), call_signature(right));
        if left != right {
            found.push(Discrepancy::CallMismatch {
                rule: script.name.clone(),
                variant,
                index: index + 1,
                script: left,
                data: right,
            });
        }
    }
}

fn call_signature(call: &Call) -> String {
    let transforms = call.transforms.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut signature = call.target.to_string();
    if let Some(count) = &call.count {
        signature.push_str(&format!(" x{}", count.canonical()));
    }
    if !transforms.is_empty() {
        signature.push_str(&format!(" {{{transforms}}}"));
    }
    signature
}
