//! EisenXML rule model.
//!
//! This is the flattened form the Sverchok node consumes: every loop chain is
//! reduced to at most one loop per call by synthesising helper rules, and
//! transformation names are rewritten to the node's vocabulary. The same
//! types (de)serialise as the JSON half of an example pair.

use crate::script::{CallSite, Script, ScriptError, Target, Transform, TransformOp, parse_script};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Max depth used when a script does not `set maxdepth`.
pub const DEFAULT_MAX_DEPTH: &str = "1000";

/// Name of the implicit rule holding top-level calls.
pub const ENTRY_RULE: &str = "entry";

/// Numeric field kept as source text.
///
/// Equality is numeric when both sides parse as numbers (`2`, `2.0`), and
/// textual otherwise (`360/36`).
#[derive(Clone, Debug)]
pub struct Numeric(String);

impl Numeric {
    pub fn new(raw: impl Into<String>) -> Self {
        Numeric(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalised rendering used for comparison and display.
    pub fn canonical(&self) -> String {
        match self.0.parse::<f64>() {
            Ok(value) if value.is_finite() => format!("{value}"),
            _ => self.0.clone(),
        }
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Numeric {}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Numeric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Ok(int) = self.0.parse::<i64>() {
            return serializer.serialize_i64(int);
        }
        match self.0.parse::<f64>() {
            Ok(float) if float.is_finite() => serializer.serialize_f64(float),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NumericVisitor;

        impl Visitor<'_> for NumericVisitor {
            type Value = Numeric;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or numeric expression string")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Numeric, E> {
                Ok(Numeric(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Numeric, E> {
                Ok(Numeric(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Numeric, E> {
                Ok(Numeric(value.to_string()))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Numeric, E> {
                if value.trim().is_empty() {
                    return Err(E::invalid_value(de::Unexpected::Str(value), &self));
                }
                Ok(Numeric::new(value))
            }
        }

        deserializer.deserialize_any(NumericVisitor)
    }
}

fn default_max_depth() -> Numeric {
    Numeric::new(DEFAULT_MAX_DEPTH)
}

/// Complete rule set: `<rules max_depth=…>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default = "default_max_depth")]
    pub max_depth: Numeric,
    pub rules: Vec<Rule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successor: Option<String>,
    #[serde(default)]
    pub calls: Vec<Call>,
}

impl Rule {
    fn named(name: impl Into<String>) -> Self {
        Rule {
            name: name.into(),
            weight: None,
            max_depth: None,
            successor: None,
            calls: Vec::new(),
        }
    }
}

/// `<call rule=…>` or `<instance shape=…>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    #[serde(flatten)]
    pub target: CallTarget,
    #[serde(default)]
    pub transforms: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<Numeric>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallTarget {
    Rule(String),
    Shape(String),
}

impl CallTarget {
    pub fn name(&self) -> &str {
        match self {
            CallTarget::Rule(name) | CallTarget::Shape(name) => name,
        }
    }
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallTarget::Rule(name) => write!(f, "rule {name}"),
            CallTarget::Shape(name) => write!(f, "shape {name}"),
        }
    }
}

impl RuleSet {
    /// Parse and lower EisenScript source in one step.
    pub fn from_source(source: &str) -> Result<Self, ScriptError> {
        Ok(Self::from_script(&parse_script(source)?))
    }

    /// Lower a parsed script into the node's rule model.
    pub fn from_script(script: &Script) -> Self {
        let mut lowering = Lowering {
            rules: Vec::new(),
            counter: 0,
        };

        lowering.lower_rule(Rule::named(ENTRY_RULE), &script.entry);
        for def in &script.rules {
            let rule = Rule {
                name: def.name.clone(),
                weight: def.weight.as_deref().map(Numeric::new),
                max_depth: def.max_depth.as_deref().map(Numeric::new),
                successor: def.successor.clone(),
                calls: Vec::new(),
            };
            lowering.lower_rule(rule, &def.body);
        }

        RuleSet {
            max_depth: script
                .max_depth
                .as_deref()
                .map(Numeric::new)
                .unwrap_or_else(default_max_depth),
            rules: lowering.rules,
        }
    }

    /// Rules in declaration order for a given name (ambiguous rules repeat).
    pub fn variants<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |rule| rule.name == name)
    }
}

struct Lowering {
    rules: Vec<Rule>,
    counter: usize,
}

impl Lowering {
    /// Push `rule`, then any helper rules its calls needed.
    fn lower_rule(&mut self, mut rule: Rule, body: &[CallSite]) {
        let mut helpers = Vec::new();
        for site in body {
            rule.calls.push(self.lower_call(site, &mut helpers));
        }
        self.rules.push(rule);
        self.rules.extend(helpers);
    }

    fn lower_call(&mut self, site: &CallSite, helpers: &mut Vec<Rule>) -> Call {
        let final_target = match &site.target {
            Target::Rule(name) => CallTarget::Rule(name.clone()),
            Target::Shape(name) => CallTarget::Shape(name.clone()),
        };

        let Some((first, rest)) = site.loops.split_first() else {
            return Call {
                target: final_target,
                transforms: String::new(),
                count: None,
            };
        };

        // Each extra loop becomes a helper rule `<target>_NN` holding one call;
        // the chain ends at the original target.
        let mut next_target = final_target;
        let mut chain = Vec::with_capacity(rest.len());
        for _ in rest {
            chain.push(format!("{}_{:02}", site.target.name(), self.counter));
            self.counter += 1;
        }
        for (idx, lp) in rest.iter().enumerate().rev() {
            let mut helper = Rule::named(chain[idx].clone());
            helper.calls.push(Call {
                target: next_target,
                transforms: transform_string(&lp.transforms),
                count: lp.count.as_deref().map(Numeric::new),
            });
            next_target = CallTarget::Rule(helper.name.clone());
            helpers.push(helper);
        }
        // Helpers were built innermost-first; emit them outermost-first.
        let built = helpers.len() - rest.len();
        helpers[built..].reverse();

        Call {
            target: next_target,
            transforms: transform_string(&first.transforms),
            count: first.count.as_deref().map(Numeric::new),
        }
    }
}

/// Render a loop's transforms in node vocabulary (`x` → `tx`, `s n` → `sa n`).
pub fn transform_string(transforms: &[Transform]) -> String {
    transforms
        .iter()
        .map(|t| {
            let name = match t.op {
                TransformOp::X => "tx",
                TransformOp::Y => "ty",
                TransformOp::Z => "tz",
                TransformOp::Rx => "rx",
                TransformOp::Ry => "ry",
                TransformOp::Rz => "rz",
                TransformOp::S if t.values.len() == 1 => "sa",
                TransformOp::S => "s",
            };
            std::iter::once(name)
                .chain(t.values.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" ")
}
