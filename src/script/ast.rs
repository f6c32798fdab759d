//! Syntax tree produced by [`parse_script`](super::parse_script).
//!
//! Numeric operands stay as source text; EisenScript allows simple
//! arithmetic (`360/36`) and the node evaluates it, not us.

/// Parsed script: optional global max depth, entry calls, rule definitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    pub max_depth: Option<String>,
    pub entry: Vec<CallSite>,
    pub rules: Vec<RuleDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDef {
    pub name: String,
    pub weight: Option<String>,
    pub max_depth: Option<String>,
    pub successor: Option<String>,
    pub body: Vec<CallSite>,
    pub line: usize,
}

/// A call to a rule or shape, prefixed by zero or more loop blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub loops: Vec<Loop>,
    pub target: Target,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Rule(String),
    Shape(String),
}

impl Target {
    pub fn name(&self) -> &str {
        match self {
            Target::Rule(name) | Target::Shape(name) => name,
        }
    }
}

/// `[count *] { transforms }`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Loop {
    pub count: Option<String>,
    pub transforms: Vec<Transform>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    pub op: TransformOp,
    pub values: Vec<String>,
}

/// Geometric transformations kept by the node. Colour operators are dropped
/// during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOp {
    X,
    Y,
    Z,
    Rx,
    Ry,
    Rz,
    S,
}

impl TransformOp {
    pub(crate) fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "x" => Some(TransformOp::X),
            "y" => Some(TransformOp::Y),
            "z" => Some(TransformOp::Z),
            "rx" => Some(TransformOp::Rx),
            "ry" => Some(TransformOp::Ry),
            "rz" => Some(TransformOp::Rz),
            "s" => Some(TransformOp::S),
            _ => None,
        }
    }
}
