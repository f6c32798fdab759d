//! EisenScript front end.
//!
//! Parses the subset of StructureSynth's EisenScript that the Sverchok
//! generative-art node understands: global max depth, rule definitions with
//! weight/max-depth/successor modifiers, loop blocks of geometric transforms,
//! and primitive shape instances. Colour, blending and raytracer commands are
//! recognised so well-formed scripts parse, then dropped from the AST.

pub mod ast;
mod lexer;
mod parser;

pub use ast::{CallSite, Loop, RuleDef, Script, Target, Transform, TransformOp};
pub use parser::parse_script;

use thiserror::Error;

/// Shapes the node can instance; anything else in call position is a rule.
pub const SHAPES: &[&str] = &["box", "grid", "sphere", "line"];

/// Errors raised while tokenizing or parsing a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("line {line}, column {column}: unexpected character '{found}'")]
    UnexpectedChar {
        line: usize,
        column: usize,
        found: char,
    },
    #[error("line {line}, column {column}: unterminated block comment")]
    UnterminatedComment { line: usize, column: usize },
    #[error("line {line}: preprocessor directives (#define) are not supported")]
    Preprocessor { line: usize },
    #[error("line {line}, column {column}: expected {expected}, found {found}")]
    Unexpected {
        line: usize,
        column: usize,
        expected: String,
        found: String,
    },
    #[error("unexpected end of script: expected {expected}")]
    UnexpectedEof { expected: String },
    #[error("line {line}: unknown setting '{key}'")]
    UnknownSetting { line: usize, key: String },
    #[error("line {line}, column {column}: unknown transformation '{name}'")]
    UnknownTransform {
        line: usize,
        column: usize,
        name: String,
    },
    #[error("line {line}: rule '{rule}' declares {modifier} more than once")]
    DuplicateModifier {
        line: usize,
        rule: String,
        modifier: &'static str,
    },
    #[error("script has no entry calls")]
    EmptyEntry,
}

/// Split a shape token into its canonical form (`box`, `sphere::shiny`).
///
/// Returns `None` when the base is not a known shape or the `::` suffix is
/// empty.
pub fn canonical_shape(word: &str) -> Option<String> {
    let (base, suffix) = match word.find("::") {
        Some(idx) if word.len() > idx + 2 => (&word[..idx], &word[idx..]),
        Some(_) => return None,
        None => (word, ""),
    };
    let base = base.to_ascii_lowercase();
    SHAPES
        .contains(&base.as_str())
        .then(|| format!("{base}{suffix}"))
}
