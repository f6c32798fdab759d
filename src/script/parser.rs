//! Recursive-descent parser over the token stream.

use crate::script::ast::{CallSite, Loop, RuleDef, Script, Target, Transform, TransformOp};
use crate::script::lexer::{Token, TokenKind, tokenize};
use crate::script::{ScriptError, canonical_shape};

const COLOUR_OPS: &[&str] = &["h", "hue", "sat", "b", "brightness", "a", "alpha", "m"];

/// Parse EisenScript source into a [`Script`].
pub fn parse_script(source: &str) -> Result<Script, ScriptError> {
    let tokens = tokenize(source)?;
    Parser { tokens, pos: 0 }.parse()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn parse(mut self) -> Result<Script, ScriptError> {
        let mut script = Script::default();
        while let Some(token) = self.peek() {
            if is_keyword(token, "set") {
                script.max_depth = Some(self.parse_set()?);
            } else if is_keyword(token, "rule") {
                script.rules.push(self.parse_rule()?);
            } else {
                script.entry.push(self.parse_call()?);
            }
        }
        if script.entry.is_empty() {
            return Err(ScriptError::EmptyEntry);
        }
        Ok(script)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|tok| &tok.kind)
    }

    fn next(&mut self, expected: &str) -> Result<Token, ScriptError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| ScriptError::UnexpectedEof {
                expected: expected.to_string(),
            })?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ScriptError> {
        let token = self.next(expected)?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(&token, expected))
        }
    }

    fn expect_word(&mut self, expected: &str) -> Result<(String, Token), ScriptError> {
        let token = self.next(expected)?;
        match &token.kind {
            TokenKind::Word(word) => Ok((word.clone(), token)),
            _ => Err(unexpected(&token, expected)),
        }
    }

    fn expect_number(&mut self, expected: &str) -> Result<String, ScriptError> {
        let token = self.next(expected)?;
        match token.kind {
            TokenKind::Number(number) => Ok(number),
            _ => Err(unexpected(&token, expected)),
        }
    }

    /// Returns the new global max depth.
    fn parse_set(&mut self) -> Result<String, ScriptError> {
        self.next("'set'")?;
        let (key, key_token) = self.expect_word("setting name")?;
        let lowered = key.to_ascii_lowercase();
        if lowered == "maxdepth" || lowered == "md" {
            return self.expect_number("max depth value");
        }
        // Rendering-only settings never reach the parser.
        Err(ScriptError::UnknownSetting {
            line: key_token.line,
            key,
        })
    }

    fn parse_rule(&mut self) -> Result<RuleDef, ScriptError> {
        let rule_token = self.next("'rule'")?;
        let (name, name_token) = self.expect_word("rule name")?;
        if !is_rule_name(&name) {
            return Err(unexpected(&name_token, "rule name"));
        }

        let mut rule = RuleDef {
            name,
            weight: None,
            max_depth: None,
            successor: None,
            body: Vec::new(),
            line: rule_token.line,
        };

        loop {
            let Some(token) = self.peek() else {
                return Err(ScriptError::UnexpectedEof {
                    expected: "'{'".to_string(),
                });
            };
            if is_keyword(token, "md") || is_keyword(token, "maxdepth") {
                if rule.max_depth.is_some() {
                    return Err(duplicate(&rule, "maxdepth"));
                }
                self.pos += 1;
                rule.max_depth = Some(self.expect_number("max depth value")?);
                if matches!(self.peek_kind_at(0), Some(TokenKind::Greater)) {
                    self.pos += 1;
                    let (successor, token) = self.expect_word("successor rule name")?;
                    if !is_rule_name(&successor) {
                        return Err(unexpected(&token, "successor rule name"));
                    }
                    rule.successor = Some(successor);
                }
            } else if is_keyword(token, "w") || is_keyword(token, "weight") {
                if rule.weight.is_some() {
                    return Err(duplicate(&rule, "weight"));
                }
                self.pos += 1;
                rule.weight = Some(self.expect_number("weight value")?);
            } else {
                break;
            }
        }

        self.expect(TokenKind::LBrace, "'{'")?;
        loop {
            match self.peek_kind_at(0) {
                Some(TokenKind::RBrace) => {
                    self.pos += 1;
                    break;
                }
                Some(_) => rule.body.push(self.parse_call()?),
                None => {
                    return Err(ScriptError::UnexpectedEof {
                        expected: format!("'}}' closing rule '{}'", rule.name),
                    });
                }
            }
        }
        Ok(rule)
    }

    fn parse_call(&mut self) -> Result<CallSite, ScriptError> {
        let line = self.peek().map(|tok| tok.line).unwrap_or_default();
        let mut loops = Vec::new();
        loop {
            match self.peek_kind_at(0) {
                Some(TokenKind::LBrace) => loops.push(self.parse_loop(None)?),
                Some(TokenKind::Number(_)) => {
                    let count = self.expect_number("loop count")?;
                    self.expect(TokenKind::Star, "'*' after loop count")?;
                    loops.push(self.parse_loop(Some(count))?);
                }
                _ => break,
            }
        }

        let (word, token) = self.expect_word("rule or shape name")?;
        let target = if let Some(shape) = canonical_shape(&word) {
            Target::Shape(shape)
        } else if is_rule_name(&word) {
            Target::Rule(word)
        } else {
            return Err(unexpected(&token, "rule or shape name"));
        };

        Ok(CallSite {
            loops,
            target,
            line,
        })
    }

    fn parse_loop(&mut self, count: Option<String>) -> Result<Loop, ScriptError> {
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut transforms = Vec::new();
        loop {
            let token = self.next("transformation or '}'")?;
            let word = match &token.kind {
                TokenKind::RBrace => break,
                TokenKind::Word(word) => word.to_ascii_lowercase(),
                _ => return Err(unexpected(&token, "transformation or '}'")),
            };

            if let Some(op) = TransformOp::from_keyword(&word) {
                transforms.push(Transform {
                    op,
                    values: self.numbers_after(&word)?,
                });
            } else if COLOUR_OPS.contains(&word.as_str()) {
                self.numbers_after(&word)?;
            } else if word == "color" {
                self.colour_value()?;
            } else if word == "blend" {
                self.colour_value()?;
                self.expect_number("blend strength")?;
            } else {
                return Err(ScriptError::UnknownTransform {
                    line: token.line,
                    column: token.column,
                    name: word,
                });
            }
        }
        Ok(Loop { count, transforms })
    }

    fn numbers_after(&mut self, op: &str) -> Result<Vec<String>, ScriptError> {
        let mut values = vec![self.expect_number(&format!("value for '{op}'"))?];
        while let Some(TokenKind::Number(number)) = self.peek_kind_at(0) {
            values.push(number.clone());
            self.pos += 1;
        }
        Ok(values)
    }

    fn colour_value(&mut self) -> Result<(), ScriptError> {
        let token = self.next("colour value")?;
        match token.kind {
            TokenKind::Word(_) | TokenKind::Number(_) => Ok(()),
            _ => Err(unexpected(&token, "colour value")),
        }
    }
}

fn is_keyword(token: &Token, keyword: &str) -> bool {
    matches!(&token.kind, TokenKind::Word(word) if word.eq_ignore_ascii_case(keyword))
}

fn is_rule_name(word: &str) -> bool {
    let mut chars = word.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !word.eq_ignore_ascii_case("rule")
        && !word.eq_ignore_ascii_case("set")
}

fn unexpected(token: &Token, expected: &str) -> ScriptError {
    ScriptError::Unexpected {
        line: token.line,
        column: token.column,
        expected: expected.to_string(),
        found: token.kind.describe(),
    }
}

fn duplicate(rule: &RuleDef, modifier: &'static str) -> ScriptError {
    ScriptError::DuplicateModifier {
        line: rule.line,
        rule: rule.name.clone(),
        modifier,
    }
}
