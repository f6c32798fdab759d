//! Tokenizer for EisenScript source.
//!
//! Numbers are lexed loosely as runs of `0-9 . + - / ( )` so arithmetic
//! operands survive as text. A `*` is part of a number only when another
//! operand follows it (`2*3`); otherwise it is the loop multiplier.
//!
//! Rendering-only `set` directives are dropped here, before tokenizing the
//! rest of their line, since their values (`[0 0 -20]`, `list:a,b`) are not
//! EisenScript tokens.

use crate::script::ScriptError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Identifiers, keywords, shapes and colour values (`#ff0000`).
    Word(String),
    Number(String),
    LBrace,
    RBrace,
    Star,
    Greater,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::Word(word) => format!("'{word}'"),
            TokenKind::Number(number) => format!("number '{number}'"),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Greater => "'>'".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

const NUMBER_CHARS: &str = "0123456789.+-/()";

// `set` keys that only affect rendering. Matched by prefix, so
// `raytracer::shadows` counts as `raytracer`.
const IGNORED_SETTINGS: &[&str] = &[
    "seed",
    "maxobjects",
    "maxsize",
    "minsize",
    "background",
    "colorpool",
    "translation",
    "rotation",
    "pivot",
    "scale",
    "raytracer",
    "syncrandom",
];

struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    // Only whitespace/comments seen since the last newline.
    at_line_start: bool,
}

impl Cursor {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn rest_starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(idx, ch)| self.peek_at(idx) == Some(ch))
    }

    /// Whether the word after the current position names an ignored setting.
    fn ignored_setting_ahead(&self) -> bool {
        let mut offset = 0;
        while self.peek_at(offset).is_some_and(|c| c == ' ' || c == '\t') {
            offset += 1;
        }
        let mut key = String::new();
        while let Some(c) = self
            .peek_at(offset)
            .filter(|c| c.is_ascii_alphanumeric() || matches!(*c, '_' | ':'))
        {
            key.push(c.to_ascii_lowercase());
            offset += 1;
        }
        IGNORED_SETTINGS
            .iter()
            .any(|setting| key.starts_with(setting))
    }

    fn skip_line(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.bump();
        }
    }

    fn take_while(&mut self, mut accept: impl FnMut(char, Option<char>) -> bool) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if !accept(ch, self.peek_at(1)) {
                break;
            }
            out.push(ch);
            self.bump();
        }
        out
    }
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, ScriptError> {
    let mut cursor = Cursor {
        chars: source.chars().collect(),
        pos: 0,
        line: 1,
        column: 1,
        at_line_start: true,
    };
    let mut tokens = Vec::new();

    while let Some(ch) = cursor.peek() {
        if ch.is_whitespace() {
            cursor.bump();
            continue;
        }

        let (line, column) = (cursor.line, cursor.column);

        if cursor.rest_starts_with("//") {
            while let Some(next) = cursor.peek() {
                if next == '\n' {
                    break;
                }
                cursor.bump();
            }
            continue;
        }

        if cursor.rest_starts_with("/*") {
            cursor.bump();
            cursor.bump();
            loop {
                if cursor.rest_starts_with("*/") {
                    cursor.bump();
                    cursor.bump();
                    break;
                }
                if cursor.bump().is_none() {
                    return Err(ScriptError::UnterminatedComment { line, column });
                }
            }
            continue;
        }

        let was_line_start = cursor.at_line_start;
        cursor.at_line_start = false;

        let kind = match ch {
            '{' => {
                cursor.bump();
                TokenKind::LBrace
            }
            '}' => {
                cursor.bump();
                TokenKind::RBrace
            }
            '>' => {
                cursor.bump();
                TokenKind::Greater
            }
            '*' => {
                cursor.bump();
                TokenKind::Star
            }
            '#' => {
                if was_line_start && cursor.rest_starts_with("#define") {
                    return Err(ScriptError::Preprocessor { line });
                }
                cursor.bump();
                let rest = cursor.take_while(|c, _| c.is_ascii_alphanumeric());
                TokenKind::Word(format!("#{rest}"))
            }
            c if c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '(') => {
                TokenKind::Number(cursor.take_while(|c, next| {
                    NUMBER_CHARS.contains(c)
                        || (c == '*'
                            && next.is_some_and(|n| n.is_ascii_digit() || matches!(n, '(' | '.')))
                }))
            }
            c if c.is_ascii_alphabetic() => {
                let word =
                    cursor.take_while(|c, _| c.is_ascii_alphanumeric() || matches!(c, '_' | ':'));
                if word.eq_ignore_ascii_case("set") && cursor.ignored_setting_ahead() {
                    cursor.skip_line();
                    continue;
                }
                TokenKind::Word(word)
            }
            other => {
                return Err(ScriptError::UnexpectedChar {
                    line,
                    column,
                    found: other,
                });
            }
        };

        tokens.push(Token { kind, line, column });
    }

    Ok(tokens)
}
