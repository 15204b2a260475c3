//! Minimal CIF reader: data blocks, tag/value items and loops.
//!
//! Only what structure files in the database use is supported. Save frames,
//! global blocks and CIF2 lists/tables are not.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CofCheckError, Result};

// A number with an optional standard uncertainty, e.g. `12.345(6)`.
static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)(?:\(\d+\))?$").unwrap()
});

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Data(String),
    Loop,
    Tag(String),
    Value(String),
}

/// A `loop_` table.
#[derive(Debug, Clone, Default)]
pub struct CifLoop {
    /// Lower-cased tags, in column order.
    pub tags: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CifLoop {
    /// Column index of a tag (case-insensitive).
    pub fn column(&self, tag: &str) -> Option<usize> {
        let tag = tag.to_ascii_lowercase();
        self.tags.iter().position(|t| *t == tag)
    }
}

/// One `data_` block.
#[derive(Debug, Clone, Default)]
pub struct CifBlock {
    pub name: String,
    items: HashMap<String, String>,
    loops: Vec<CifLoop>,
}

impl CifBlock {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Value of a single-valued tag (case-insensitive).
    pub fn value(&self, tag: &str) -> Option<&str> {
        self.items
            .get(&tag.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Numeric value of a single-valued tag.
    pub fn number(&self, tag: &str) -> Option<f64> {
        self.value(tag).and_then(parse_number)
    }

    /// The loop containing `tag`.
    pub fn loop_with(&self, tag: &str) -> Option<&CifLoop> {
        self.loops.iter().find(|l| l.column(tag).is_some())
    }

    /// Values for `tag`, whether it is looped or a single item.
    pub fn values(&self, tag: &str) -> Vec<&str> {
        if let Some(lp) = self.loop_with(tag) {
            if let Some(col) = lp.column(tag) {
                return lp.rows.iter().map(|r| r[col].as_str()).collect();
            }
        }
        self.value(tag).into_iter().collect()
    }
}

/// Parse a CIF number, dropping the standard uncertainty.
///
/// `?` (unknown) and `.` (inapplicable) are `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let caps = NUMBER.captures(raw.trim())?;
    caps.get(1)?.as_str().parse().ok()
}

/// Split CIF text into data blocks.
pub fn parse_cif(text: &str) -> Result<Vec<CifBlock>> {
    let tokens = tokenize(text)?;
    let mut blocks: Vec<CifBlock> = Vec::new();
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        match token {
            Token::Data(name) => blocks.push(CifBlock::new(name)),
            Token::Loop => {
                let block = blocks.last_mut().ok_or_else(|| syntax("loop_ before data_"))?;

                let mut tags = Vec::new();
                while let Some(Token::Tag(tag)) = iter.next_if(|t| matches!(t, Token::Tag(_))) {
                    tags.push(tag);
                }
                let mut values = Vec::new();
                while let Some(Token::Value(value)) = iter.next_if(|t| matches!(t, Token::Value(_))) {
                    values.push(value);
                }

                if tags.is_empty() {
                    return Err(syntax("loop_ without tags"));
                }
                if values.len() % tags.len() != 0 {
                    return Err(syntax(&format!(
                        "loop with {} tags has {} values",
                        tags.len(),
                        values.len()
                    )));
                }

                let rows = values.chunks(tags.len()).map(|c| c.to_vec()).collect();
                block.loops.push(CifLoop { tags, rows });
            }
            Token::Tag(tag) => {
                let block = blocks
                    .last_mut()
                    .ok_or_else(|| syntax(&format!("{} before data_", tag)))?;
                match iter.next() {
                    Some(Token::Value(value)) => {
                        block.items.insert(tag, value);
                    }
                    _ => return Err(syntax(&format!("tag {} has no value", tag))),
                }
            }
            Token::Value(value) => {
                return Err(syntax(&format!("unexpected value '{}'", value)));
            }
        }
    }

    Ok(blocks)
}

fn syntax(message: &str) -> CofCheckError {
    CofCheckError::InvalidStructure(format!("CIF syntax: {}", message))
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        if let Some(rest) = line.strip_prefix(';') {
            let mut field = rest.to_string();
            loop {
                match lines.next() {
                    Some(l) if l.starts_with(';') => break,
                    Some(l) => {
                        field.push('\n');
                        field.push_str(l);
                    }
                    None => return Err(syntax("unterminated text field")),
                }
            }
            tokens.push(Token::Value(field.trim().to_string()));
            continue;
        }
        tokenize_line(line, &mut tokens)?;
    }

    Ok(tokens)
}

fn tokenize_line(line: &str, tokens: &mut Vec<Token>) -> Result<()> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '#' {
            break;
        }

        if c == '\'' || c == '"' {
            // A quote only closes when followed by whitespace or end of line
            let start = i + 1;
            let mut j = start;
            loop {
                if j >= chars.len() {
                    return Err(syntax("unterminated quoted string"));
                }
                if chars[j] == c && chars.get(j + 1).is_none_or(|n| n.is_whitespace()) {
                    break;
                }
                j += 1;
            }
            tokens.push(Token::Value(chars[start..j].iter().collect()));
            i = j + 1;
            continue;
        }

        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() {
            i += 1;
        }
        let word: String = chars[start..i].iter().collect();
        tokens.push(classify(word));
    }

    Ok(())
}

fn classify(word: String) -> Token {
    let lower = word.to_ascii_lowercase();
    if lower == "loop_" {
        Token::Loop
    } else if lower.starts_with("data_") {
        Token::Data(word[5..].to_string())
    } else if lower.starts_with('_') {
        Token::Tag(lower)
    } else {
        Token::Value(word)
    }
}
