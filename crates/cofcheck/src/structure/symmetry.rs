//! Symmetry operations in CIF `x,y,z` notation.

use crate::error::{CofCheckError, Result};

/// Affine operation on fractional coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryOperation {
    rotation: [[f64; 3]; 3],
    translation: [f64; 3],
}

impl SymmetryOperation {
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0; 3],
        }
    }

    /// Parse an operation such as `-x+1/2, y, z-x`.
    pub fn parse(raw: &str) -> Result<Self> {
        let compact: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\'' && *c != '"')
            .collect::<String>()
            .to_ascii_lowercase();

        let parts: Vec<&str> = compact.split(',').collect();
        if parts.len() != 3 {
            return Err(invalid(raw));
        }

        let mut op = Self {
            rotation: [[0.0; 3]; 3],
            translation: [0.0; 3],
        };
        for (row, part) in parts.iter().enumerate() {
            if part.is_empty() {
                return Err(invalid(raw));
            }
            for term in split_terms(part) {
                apply_term(&mut op, row, term).ok_or_else(|| invalid(raw))?;
            }
        }
        Ok(op)
    }

    /// Apply the operation to fractional coordinates (no wrapping).
    pub fn apply(&self, frac: [f64; 3]) -> [f64; 3] {
        let mut out = self.translation;
        for (row, value) in out.iter_mut().enumerate() {
            for col in 0..3 {
                *value += self.rotation[row][col] * frac[col];
            }
        }
        out
    }
}

fn invalid(raw: &str) -> CofCheckError {
    CofCheckError::InvalidStructure(format!("unreadable symmetry operation '{}'", raw))
}

/// Split `-x+1/2` into `["-x", "+1/2"]`.
fn split_terms(part: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let mut start = 0;
    for (i, c) in part.char_indices() {
        if (c == '+' || c == '-') && i > start {
            terms.push(&part[start..i]);
            start = i;
        }
    }
    terms.push(&part[start..]);
    terms
}

fn apply_term(op: &mut SymmetryOperation, row: usize, term: &str) -> Option<()> {
    let (sign, body) = match term.as_bytes().first()? {
        b'-' => (-1.0, &term[1..]),
        b'+' => (1.0, &term[1..]),
        _ => (1.0, term),
    };

    let axis = match body.chars().last()? {
        'x' => Some(0),
        'y' => Some(1),
        'z' => Some(2),
        _ => None,
    };

    match axis {
        Some(col) => {
            let coefficient = body[..body.len() - 1].trim_end_matches('*');
            let coefficient = if coefficient.is_empty() {
                1.0
            } else {
                parse_fraction(coefficient)?
            };
            op.rotation[row][col] += sign * coefficient;
        }
        None => op.translation[row] += sign * parse_fraction(body)?,
    }
    Some(())
}

fn parse_fraction(raw: &str) -> Option<f64> {
    match raw.split_once('/') {
        Some((num, den)) => {
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                return None;
            }
            Some(num.parse::<f64>().ok()? / den)
        }
        None => raw.parse().ok(),
    }
}
