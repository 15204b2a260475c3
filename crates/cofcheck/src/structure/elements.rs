//! Element symbols and covalent radii.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Covalent radii in ångström (Cordero et al., 2008; low-spin values for Mn, Fe, Co).
#[rustfmt::skip]
const COVALENT_RADII: &[(&str, f64)] = &[
    ("H", 0.31), ("He", 0.28), ("Li", 1.28), ("Be", 0.96), ("B", 0.84),
    ("C", 0.76), ("N", 0.71), ("O", 0.66), ("F", 0.57), ("Ne", 0.58),
    ("Na", 1.66), ("Mg", 1.41), ("Al", 1.21), ("Si", 1.11), ("P", 1.07),
    ("S", 1.05), ("Cl", 1.02), ("Ar", 1.06), ("K", 2.03), ("Ca", 1.76),
    ("Sc", 1.70), ("Ti", 1.60), ("V", 1.53), ("Cr", 1.39), ("Mn", 1.39),
    ("Fe", 1.32), ("Co", 1.26), ("Ni", 1.24), ("Cu", 1.32), ("Zn", 1.22),
    ("Ga", 1.22), ("Ge", 1.20), ("As", 1.19), ("Se", 1.20), ("Br", 1.20),
    ("Kr", 1.16), ("Rb", 2.20), ("Sr", 1.95), ("Y", 1.90), ("Zr", 1.75),
    ("Nb", 1.64), ("Mo", 1.54), ("Tc", 1.47), ("Ru", 1.46), ("Rh", 1.42),
    ("Pd", 1.39), ("Ag", 1.45), ("Cd", 1.44), ("In", 1.42), ("Sn", 1.39),
    ("Sb", 1.39), ("Te", 1.38), ("I", 1.39), ("Xe", 1.40), ("Cs", 2.44),
    ("Ba", 2.15), ("La", 2.07), ("Ce", 2.04), ("Pr", 2.03), ("Nd", 2.01),
    ("Sm", 1.98), ("Eu", 1.98), ("Gd", 1.96), ("Tb", 1.94), ("Dy", 1.92),
    ("Ho", 1.92), ("Er", 1.89), ("Tm", 1.90), ("Yb", 1.87), ("Lu", 1.87),
    ("Hf", 1.75), ("Ta", 1.70), ("W", 1.62), ("Re", 1.51), ("Os", 1.44),
    ("Ir", 1.41), ("Pt", 1.36), ("Au", 1.36), ("Hg", 1.32), ("Tl", 1.45),
    ("Pb", 1.46), ("Bi", 1.48), ("U", 1.96),
];

static RADII: Lazy<HashMap<&'static str, f64>> =
    Lazy::new(|| COVALENT_RADII.iter().copied().collect());

/// Covalent radius for an element symbol.
pub fn covalent_radius(symbol: &str) -> Option<f64> {
    RADII.get(symbol).copied()
}

/// Whether `symbol` is a known element.
pub fn is_element(symbol: &str) -> bool {
    RADII.contains_key(symbol)
}

/// Extract an element symbol from a CIF type symbol or site label.
///
/// Handles charges and numbering (`Zn2+`, `O1-`, `C12A`), lower-case input
/// (`cl`) and deuterium, which is reported as hydrogen.
pub fn element_symbol(raw: &str) -> Option<String> {
    let letters: Vec<char> = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .take(2)
        .collect();

    let first = letters.first()?.to_ascii_uppercase();
    let second = letters.get(1);
    if first == 'D' && second.is_none_or(|c| !c.is_ascii_lowercase()) {
        return Some("H".to_string());
    }

    let one = first.to_string();
    let two = second.map(|c| [first, c.to_ascii_lowercase()].iter().collect::<String>());

    // "CA1" reads as carbon, "Ca1" as calcium; upper-case pairs like "ZN" still resolve
    let candidates = match second {
        Some(c) if c.is_ascii_lowercase() => [two, Some(one)],
        _ => [Some(one), two],
    };
    candidates.into_iter().flatten().find(|s| is_element(s))
}

/// Extract an element symbol from an `_atom_site_type_symbol` value.
///
/// Unlike labels, type symbols carry nothing but the element and a charge, so
/// an upper-case pair (`CL`, `BR`) is read as a two-letter element first.
pub fn element_from_type_symbol(raw: &str) -> Option<String> {
    let letters: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    let mut chars = letters.chars();
    if let Some(first) = chars.next() {
        let symbol: String = std::iter::once(first.to_ascii_uppercase())
            .chain(chars.map(|c| c.to_ascii_lowercase()))
            .collect();
        if is_element(&symbol) {
            return Some(symbol);
        }
    }
    element_symbol(raw)
}
