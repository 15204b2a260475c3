//! Bonding graphs and their Weisfeiler-Lehman fingerprints.

use std::collections::{BTreeMap, BTreeSet};

use sha2::{Digest, Sha256};
use tracing::warn;

use super::GraphHasher;
use super::elements::covalent_radius;
use super::model::Structure;
use crate::error::{CofCheckError, Result};

/// Slack added to the sum of covalent radii (Jmol's default).
pub const BOND_TOLERANCE: f64 = 0.45;

/// Contacts shorter than this are overlaps, not bonds.
pub const MIN_BOND_DISTANCE: f64 = 0.16;

/// Radius assumed for elements missing from the covalent radius table.
const FALLBACK_RADIUS: f64 = 1.5;

/// Default number of Weisfeiler-Lehman refinement rounds.
pub const DEFAULT_ITERATIONS: usize = 3;

/// Periodic bonding graph of a structure.
///
/// Bonds to periodic images are kept, so an atom bonded to its own image in
/// the next cell lists itself as a neighbour.
#[derive(Debug, Clone)]
pub struct BondingGraph {
    labels: Vec<String>,
    neighbors: Vec<Vec<usize>>,
}

impl BondingGraph {
    /// Connect atoms closer than the sum of their covalent radii plus `tolerance`.
    pub fn from_structure(structure: &Structure, tolerance: f64) -> Self {
        let n = structure.atom_count();
        let mut unknown = BTreeSet::new();
        let radii: Vec<f64> = structure
            .sites
            .iter()
            .map(|site| {
                covalent_radius(&site.species).unwrap_or_else(|| {
                    unknown.insert(site.species.clone());
                    FALLBACK_RADIUS
                })
            })
            .collect();

        if !unknown.is_empty() {
            warn!(
                structure = %structure.name,
                elements = ?unknown,
                "no covalent radius, using {FALLBACK_RADIUS}"
            );
        }

        let mut neighbors = vec![Vec::new(); n];
        for i in 0..n {
            for j in i..n {
                let cutoff = radii[i] + radii[j] + tolerance;
                let bonds = structure
                    .lattice
                    .image_distances_within(structure.sites[i].frac, structure.sites[j].frac, cutoff)
                    .into_iter()
                    .filter(|d| *d > MIN_BOND_DISTANCE)
                    .count();

                for _ in 0..bonds {
                    neighbors[i].push(j);
                    if i != j {
                        neighbors[j].push(i);
                    }
                }
            }
        }

        Self {
            labels: structure.sites.iter().map(|s| s.species.clone()).collect(),
            neighbors,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of bonds (periodic self-bonds counted once per direction pair).
    pub fn bond_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn neighbors(&self, atom: usize) -> &[usize] {
        &self.neighbors[atom]
    }
}

/// Hashes bonding graphs with Weisfeiler-Lehman label refinement.
///
/// Label counts are reduced by their greatest common divisor, so a supercell
/// hashes like the cell it repeats.
#[derive(Debug, Clone)]
pub struct WeisfeilerLehmanHasher {
    iterations: usize,
    bond_tolerance: f64,
}

impl Default for WeisfeilerLehmanHasher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            bond_tolerance: BOND_TOLERANCE,
        }
    }
}

impl WeisfeilerLehmanHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_bond_tolerance(mut self, tolerance: f64) -> Self {
        self.bond_tolerance = tolerance;
        self
    }

    /// Hash an already-built graph.
    pub fn hash_graph(&self, graph: &BondingGraph) -> String {
        let mut labels = graph.labels.clone();
        let mut rounds = vec![histogram(&labels)];

        for _ in 0..self.iterations {
            labels = (0..graph.atom_count())
                .map(|atom| {
                    let mut around: Vec<&str> = graph
                        .neighbors(atom)
                        .iter()
                        .map(|n| labels[*n].as_str())
                        .collect();
                    around.sort_unstable();
                    short_digest(&format!("{}|{}", labels[atom], around.join(",")))
                })
                .collect();
            rounds.push(histogram(&labels));
        }

        let divisor = rounds
            .iter()
            .flat_map(|h| h.values().copied())
            .fold(0, gcd)
            .max(1);

        let mut hasher = Sha256::new();
        for (round, counts) in rounds.iter().enumerate() {
            for (label, count) in counts {
                hasher.update(format!("{}:{}={};", round, label, count / divisor));
            }
        }
        format!("{:x}", hasher.finalize())
    }
}

impl GraphHasher for WeisfeilerLehmanHasher {
    fn graph_hash(&self, structure: &Structure) -> Result<String> {
        if structure.atom_count() == 0 {
            return Err(CofCheckError::InvalidStructure(format!(
                "structure '{}' has no atoms",
                structure.name
            )));
        }
        let graph = BondingGraph::from_structure(structure, self.bond_tolerance);
        Ok(self.hash_graph(&graph))
    }
}

fn histogram(labels: &[String]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for label in labels {
        *counts.entry(label.clone()).or_insert(0) += 1;
    }
    counts
}

fn short_digest(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    format!("{:x}", digest)[..16].to_string()
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{Lattice, Site};

    /// A chain of alternating B and N atoms along x, 1.45 apart.
    fn bn_chain(repeats: usize) -> Structure {
        let a = 2.9 * repeats as f64;
        let lattice = Lattice::from_parameters(a, 10.0, 10.0, 90.0, 90.0, 90.0).unwrap();
        let mut sites = Vec::new();
        for r in 0..repeats {
            let x = r as f64 / repeats as f64;
            sites.push(Site::new("B", [x, 0.5, 0.5]));
            sites.push(Site::new("N", [x + 0.5 / repeats as f64, 0.5, 0.5]));
        }
        Structure::new("bn", lattice, sites)
    }

    #[test]
    fn test_chain_bonds() {
        let graph = BondingGraph::from_structure(&bn_chain(1), BOND_TOLERANCE);
        assert_eq!(graph.atom_count(), 2);
        // B bonds to N on both sides (one in the next cell)
        assert_eq!(graph.neighbors(0), &[1, 1]);
        assert_eq!(graph.bond_count(), 2);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let hasher = WeisfeilerLehmanHasher::new();
        let a = hasher.graph_hash(&bn_chain(1)).unwrap();
        let b = hasher.graph_hash(&bn_chain(1)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_supercell_hashes_like_cell() {
        let hasher = WeisfeilerLehmanHasher::new();
        assert_eq!(
            hasher.graph_hash(&bn_chain(1)).unwrap(),
            hasher.graph_hash(&bn_chain(3)).unwrap()
        );
    }

    #[test]
    fn test_atom_order_does_not_matter() {
        let hasher = WeisfeilerLehmanHasher::new();
        let mut reversed = bn_chain(2);
        reversed.sites.reverse();
        assert_eq!(
            hasher.graph_hash(&bn_chain(2)).unwrap(),
            hasher.graph_hash(&reversed).unwrap()
        );
    }

    #[test]
    fn test_different_species_hash_differently() {
        let hasher = WeisfeilerLehmanHasher::new();
        let mut carbon = bn_chain(1);
        for site in &mut carbon.sites {
            site.species = "C".to_string();
        }
        assert_ne!(
            hasher.graph_hash(&bn_chain(1)).unwrap(),
            hasher.graph_hash(&carbon).unwrap()
        );
    }

    #[test]
    fn test_broken_bond_changes_hash() {
        let hasher = WeisfeilerLehmanHasher::new();
        let mut stretched = bn_chain(1);
        // Keep the N inside the cell but far from B on one side only
        stretched.lattice = Lattice::from_parameters(5.0, 10.0, 10.0, 90.0, 90.0, 90.0).unwrap();
        stretched.sites[1].frac = [0.29, 0.5, 0.5];
        assert_ne!(
            hasher.graph_hash(&bn_chain(1)).unwrap(),
            hasher.graph_hash(&stretched).unwrap()
        );
    }

    #[test]
    fn test_bond_tolerance_controls_connectivity() {
        // B-N is 1.45 against a radii sum of 1.55; a negative tolerance breaks the bond
        let strict = WeisfeilerLehmanHasher::new().with_bond_tolerance(-0.2);
        let graph = BondingGraph::from_structure(&bn_chain(1), -0.2);
        assert_eq!(graph.bond_count(), 0);
        assert_ne!(
            strict.graph_hash(&bn_chain(1)).unwrap(),
            WeisfeilerLehmanHasher::new().graph_hash(&bn_chain(1)).unwrap()
        );
    }

    #[test]
    fn test_zero_iterations_hash_composition_only() {
        let composition = WeisfeilerLehmanHasher::new().with_iterations(0);
        let mut stretched = bn_chain(1);
        stretched.lattice = Lattice::from_parameters(5.0, 10.0, 10.0, 90.0, 90.0, 90.0).unwrap();
        stretched.sites[1].frac = [0.29, 0.5, 0.5];
        assert_eq!(
            composition.graph_hash(&bn_chain(1)).unwrap(),
            composition.graph_hash(&stretched).unwrap()
        );
    }

    #[test]
    fn test_empty_structure_is_error() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0).unwrap();
        let empty = Structure::new("empty", lattice, vec![]);
        assert!(WeisfeilerLehmanHasher::new().graph_hash(&empty).is_err());
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!([4usize, 6, 10].iter().copied().fold(0, gcd), 2);
    }
}
