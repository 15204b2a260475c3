//! Structure files: the collaborator contracts the geometry and duplicate
//! checks are written against, and a small built-in CIF implementation.
//!
//! The checks only see three capabilities:
//!
//! - [`StructureReader`]: file → atomic configuration, plus overlap detection
//! - [`CrystalParser`]: file → candidate crystal structures
//! - [`GraphHasher`]: structure → canonical bonding-graph hash
//!
//! [`CifBackend`] and [`WeisfeilerLehmanHasher`] implement them for the
//! plain CIF files the database stores.

mod backend;
mod cif;
mod elements;
mod graph;
mod lattice;
mod model;
mod symmetry;

use std::path::Path;

use crate::config::DEFAULT_OCCUPANCY_TOLERANCE;
use crate::error::Result;

pub use backend::CifBackend;
pub use cif::{CifBlock, CifLoop, parse_cif, parse_number};
pub use elements::{covalent_radius, element_from_type_symbol, element_symbol};
pub use graph::{BOND_TOLERANCE, BondingGraph, WeisfeilerLehmanHasher};
pub use lattice::Lattice;
pub use model::{Site, Structure};
pub use symmetry::SymmetryOperation;

/// Reads a structure file into an atomic configuration.
pub trait StructureReader {
    /// Parse `path`; failures keep the underlying parser error as source.
    fn read(&self, path: &Path) -> Result<Structure>;

    /// Index pairs of atoms closer than `cutoff`.
    fn overlapping_atoms(&self, structure: &Structure, cutoff: f64) -> Vec<(usize, usize)>;
}

/// Options for [`CrystalParser::parse`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// How far summed site occupancies may exceed 1 before the file is rejected.
    pub occupancy_tolerance: f64,
    /// Ask for the primitive cell rather than the conventional one.
    pub primitive: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            occupancy_tolerance: DEFAULT_OCCUPANCY_TOLERANCE,
            primitive: true,
        }
    }
}

/// Parses a crystallographic file into one or more candidate structures.
pub trait CrystalParser {
    fn parse(&self, path: &Path, options: &ParseOptions) -> Result<Vec<Structure>>;
}

/// Fingerprints the bonding topology of a structure.
///
/// Isomorphic bonding graphs must hash equally; distinct graphs should not.
pub trait GraphHasher {
    fn graph_hash(&self, structure: &Structure) -> Result<String>;
}

impl<T: StructureReader + ?Sized> StructureReader for &T {
    fn read(&self, path: &Path) -> Result<Structure> {
        (**self).read(path)
    }

    fn overlapping_atoms(&self, structure: &Structure, cutoff: f64) -> Vec<(usize, usize)> {
        (**self).overlapping_atoms(structure, cutoff)
    }
}

impl<T: CrystalParser + ?Sized> CrystalParser for &T {
    fn parse(&self, path: &Path, options: &ParseOptions) -> Result<Vec<Structure>> {
        (**self).parse(path, options)
    }
}

impl<T: GraphHasher + ?Sized> GraphHasher for &T {
    fn graph_hash(&self, structure: &Structure) -> Result<String> {
        (**self).graph_hash(structure)
    }
}
