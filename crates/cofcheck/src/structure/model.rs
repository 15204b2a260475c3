//! Atomic configurations inside a periodic cell.

use serde::{Deserialize, Serialize};

use super::lattice::Lattice;

/// One atom (or partially occupied site) of a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Element symbol, e.g. `C`.
    pub species: String,
    /// Fractional coordinates, wrapped into [0, 1).
    pub frac: [f64; 3],
    /// Site occupancy.
    pub occupancy: f64,
    /// Label of the asymmetric-unit site this atom was generated from.
    pub label: String,
}

impl Site {
    pub fn new(species: impl Into<String>, frac: [f64; 3]) -> Self {
        let species = species.into();
        Self {
            label: species.clone(),
            species,
            frac,
            occupancy: 1.0,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_occupancy(mut self, occupancy: f64) -> Self {
        self.occupancy = occupancy;
        self
    }
}

/// Atoms in a periodic cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Name of the data block the structure came from.
    pub name: String,
    pub lattice: Lattice,
    pub sites: Vec<Site>,
}

impl Structure {
    pub fn new(name: impl Into<String>, lattice: Lattice, sites: Vec<Site>) -> Self {
        Self {
            name: name.into(),
            lattice,
            sites,
        }
    }

    /// Number of atoms in the cell.
    pub fn atom_count(&self) -> usize {
        self.sites.len()
    }

    /// Shortest periodic distance between two atoms.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.lattice
            .min_image_distance(self.sites[i].frac, self.sites[j].frac)
    }

    /// Index pairs `(i, j)`, `i < j`, of atoms closer than `cutoff`.
    pub fn overlapping_pairs(&self, cutoff: f64) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..self.sites.len() {
            for j in (i + 1)..self.sites.len() {
                if self.distance(i, j) < cutoff {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(sites: Vec<Site>) -> Structure {
        let lattice = Lattice::from_parameters(10.0, 10.0, 10.0, 90.0, 90.0, 90.0).unwrap();
        Structure::new("test", lattice, sites)
    }

    #[test]
    fn test_overlapping_pairs() {
        let structure = cubic(vec![
            Site::new("C", [0.0, 0.0, 0.0]),
            Site::new("C", [0.005, 0.0, 0.0]),
            Site::new("N", [0.5, 0.5, 0.5]),
        ]);
        assert_eq!(structure.overlapping_pairs(0.1), vec![(0, 1)]);
    }

    #[test]
    fn test_overlap_across_cell_boundary() {
        let structure = cubic(vec![
            Site::new("O", [0.999, 0.5, 0.5]),
            Site::new("O", [0.001, 0.5, 0.5]),
        ]);
        assert_eq!(structure.overlapping_pairs(0.1), vec![(0, 1)]);
        assert!(structure.overlapping_pairs(0.01).is_empty());
    }

    #[test]
    fn test_site_builders() {
        let site = Site::new("Zn", [0.1, 0.2, 0.3])
            .with_label("Zn1")
            .with_occupancy(0.5);
        assert_eq!(site.label, "Zn1");
        assert_eq!(site.occupancy, 0.5);
        assert_eq!(site.species, "Zn");
    }
}
