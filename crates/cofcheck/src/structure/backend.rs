//! Built-in CIF backend for the structure checks.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::cif::{CifBlock, parse_cif, parse_number};
use super::elements::{element_from_type_symbol, element_symbol};
use super::lattice::{Lattice, same_fractional_site, wrap_fractional};
use super::model::{Site, Structure};
use super::symmetry::SymmetryOperation;
use super::{CrystalParser, ParseOptions, StructureReader};
use crate::error::{CofCheckError, Result};

/// Fractional tolerance under which two generated positions are the same site.
const SITE_TOLERANCE: f64 = 1e-3;

const SYMMETRY_TAGS: &[&str] = &[
    "_space_group_symop_operation_xyz",
    "_symmetry_equiv_pos_as_xyz",
];

/// Reads CIF files into structures.
///
/// As a [`StructureReader`] it expands symmetry but keeps every listed site,
/// so coinciding atoms stay visible to overlap detection. As a
/// [`CrystalParser`] it additionally merges coinciding sites, summing their
/// occupancies, and reports one structure per data block. The stated cell is
/// returned as is; no primitive-cell reduction is performed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CifBackend;

impl CifBackend {
    pub fn new() -> Self {
        Self
    }

    /// Parse CIF text into expanded structures, one per block with atom sites.
    pub fn parse_str(&self, text: &str) -> Result<Vec<Structure>> {
        let mut structures = Vec::new();
        for block in parse_cif(text)? {
            if let Some(structure) = expand_block(&block)? {
                structures.push(structure);
            }
        }
        if structures.is_empty() {
            return Err(CofCheckError::InvalidStructure(
                "no data block with fractional atom sites".to_string(),
            ));
        }
        Ok(structures)
    }

    fn read_structures(&self, path: &Path) -> Result<Vec<Structure>> {
        // The handle is closed before parsing starts
        let text = fs::read_to_string(path).map_err(|e| CofCheckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse_str(&text)
            .map_err(|e| CofCheckError::structure_parse(path, e))
    }
}

impl StructureReader for CifBackend {
    fn read(&self, path: &Path) -> Result<Structure> {
        let mut structures = self.read_structures(path)?;
        debug!(path = %path.display(), atoms = structures[0].atom_count(), "read structure");
        Ok(structures.swap_remove(0))
    }

    fn overlapping_atoms(&self, structure: &Structure, cutoff: f64) -> Vec<(usize, usize)> {
        structure.overlapping_pairs(cutoff)
    }
}

impl CrystalParser for CifBackend {
    fn parse(&self, path: &Path, options: &ParseOptions) -> Result<Vec<Structure>> {
        self.read_structures(path)?
            .into_iter()
            .map(|s| {
                merge_sites(s, options.occupancy_tolerance)
                    .map_err(|e| CofCheckError::structure_parse(path, e))
            })
            .collect()
    }
}

fn expand_block(block: &CifBlock) -> Result<Option<Structure>> {
    let Some(atoms) = block.loop_with("_atom_site_fract_x") else {
        return Ok(None);
    };

    let lattice = lattice(block)?;
    let operations = operations(block)?;

    let column = |tag: &str| {
        atoms.column(tag).ok_or_else(|| {
            CofCheckError::InvalidStructure(format!("atom site loop has no {}", tag))
        })
    };
    let (fx, fy, fz) = (
        column("_atom_site_fract_x")?,
        column("_atom_site_fract_y")?,
        column("_atom_site_fract_z")?,
    );
    let label_col = atoms.column("_atom_site_label");
    let symbol_col = atoms.column("_atom_site_type_symbol");
    let occupancy_col = atoms.column("_atom_site_occupancy");

    let mut sites = Vec::new();
    for (row_idx, row) in atoms.rows.iter().enumerate() {
        let label = label_col
            .map(|c| row[c].clone())
            .unwrap_or_else(|| format!("site{}", row_idx + 1));

        let species = symbol_col
            .and_then(|c| element_from_type_symbol(&row[c]))
            .or_else(|| element_symbol(&label))
            .ok_or_else(|| {
                CofCheckError::InvalidStructure(format!("cannot determine element of site '{}'", label))
            })?;

        let coordinate = |c: usize| {
            parse_number(&row[c]).ok_or_else(|| {
                CofCheckError::InvalidStructure(format!(
                    "site '{}' has non-numeric coordinate '{}'",
                    label, row[c]
                ))
            })
        };
        let frac = [coordinate(fx)?, coordinate(fy)?, coordinate(fz)?];
        let occupancy = occupancy_col
            .and_then(|c| parse_number(&row[c]))
            .unwrap_or(1.0);

        // Images of one site that coincide (special positions) collapse to one atom
        let mut images: Vec<[f64; 3]> = Vec::new();
        for op in &operations {
            let p = op.apply(frac);
            let p = [wrap_fractional(p[0]), wrap_fractional(p[1]), wrap_fractional(p[2])];
            if !images.iter().any(|q| same_fractional_site(*q, p, SITE_TOLERANCE)) {
                images.push(p);
            }
        }

        sites.extend(images.into_iter().map(|p| {
            Site::new(species.clone(), p)
                .with_label(label.clone())
                .with_occupancy(occupancy)
        }));
    }

    Ok(Some(Structure::new(block.name.clone(), lattice, sites)))
}

fn lattice(block: &CifBlock) -> Result<Lattice> {
    let length = |tag: &str| {
        block.number(tag).ok_or_else(|| {
            CofCheckError::InvalidStructure(format!("missing or non-numeric {}", tag))
        })
    };
    let angle = |tag: &str| block.number(tag).unwrap_or(90.0);

    Lattice::from_parameters(
        length("_cell_length_a")?,
        length("_cell_length_b")?,
        length("_cell_length_c")?,
        angle("_cell_angle_alpha"),
        angle("_cell_angle_beta"),
        angle("_cell_angle_gamma"),
    )
}

fn operations(block: &CifBlock) -> Result<Vec<SymmetryOperation>> {
    let raw = SYMMETRY_TAGS
        .iter()
        .map(|tag| block.values(tag))
        .find(|values| !values.is_empty())
        .unwrap_or_default();

    if raw.is_empty() {
        return Ok(vec![SymmetryOperation::identity()]);
    }
    raw.into_iter().map(SymmetryOperation::parse).collect()
}

struct MergedSite {
    frac: [f64; 3],
    label: String,
    occupancy: f64,
    /// Occupancy per species, in first-seen order.
    species: Vec<(String, f64)>,
}

/// Merge sites sharing a position, the way a crystallographic parser treats disorder.
fn merge_sites(structure: Structure, occupancy_tolerance: f64) -> Result<Structure> {
    let mut merged: Vec<MergedSite> = Vec::new();

    for site in structure.sites {
        match merged
            .iter_mut()
            .find(|m| same_fractional_site(m.frac, site.frac, SITE_TOLERANCE))
        {
            Some(existing) => {
                existing.occupancy += site.occupancy;
                match existing.species.iter_mut().find(|(s, _)| *s == site.species) {
                    Some(entry) => entry.1 += site.occupancy,
                    None => existing.species.push((site.species, site.occupancy)),
                }
            }
            None => merged.push(MergedSite {
                frac: site.frac,
                label: site.label,
                occupancy: site.occupancy,
                species: vec![(site.species, site.occupancy)],
            }),
        }
    }

    let mut sites = Vec::with_capacity(merged.len());
    for site in merged {
        if site.occupancy > occupancy_tolerance {
            return Err(CofCheckError::InvalidStructure(format!(
                "site '{}' has total occupancy {:.3}, above tolerance {}",
                site.label, site.occupancy, occupancy_tolerance
            )));
        }

        let mut dominant = &site.species[0];
        for candidate in &site.species[1..] {
            if candidate.1 > dominant.1 {
                dominant = candidate;
            }
        }

        sites.push(
            Site::new(dominant.0.clone(), site.frac)
                .with_label(site.label.clone())
                .with_occupancy(site.occupancy.min(1.0)),
        );
    }

    Ok(Structure::new(structure.name, structure.lattice, sites))
}

#[cfg(test)]
mod tests {
    use super::*;

    const P1_CIF: &str = "\
data_test
_cell_length_a 10
_cell_length_b 10
_cell_length_c 10
_cell_angle_alpha 90
_cell_angle_beta 90
_cell_angle_gamma 90
loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
_atom_site_occupancy
C1 C 0.0 0.0 0.0 1.0
N1 N 0.5 0.5 0.5 1.0
";

    #[test]
    fn test_p1_structure() {
        let structures = CifBackend::new().parse_str(P1_CIF).unwrap();
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].atom_count(), 2);
        assert_eq!(structures[0].sites[1].species, "N");
        assert_eq!(structures[0].name, "test");
    }

    #[test]
    fn test_symmetry_expansion_collapses_special_positions() {
        let cif = "\
data_sym
_cell_length_a 10
_cell_length_b 10
_cell_length_c 10
loop_
_symmetry_equiv_pos_as_xyz
x,y,z
-x,-y,-z
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
C1 0.1 0.2 0.3
O1 0.0 0.0 0.0
";
        let structure = &CifBackend::new().parse_str(cif).unwrap()[0];
        // C1 has two images, O1 sits on the inversion centre
        assert_eq!(structure.atom_count(), 3);
        let image = structure.sites[1].frac;
        assert!([0.9, 0.8, 0.7].iter().zip(image).all(|(e, a)| (e - a).abs() < 1e-9));
        assert_eq!(structure.sites[2].species, "O");
    }

    #[test]
    fn test_merge_sites_sums_occupancy() {
        let cif = "\
data_disorder
_cell_length_a 10
_cell_length_b 10
_cell_length_c 10
loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
_atom_site_occupancy
C1 C 0.1 0.1 0.1 0.7
N1 N 0.1 0.1 0.1 0.3
O1 O 0.5 0.5 0.5 1
";
        let raw = CifBackend::new().parse_str(cif).unwrap().remove(0);
        assert_eq!(raw.atom_count(), 3);

        let merged = merge_sites(raw.clone(), 100.0).unwrap();
        assert_eq!(merged.atom_count(), 2);
        assert_eq!(merged.sites[0].species, "C");
        assert!((merged.sites[0].occupancy - 1.0).abs() < 1e-9);

        assert!(merge_sites(raw, 0.5).is_err());
    }

    #[test]
    fn test_block_without_atoms_is_skipped() {
        let cif = format!("data_global\n_journal_name_full 'Science'\n{}", P1_CIF);
        let structures = CifBackend::new().parse_str(&cif).unwrap();
        assert_eq!(structures.len(), 1);
    }

    #[test]
    fn test_missing_cell_is_error() {
        let cif = "data_x\nloop_\n_atom_site_label\n_atom_site_fract_x\n_atom_site_fract_y\n_atom_site_fract_z\nC1 0 0 0\n";
        assert!(CifBackend::new().parse_str(cif).is_err());
    }

    #[test]
    fn test_upper_case_type_symbol_is_two_letter_element() {
        let cif = "\
data_cl
_cell_length_a 10
_cell_length_b 10
_cell_length_c 10
loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
CL1 CL 0.0 0.0 0.0
CA1 C 0.5 0.5 0.5
";
        let structure = &CifBackend::new().parse_str(cif).unwrap()[0];
        assert_eq!(structure.sites[0].species, "Cl");
        assert_eq!(structure.sites[1].species, "C");
    }

    #[test]
    fn test_no_atoms_is_error() {
        assert!(CifBackend::new().parse_str("data_x\n_cell_length_a 1\n").is_err());
    }
}
