//! Checks over structure files.

use std::path::PathBuf;

use cofcheck::validation::list_structure_files;
use cofcheck::{
    Check, CifBackend, Database, OverlappingAtoms, UniqueStructures, WeisfeilerLehmanHasher,
};
use tracing::debug;

use super::{CommandResult, Context, exit_code, output};

/// The given files, or every CIF in the structures directory when none are given.
fn structure_files(
    ctx: &Context,
    files: &[PathBuf],
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if !files.is_empty() {
        return Ok(files.to_vec());
    }

    let dir = ctx.config.structures_path();
    let files: Vec<PathBuf> = list_structure_files(&dir)?
        .into_iter()
        .map(|name| dir.join(name))
        .collect();
    debug!(dir = %dir.display(), files = files.len(), "checking all structure files");
    Ok(files)
}

fn finish(ctx: &Context, report: cofcheck::CheckReport) -> CommandResult {
    if ctx.json {
        output::print_json(std::slice::from_ref(&report))?;
    } else {
        output::print_report(&report);
    }
    Ok(exit_code(std::slice::from_ref(&report)))
}

pub fn overlapping_atoms(ctx: &Context, files: &[PathBuf], cutoff: Option<f64>) -> CommandResult {
    let cutoff = cutoff.unwrap_or(ctx.config.overlap_cutoff);
    if !(cutoff.is_finite() && cutoff > 0.0) {
        return Err(format!("cutoff must be a positive number, got {}", cutoff).into());
    }

    let check = OverlappingAtoms::new(structure_files(ctx, files)?, CifBackend::new())
        .with_cutoff(cutoff);

    // Overlap detection needs no tables
    let report = check.run(&Database::default())?;
    finish(ctx, report)
}

pub fn unique_structures(
    ctx: &Context,
    files: &[PathBuf],
    max_atoms: Option<usize>,
) -> CommandResult {
    let max_atoms = max_atoms.unwrap_or(ctx.config.max_atoms);
    if max_atoms == 0 {
        return Err("max-atoms must be positive".into());
    }
    let db = ctx.load_database()?;

    let check = UniqueStructures::new(
        structure_files(ctx, files)?,
        CifBackend::new(),
        WeisfeilerLehmanHasher::new(),
    )
    .with_max_atoms(max_atoms)
    .with_occupancy_tolerance(ctx.config.occupancy_tolerance);

    let report = check.run(&db)?;
    finish(ctx, report)
}
