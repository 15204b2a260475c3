//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cofcheck: consistency checks for the CURATED-COFs database
#[derive(Parser)]
#[command(name = "cofcheck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database root holding the CSV tables and the structures directory
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// JSON config file (default: <root>/cofcheck.json when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Structures directory, relative to the root (default: cifs)
    #[arg(long, global = true, value_name = "DIR")]
    pub structures_dir: Option<PathBuf>,

    /// Exception list of id pairs allowed to share a structure graph
    #[arg(long, global = true, value_name = "FILE")]
    pub exceptions: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that paper DOIs are unique
    UniqueDois,

    /// Check that CURATED-COFs IDs are unique
    UniqueCofIds,

    /// Check that COF names are unique
    UniqueCofNames,

    /// Check that rows marked as duplicates point at each other
    DuplicatesMarkedReciprocally,

    /// Check that paper IDs match the framework IDs
    ConsistentPaperIds,

    /// Check that every framework ID has exactly one CIF file and vice versa
    MatchCifs,

    /// Check structure files for atoms that overlap
    OverlappingAtoms {
        /// CIF files to check (default: every CIF in the structures directory)
        #[arg(value_name = "FILES")]
        files: Vec<PathBuf>,

        /// Distance below which two atoms overlap
        #[arg(long)]
        cutoff: Option<f64>,
    },

    /// Check that no two frameworks share a structure graph
    UniqueStructures {
        /// CIF files to compare (default: every CIF in the structures directory)
        #[arg(value_name = "FILES")]
        files: Vec<PathBuf>,

        /// Skip structures with more atoms than this
        #[arg(long)]
        max_atoms: Option<usize>,
    },

    /// Run every table and file-set check
    All,
}

impl Commands {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::UniqueDois => "unique-dois",
            Commands::UniqueCofIds => "unique-cof-ids",
            Commands::UniqueCofNames => "unique-cof-names",
            Commands::DuplicatesMarkedReciprocally => "duplicates-marked-reciprocally",
            Commands::ConsistentPaperIds => "consistent-paper-ids",
            Commands::MatchCifs => "match-cifs",
            Commands::OverlappingAtoms { .. } => "overlapping-atoms",
            Commands::UniqueStructures { .. } => "unique-structures",
            Commands::All => "all",
        }
    }
}
