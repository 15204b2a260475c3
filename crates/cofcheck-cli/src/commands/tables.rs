//! Single table and file-set checks.

use cofcheck::{
    Check, ConsistentPaperIds, MatchStructureFiles, ReciprocalDuplicates, UniqueDois,
    UniqueFrameworkIds, UniqueFrameworkNames,
};

use super::{CommandResult, Context, exit_code, output};
use crate::cli::Commands;

pub fn run(ctx: &Context, command: &Commands) -> CommandResult {
    let check: Box<dyn Check> = match command {
        Commands::UniqueDois => Box::new(UniqueDois),
        Commands::UniqueCofIds => Box::new(UniqueFrameworkIds),
        Commands::UniqueCofNames => Box::new(UniqueFrameworkNames),
        Commands::DuplicatesMarkedReciprocally => Box::new(ReciprocalDuplicates),
        Commands::ConsistentPaperIds => Box::new(ConsistentPaperIds),
        Commands::MatchCifs => Box::new(MatchStructureFiles::new(ctx.config.structures_path())),
        other => return Err(format!("'{}' is not a table check", other.name()).into()),
    };

    let db = ctx.load_database()?;
    let report = check.run(&db)?;

    if ctx.json {
        output::print_json(std::slice::from_ref(&report))?;
    } else {
        output::print_report(&report);
    }

    Ok(exit_code(std::slice::from_ref(&report)))
}
