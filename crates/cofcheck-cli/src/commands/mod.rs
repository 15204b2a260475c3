//! CLI command implementations.

pub mod output;
pub mod structures;
pub mod suite;
pub mod tables;

use std::process::ExitCode;

use cofcheck::{CheckConfig, Database};

use crate::cli::Cli;

pub type CommandResult = Result<ExitCode, Box<dyn std::error::Error>>;

/// Resolved configuration and output mode shared by every command.
pub struct Context {
    pub config: CheckConfig,
    pub json: bool,
}

impl Context {
    /// Resolve the configuration: defaults, then the config file, then flags.
    pub fn from_cli(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = CheckConfig::resolve(cli.root.as_deref(), cli.config.as_deref())?;

        if let Some(dir) = &cli.structures_dir {
            config.structures_dir = dir.clone();
        }
        if let Some(exceptions) = &cli.exceptions {
            config.exceptions = exceptions.clone();
        }
        config.validate()?;

        Ok(Self {
            config,
            json: cli.json,
        })
    }

    /// Load the tables; any failure is fatal for the command.
    pub fn load_database(&self) -> Result<Database, Box<dyn std::error::Error>> {
        Ok(Database::load(&self.config)?)
    }
}

/// Exit status for a set of reports.
pub fn exit_code(reports: &[cofcheck::CheckReport]) -> ExitCode {
    if reports.iter().all(|r| r.passed) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
