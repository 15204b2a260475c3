//! All table and file-set checks in one run.

use colored::Colorize;
use cofcheck::CheckSuite;

use super::{CommandResult, Context, exit_code, output};

pub fn run(ctx: &Context) -> CommandResult {
    let db = ctx.load_database()?;
    let suite = CheckSuite::new(&ctx.config);
    let reports = suite.run(&db)?;

    if ctx.json {
        output::print_json(&reports)?;
        return Ok(exit_code(&reports));
    }

    for report in &reports {
        println!("{}", format!("== {} ==", report.check).cyan().bold());
        output::print_report(report);
        println!();
    }

    let passed = reports.iter().filter(|r| r.passed).count();
    let summary = format!("{}/{} checks passed", passed, reports.len());
    if passed == reports.len() {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.red().bold());
    }

    Ok(exit_code(&reports))
}
