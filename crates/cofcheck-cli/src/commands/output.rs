//! Report rendering for the terminal and for JSON consumers.

use colored::{ColoredString, Colorize};
use cofcheck::{CheckReport, Finding, Severity};

fn severity_tag(severity: Severity) -> ColoredString {
    let tag = format!("[{}]", severity.label());
    match severity {
        Severity::Error => tag.red().bold(),
        Severity::Warning => tag.yellow().bold(),
        Severity::Info => tag.blue(),
    }
}

fn print_finding(finding: &Finding) {
    println!(
        "  {} {}: {}",
        severity_tag(finding.severity),
        finding.kind.label().white().bold(),
        finding.message
    );
}

/// Print one report: headline, then every finding in detection order.
pub fn print_report(report: &CheckReport) {
    if report.passed {
        println!("{} {}", "✓".green().bold(), report.headline.green());
        for finding in report.notes() {
            print_finding(finding);
        }
        return;
    }

    println!("{} {}", "✗".red().bold(), report.headline.red().bold());
    for finding in &report.findings {
        print_finding(finding);
    }

    let counts = &report.counts;
    let mut parts = Vec::new();
    if counts.error > 0 {
        parts.push(format!("{} error(s)", counts.error).red().to_string());
    }
    if counts.warning > 0 {
        parts.push(format!("{} warning(s)", counts.warning).yellow().to_string());
    }
    if counts.info > 0 {
        parts.push(format!("{} note(s)", counts.info).blue().to_string());
    }
    println!("  {}", parts.join(", "));
}

/// Print reports as pretty JSON: a single object for one report, an array otherwise.
pub fn print_json(reports: &[CheckReport]) -> serde_json::Result<()> {
    let text = match reports {
        [report] => serde_json::to_string_pretty(report)?,
        _ => serde_json::to_string_pretty(reports)?,
    };
    println!("{}", text);
    Ok(())
}
