//! Validate command - surface data quality issues without producing reports

use crate::cmd::{read_journal, PeriodArgs};
use crate::core::{check, Warning};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Journal file (.json or .csv, "-" for stdin)
    #[arg(short, long)]
    journal: PathBuf,

    #[command(flatten)]
    period: PeriodArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: &'static str,
    message: String,
    detail: Warning,
}

#[derive(Debug, Serialize)]
struct ValidationOutput {
    period: String,
    entry_count: usize,
    digest: String,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        // entry-level rules are enforced while loading
        let journal = read_journal(&self.journal)?;
        let period = self.period.period();
        if journal.is_empty() {
            log::info!("Journal {} has no entries", self.journal.display());
        }
        let entries: Vec<_> = period.filter(journal.all()).collect();

        let issues: Vec<ValidationIssue> = check(entries.iter().copied())?
            .into_iter()
            .map(|w| ValidationIssue {
                issue_type: w.kind(),
                message: w.message(),
                detail: w,
            })
            .collect();

        let has_issues = !issues.is_empty();
        if self.json {
            let output = ValidationOutput {
                period: period.display(),
                entry_count: entries.len(),
                digest: journal.digest(),
                issue_count: issues.len(),
                issues,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&issues, &period.display(), entries.len());
        }

        // Exit with code 1 if issues found
        if has_issues {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(issues: &[ValidationIssue], period: &str, entry_count: usize) {
    println!();
    println!("VALIDATION RESULTS ({}, {} entries)", period, entry_count);
    println!();

    if issues.is_empty() {
        println!("\u{2713} No issues found.");
        return;
    }

    println!("\u{26A0} {} issue(s) found:", issues.len());
    println!();
    for (i, issue) in issues.iter().enumerate() {
        println!("  {}. [{}] {}", i + 1, issue.issue_type, issue.message);
    }
    println!();
}
