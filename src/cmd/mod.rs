pub mod balance;
pub mod edit;
pub mod init;
pub mod journal;
pub mod schema;
pub mod simulate;
pub mod validate;
pub mod vitals;

use crate::core::{parse_date, Journal, Period};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Date range options shared by the reporting commands
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PeriodArgs {
    /// First posting date included (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    from: Option<NaiveDate>,

    /// Last posting date included (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    to: Option<NaiveDate>,
}

impl PeriodArgs {
    pub fn period(&self) -> Period {
        Period {
            from: self.from,
            to: self.to,
        }
    }
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// "-" stands for stdin
pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read a journal file (or stdin with "-"). `.csv` files are CSV, anything else JSON.
pub fn read_journal(path: &Path) -> anyhow::Result<Journal> {
    if is_stdin(path) {
        return read_from_stdin();
    }
    let file = File::open(path)
        .with_context(|| format!("cannot open journal {}", path.display()))?;
    let reader = BufReader::new(file);
    let journal = if is_csv(path) {
        Journal::read_csv(reader)
    } else {
        Journal::read_json(reader)
    };
    journal.with_context(|| format!("cannot read journal {}", path.display()))
}

fn read_from_stdin() -> anyhow::Result<Journal> {
    let mut buffer = Vec::new();
    io::stdin().lock().read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a journal file or pipe JSON to stdin.");
    }

    // JSON journals start with an object; anything else is taken as CSV
    let first = buffer.iter().find(|b| !b.is_ascii_whitespace());
    if first == Some(&b'{') {
        Journal::read_json(buffer.as_slice())
    } else {
        Journal::read_csv(buffer.as_slice())
    }
}

/// Write a journal back in the format its extension implies.
///
/// The journal goes to a sibling `.tmp` file first and is renamed over
/// `path` once complete, so a failed write leaves the old file intact.
pub fn write_journal(journal: &Journal, path: &Path) -> anyhow::Result<()> {
    if is_stdin(path) {
        anyhow::bail!("cannot write the journal to stdin; pass a file with --journal");
    }
    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    let written = write_to(journal, &tmp_path, is_csv(path)).and_then(|()| {
        fs::rename(&tmp_path, path)
            .with_context(|| format!("cannot replace journal {}", path.display()))
    });
    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written
}

fn write_to(journal: &Journal, path: &Path, csv: bool) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot write journal {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    if csv {
        journal.write_csv(&mut writer)?;
    } else {
        journal.write_json(&mut writer)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn format_mad(amount: Decimal) -> String {
    format!("{:.2} MAD", amount)
}

pub fn format_pct(rate: Decimal) -> String {
    format!("{:.2}%", rate * Decimal::ONE_HUNDRED)
}
