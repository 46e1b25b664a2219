//! Journal command - the Journal Général, one row per entry in posting order

use crate::cmd::{read_journal, PeriodArgs};
use crate::core::{totals, JournalEntry};
use clap::Args;
use std::{io, path::PathBuf};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct JournalCommand {
    /// Journal file (.json or .csv, "-" for stdin)
    #[arg(short, long)]
    journal: PathBuf,

    #[command(flatten)]
    period: PeriodArgs,

    /// Filter by account code prefix (e.g. 6 for all expenses, 4455)
    #[arg(short, long)]
    account: Option<String>,

    /// Output as CSV instead of a table
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Tabled)]
struct EntryRow {
    #[tabled(rename = "#")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Debit")]
    debit: String,
    #[tabled(rename = "Credit")]
    credit: String,
}

impl From<&JournalEntry> for EntryRow {
    fn from(entry: &JournalEntry) -> Self {
        EntryRow {
            id: entry.id().to_string(),
            date: entry.date().to_string(),
            account: entry.account().to_string(),
            class: entry.class().map_or("?".to_string(), |c| c.to_string()),
            label: entry.label().to_string(),
            debit: format_side(entry.debit()),
            credit: format_side(entry.credit()),
        }
    }
}

fn format_side(amount: rust_decimal::Decimal) -> String {
    if amount.is_zero() {
        String::new()
    } else {
        format!("{:.2}", amount)
    }
}

impl JournalCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let journal = read_journal(&self.journal)?;
        let period = self.period.period();

        let entries: Vec<&JournalEntry> = period
            .filter(journal.all())
            .filter(|e| {
                self.account
                    .as_deref()
                    .is_none_or(|prefix| e.account().starts_with(prefix))
            })
            .collect();

        if self.csv {
            let mut wtr = csv::Writer::from_writer(io::stdout());
            for entry in &entries {
                wtr.serialize(entry.to_record())?;
            }
            wtr.flush()?;
            return Ok(());
        }

        if entries.is_empty() {
            println!("No entries found matching filters");
            return Ok(());
        }

        let rows: Vec<EntryRow> = entries.iter().map(|e| EntryRow::from(*e)).collect();
        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(5..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        let (debit, credit) = totals(entries.iter().copied())?;
        println!(
            "{} entries ({}) | Total debit {:.2} | Total credit {:.2}",
            entries.len(),
            period.display(),
            debit,
            credit
        );
        Ok(())
    }
}
