//! Post and remove commands - the manual entry form of the Journal Général

use crate::cmd::{format_mad, is_stdin, read_journal, write_journal};
use crate::core::{EntryId, EntryRecord, Journal, JournalEvent};
use clap::Args;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct PostCommand {
    /// Journal file to append to
    #[arg(short, long)]
    journal: PathBuf,

    /// Posting date (YYYY-MM-DD)
    #[arg(short, long)]
    date: String,

    /// PCM account code (e.g. 5141, 6111, 7121)
    #[arg(short, long)]
    account: String,

    /// Entry description
    #[arg(short, long, default_value = "")]
    label: String,

    /// Debit amount
    #[arg(long)]
    debit: Option<Decimal>,

    /// Credit amount
    #[arg(long)]
    credit: Option<Decimal>,
}

impl PostCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        ensure_writable(&self.journal)?;
        let mut journal = read_journal(&self.journal)?;
        log_changes(&mut journal);

        let record = EntryRecord {
            id: None,
            date: self.date.clone(),
            account: self.account.clone(),
            label: self.label.clone(),
            debit: self.debit,
            credit: self.credit,
        };
        let id = journal.post(&record).map_err(|err| {
            if err.is_invalid_entry() {
                anyhow::anyhow!("invalid entry: {}", err)
            } else {
                err.into()
            }
        })?;

        write_journal(&journal, &self.journal)?;
        if let Some(entry) = journal.get(id) {
            println!(
                "Posted entry {}: {} {} D {} C {}",
                id,
                entry.date(),
                entry.account(),
                format_mad(entry.debit()),
                format_mad(entry.credit())
            );
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RemoveCommand {
    /// Journal file to edit
    #[arg(short, long)]
    journal: PathBuf,

    /// Identifier of the entry to remove
    #[arg(long)]
    id: u64,
}

impl RemoveCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        ensure_writable(&self.journal)?;
        let mut journal = read_journal(&self.journal)?;
        log_changes(&mut journal);

        let removed = journal.remove_by_id(EntryId(self.id))?;
        write_journal(&journal, &self.journal)?;
        println!(
            "Removed entry {}: {} {} {}",
            removed.id(),
            removed.date(),
            removed.account(),
            removed.label()
        );
        Ok(())
    }
}

fn ensure_writable(path: &Path) -> anyhow::Result<()> {
    if is_stdin(path) {
        anyhow::bail!("cannot edit a journal read from stdin; pass a file with --journal");
    }
    Ok(())
}

fn log_changes(journal: &mut Journal) {
    journal.subscribe(Box::new(|event: &JournalEvent| match event {
        JournalEvent::Appended { id } => log::info!("Journal entry {} appended", id),
        JournalEvent::Removed { id } => log::info!("Journal entry {} removed", id),
    }));
}
