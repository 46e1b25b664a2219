use super::entry::{EntryId, EntryRecord, JournalEntry, ValidEntry};
use super::error::LedgerError;
use super::vitals::{accumulate, Buckets, VitalsSnapshot};
use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::io::{Read, Write};

/// Column description for CSV input, generated by `#[derive(CsvSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Root of a JSON journal file
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JournalFile {
    pub entries: Vec<EntryRecord>,
}

/// Change notification sent to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalEvent {
    Appended { id: EntryId },
    Removed { id: EntryId },
}

pub type Subscriber = Box<dyn FnMut(&JournalEvent)>;

/// The general journal ("Journal Général").
///
/// Owns its entries in insertion order and keeps running class totals, so
/// [`Journal::vitals`] costs nothing per read. Appends update the totals in
/// place; removals recompute them from the remaining entries.
pub struct Journal {
    entries: Vec<JournalEntry>,
    /// `None` once `u64::MAX` has been handed out
    next_id: Option<u64>,
    buckets: Buckets,
    subscribers: Vec<Subscriber>,
}

impl Default for Journal {
    fn default() -> Self {
        Journal::new()
    }
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal")
            .field("entries", &self.entries)
            .field("next_id", &self.next_id)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Journal {
    pub fn new() -> Self {
        Journal {
            entries: Vec::new(),
            next_id: Some(1),
            buckets: Buckets::default(),
            subscribers: Vec::new(),
        }
    }

    /// Append a validated entry and return its new identifier
    pub fn append(&mut self, entry: ValidEntry) -> Result<EntryId, LedgerError> {
        let id = EntryId(self.next_id.ok_or(LedgerError::IdOverflow)?);
        self.push(entry.with_id(id))?;
        self.next_id = id.0.checked_add(1);
        Ok(id)
    }

    /// Post to the running totals first, so a rejected entry leaves no trace.
    fn push(&mut self, entry: JournalEntry) -> Result<(), LedgerError> {
        let id = entry.id();
        if self.buckets.post(&entry)?.is_none() {
            log::warn!(
                "Unclassified account {} on entry {} excluded from totals",
                entry.account(),
                id
            );
        }
        log::debug!(
            "Appended entry {} {} D {} C {}",
            id,
            entry.account(),
            entry.debit(),
            entry.credit()
        );
        self.entries.push(entry);
        self.notify(JournalEvent::Appended { id });
        Ok(())
    }

    /// Validate a record and append it
    pub fn post(&mut self, record: &EntryRecord) -> Result<EntryId, LedgerError> {
        let entry = record.validate()?;
        self.append(entry)
    }

    /// All entries in insertion order
    pub fn all(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove_by_id(&mut self, id: EntryId) -> Result<JournalEntry, LedgerError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id() == id)
            .ok_or(LedgerError::EntryNotFound(id))?;
        let removed = self.entries.remove(index);
        match accumulate(&self.entries) {
            Ok(buckets) => self.buckets = buckets,
            Err(err) => {
                self.entries.insert(index, removed);
                return Err(err);
            }
        }
        log::debug!("Removed entry {}, totals recomputed", id);
        self.notify(JournalEvent::Removed { id });
        Ok(removed)
    }

    /// Register a listener called after every append and removal
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    fn notify(&mut self, event: JournalEvent) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&event);
        }
    }

    /// Vitals from the running totals
    pub fn vitals(&self) -> VitalsSnapshot {
        self.buckets.snapshot()
    }

    pub fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    /// Build a journal from file records, keeping their order.
    ///
    /// Records with an id keep it; the others are numbered after the highest
    /// id present.
    pub fn from_records(records: Vec<EntryRecord>) -> anyhow::Result<Journal> {
        let mut journal = Journal::new();
        if let Some(highest) = records.iter().filter_map(|r| r.id).map(|id| id.0).max() {
            journal.next_id = highest.checked_add(1);
        }

        let mut seen = HashSet::new();
        for (index, record) in records.iter().enumerate() {
            let entry = record.validate().with_context(|| {
                format!(
                    "invalid journal entry #{} (id {})",
                    index + 1,
                    record.id.map_or("none".to_string(), |id| id.to_string())
                )
            })?;
            let context = || format!("cannot load journal entry #{}", index + 1);
            match record.id {
                Some(id) => {
                    if !seen.insert(id) {
                        return Err(LedgerError::DuplicateEntryId(id).into());
                    }
                    journal.push(entry.with_id(id)).with_context(context)?;
                }
                None => {
                    let id = journal.append(entry).with_context(context)?;
                    seen.insert(id);
                }
            }
        }

        log::info!("Loaded {} journal entries", journal.len());
        Ok(journal)
    }

    pub fn to_records(&self) -> Vec<EntryRecord> {
        self.entries.iter().map(JournalEntry::to_record).collect()
    }

    /// Read a journal from JSON (`{"entries": [...]}`)
    pub fn read_json<R: Read>(reader: R) -> anyhow::Result<Journal> {
        let file: JournalFile = serde_json::from_reader(reader)?;
        Journal::from_records(file.entries)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> anyhow::Result<()> {
        let file = JournalFile {
            entries: self.to_records(),
        };
        serde_json::to_writer_pretty(writer, &file)?;
        Ok(())
    }

    /// Read a journal from CSV with columns `id,date,account,label,debit,credit`
    pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<Journal> {
        let mut rdr = csv::Reader::from_reader(reader);
        let records: Result<Vec<EntryRecord>, _> = rdr.deserialize::<EntryRecord>().collect();
        Journal::from_records(records?)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in self.to_records() {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// SHA-256 over the entries in order, independent of file format and
    /// of the scale amounts were written with.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for entry in &self.entries {
            let line = format!(
                "{}|{}|{}|{}|{}|{}\n",
                entry.id(),
                entry.date(),
                entry.account(),
                entry.label(),
                entry.debit().normalize(),
                entry.credit().normalize()
            );
            hasher.update(line.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}
