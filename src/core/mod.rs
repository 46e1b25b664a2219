pub mod account;
pub mod entry;
pub mod error;
pub mod fiscal;
pub mod journal;
pub mod seed;
pub mod vitals;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use entry::{parse_date, EntryId, EntryRecord, JournalEntry};
pub use fiscal::{Bracket, FiscalRegime, Simulation, SimulationOverrides, TaxBracketResult};
pub use journal::{CsvField, Journal, JournalEvent, JournalFile};
pub use vitals::{
    aggregate, check, is_balanced, totals, trial_balance, Period, TrialBalanceLine,
    VitalsSnapshot,
};
pub use warnings::Warning;
