//! Demo journal posted when a new Finance Hub is initialised.

use super::entry::EntryRecord;
use super::journal::Journal;
use rust_decimal_macros::dec;

/// Balanced opening season for a crowdfunded farm project
pub fn seed_records() -> Vec<EntryRecord> {
    vec![
        EntryRecord::debit("2024-01-08", "5141", "Investor contributions received", dec!(1000000)),
        EntryRecord::credit("2024-01-08", "1111", "Share capital subscribed", dec!(1000000)),
        EntryRecord::debit("2024-02-12", "2340", "Tractor and irrigation pump", dec!(300000)),
        EntryRecord::debit("2024-02-12", "3456", "TVA on equipment purchase", dec!(60000)),
        EntryRecord::credit("2024-02-12", "4481", "Equipment supplier payable", dec!(360000)),
        EntryRecord::debit("2024-03-04", "6121", "Seeds and fertiliser", dec!(85000)),
        EntryRecord::debit("2024-03-04", "3455", "TVA on seeds and fertiliser", dec!(17000)),
        EntryRecord::credit("2024-03-04", "4411", "Agri-supply payable", dec!(102000)),
        EntryRecord::debit("2024-04-02", "4411", "Agri-supply settled", dec!(102000)),
        EntryRecord::credit("2024-04-02", "5141", "Bank transfer to agri-supply", dec!(102000)),
        EntryRecord::debit("2024-07-15", "3421", "Cooperative receivable", dec!(252000)),
        EntryRecord::credit("2024-07-15", "7121", "Olive harvest sold", dec!(210000)),
        EntryRecord::credit("2024-07-15", "4455", "TVA on harvest sale", dec!(42000)),
    ]
}

pub fn seeded() -> anyhow::Result<Journal> {
    Journal::from_records(seed_records())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vitals::{check, is_balanced};

    #[test]
    fn seed_is_balanced_and_classified() {
        let journal = seeded().unwrap();
        assert_eq!(journal.len(), 13);
        assert!(is_balanced(journal.all()).unwrap());
        assert!(check(journal.all()).unwrap().is_empty());

        let vitals = journal.vitals();
        assert_eq!(vitals.resultat_comptable, dec!(125000));
        assert_eq!(vitals.total_actif(), vitals.total_passif());
    }
}
