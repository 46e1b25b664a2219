use super::entry::EntryId;
use rust_decimal::Decimal;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("entry has both a debit ({debit}) and a credit ({credit})")]
    BothSidesSet { debit: Decimal, credit: Decimal },
    #[error("entry has neither a debit nor a credit")]
    NoAmount,
    #[error("negative amount: {0}")]
    NegativeAmount(Decimal),
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("account code is empty")]
    EmptyAccount,
    #[error("entry not found: {0}")]
    EntryNotFound(EntryId),
    #[error("duplicate entry id: {0}")]
    DuplicateEntryId(EntryId),
    #[error("amounts overflow the journal totals at entry {0}")]
    AmountOverflow(EntryId),
    #[error("no entry ids left to assign")]
    IdOverflow,
    #[error("invalid fiscal regime: {0}")]
    InvalidRegime(String),
}

impl LedgerError {
    /// Errors that reject an entry before it reaches the journal
    pub fn is_invalid_entry(&self) -> bool {
        matches!(
            self,
            LedgerError::BothSidesSet { .. }
                | LedgerError::NoAmount
                | LedgerError::NegativeAmount(_)
                | LedgerError::InvalidDate(_)
                | LedgerError::EmptyAccount
        )
    }
}
