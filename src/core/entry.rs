use super::account::{AccountClass, NormalBalance};
use super::error::LedgerError;
use chrono::{DateTime, NaiveDate};
use goldenfarm_derive::CsvSchema;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable identifier of a journal entry, assigned by the journal on append
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The one non-zero side of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Debit(Decimal),
    Credit(Decimal),
}

impl Side {
    pub fn debit(self) -> Decimal {
        match self {
            Side::Debit(amount) => amount,
            Side::Credit(_) => Decimal::ZERO,
        }
    }

    pub fn credit(self) -> Decimal {
        match self {
            Side::Debit(_) => Decimal::ZERO,
            Side::Credit(amount) => amount,
        }
    }

    pub fn amount(self) -> Decimal {
        match self {
            Side::Debit(amount) | Side::Credit(amount) => amount,
        }
    }

    /// Amount signed by the normal balance of the account it is posted to
    pub fn signed(self, normal: NormalBalance) -> Decimal {
        match normal {
            NormalBalance::Debit => self.debit() - self.credit(),
            NormalBalance::Credit => self.credit() - self.debit(),
        }
    }
}

/// Journal entry input and file record.
///
/// Used for manual entries, JSON and CSV journal files. Becomes a
/// [`ValidEntry`] only through [`EntryRecord::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, CsvSchema)]
pub struct EntryRecord {
    /// Entry identifier, assigned when missing
    #[serde(default)]
    pub id: Option<EntryId>,
    /// Posting date (YYYY-MM-DD)
    pub date: String,
    /// PCM account code, e.g. 5141, 6111, 7121, 4455
    pub account: String,
    /// Free-text description
    #[serde(default)]
    pub label: String,
    /// Debit amount (empty or 0 when the entry is a credit)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub debit: Option<Decimal>,
    /// Credit amount (empty or 0 when the entry is a debit)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub credit: Option<Decimal>,
}

impl EntryRecord {
    pub fn debit(date: &str, account: &str, label: &str, amount: Decimal) -> Self {
        EntryRecord {
            id: None,
            date: date.to_string(),
            account: account.to_string(),
            label: label.to_string(),
            debit: Some(amount),
            credit: None,
        }
    }

    pub fn credit(date: &str, account: &str, label: &str, amount: Decimal) -> Self {
        EntryRecord {
            id: None,
            date: date.to_string(),
            account: account.to_string(),
            label: label.to_string(),
            debit: None,
            credit: Some(amount),
        }
    }

    /// Check the posting rules: a parseable date, a non-empty account and
    /// exactly one non-negative, non-zero side.
    pub fn validate(&self) -> Result<ValidEntry, LedgerError> {
        let date = parse_date(&self.date)?;

        let account = self.account.trim();
        if account.is_empty() {
            return Err(LedgerError::EmptyAccount);
        }

        let debit = self.debit.unwrap_or(Decimal::ZERO);
        let credit = self.credit.unwrap_or(Decimal::ZERO);
        for amount in [debit, credit] {
            if amount.is_sign_negative() && !amount.is_zero() {
                return Err(LedgerError::NegativeAmount(amount));
            }
        }
        let side = match (debit.is_zero(), credit.is_zero()) {
            (false, true) => Side::Debit(debit),
            (true, false) => Side::Credit(credit),
            (false, false) => return Err(LedgerError::BothSidesSet { debit, credit }),
            (true, true) => return Err(LedgerError::NoAmount),
        };

        Ok(ValidEntry {
            date,
            account: account.to_string(),
            label: self.label.trim().to_string(),
            side,
        })
    }
}

/// An entry that passed validation but has no identifier yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEntry {
    date: NaiveDate,
    account: String,
    label: String,
    side: Side,
}

impl ValidEntry {
    pub(crate) fn with_id(self, id: EntryId) -> JournalEntry {
        JournalEntry {
            id,
            date: self.date,
            account: self.account,
            label: self.label,
            side: self.side,
        }
    }
}

/// A posted entry. Immutable once in the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    id: EntryId,
    date: NaiveDate,
    account: String,
    label: String,
    side: Side,
}

impl JournalEntry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn debit(&self) -> Decimal {
        self.side.debit()
    }

    pub fn credit(&self) -> Decimal {
        self.side.credit()
    }

    pub fn class(&self) -> Option<AccountClass> {
        AccountClass::classify(&self.account)
    }

    pub fn to_record(&self) -> EntryRecord {
        EntryRecord {
            id: Some(self.id),
            date: self.date.format("%Y-%m-%d").to_string(),
            account: self.account.clone(),
            label: self.label.clone(),
            debit: Some(self.debit()),
            credit: Some(self.credit()),
        }
    }
}

impl Serialize for JournalEntry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

/// Parse a posting date. A full RFC3339 timestamp is accepted and truncated to its date.
pub fn parse_date(s: &str) -> Result<NaiveDate, LedgerError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
        .map_err(|_| LedgerError::InvalidDate(s.to_string()))
}
