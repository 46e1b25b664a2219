use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// PCM account used for VAT collected on sales ("État, TVA facturée").
pub const VAT_COLLECTED: &str = "4455";
/// PCM account used for VAT recoverable on charges.
pub const VAT_DEDUCTIBLE_CHARGES: &str = "3455";
/// PCM account used for VAT recoverable on fixed-asset purchases.
pub const VAT_DEDUCTIBLE_FIXED_ASSETS: &str = "3456";

/// Aggregate bucket an account code feeds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum AccountClass {
    /// Class 1: capital, reserves
    Equity,
    /// Class 2
    FixedAssets,
    /// Class 3 other than the VAT-deductible accounts
    CurrentAssets,
    VatDeductibleCharges,
    VatDeductibleFixedAssets,
    /// Class 4 other than collected VAT
    Liabilities,
    VatCollected,
    /// Class 5: banks and cash
    Treasury,
    Expenses,
    Revenues,
}

/// Which side of an entry increases the balance of a class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalBalance {
    Debit,
    Credit,
}

impl AccountClass {
    /// Classify an account code by its first digit, after the explicit VAT accounts.
    ///
    /// Returns `None` for codes outside the chart (class 8, 0, non-numeric, empty).
    pub fn classify(code: &str) -> Option<AccountClass> {
        let code = code.trim();
        match code {
            VAT_COLLECTED => return Some(AccountClass::VatCollected),
            VAT_DEDUCTIBLE_CHARGES => return Some(AccountClass::VatDeductibleCharges),
            VAT_DEDUCTIBLE_FIXED_ASSETS => return Some(AccountClass::VatDeductibleFixedAssets),
            _ => {}
        }
        match code.chars().next()? {
            '1' => Some(AccountClass::Equity),
            '2' => Some(AccountClass::FixedAssets),
            '3' => Some(AccountClass::CurrentAssets),
            '4' => Some(AccountClass::Liabilities),
            '5' => Some(AccountClass::Treasury),
            '6' => Some(AccountClass::Expenses),
            '7' => Some(AccountClass::Revenues),
            _ => None,
        }
    }

    pub fn normal_balance(self) -> NormalBalance {
        match self {
            AccountClass::FixedAssets
            | AccountClass::CurrentAssets
            | AccountClass::VatDeductibleCharges
            | AccountClass::VatDeductibleFixedAssets
            | AccountClass::Treasury
            | AccountClass::Expenses => NormalBalance::Debit,
            AccountClass::Equity
            | AccountClass::Liabilities
            | AccountClass::VatCollected
            | AccountClass::Revenues => NormalBalance::Credit,
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            AccountClass::Equity => "Equity",
            AccountClass::FixedAssets => "Fixed assets",
            AccountClass::CurrentAssets => "Current assets",
            AccountClass::VatDeductibleCharges => "VAT deductible (charges)",
            AccountClass::VatDeductibleFixedAssets => "VAT deductible (fixed assets)",
            AccountClass::Liabilities => "Liabilities",
            AccountClass::VatCollected => "VAT collected",
            AccountClass::Treasury => "Treasury",
            AccountClass::Expenses => "Expenses",
            AccountClass::Revenues => "Revenues",
        }
    }
}

impl std::fmt::Display for AccountClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display())
    }
}
