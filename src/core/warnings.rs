use super::entry::EntryId;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Recoverable data-quality findings on a journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Account code outside the chart; its entries are left out of every total.
    UnclassifiedAccount { account: String, entries: Vec<EntryId> },
    /// Total debits differ from total credits.
    UnbalancedJournal {
        #[schemars(with = "f64")]
        debit: Decimal,
        #[schemars(with = "f64")]
        credit: Decimal,
    },
    /// Journal is balanced but Total Actif differs from Total Passif.
    BalanceSheetMismatch {
        #[schemars(with = "f64")]
        actif: Decimal,
        #[schemars(with = "f64")]
        passif: Decimal,
    },
}

impl Warning {
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::UnclassifiedAccount { .. } => "UnclassifiedAccount",
            Warning::UnbalancedJournal { .. } => "UnbalancedJournal",
            Warning::BalanceSheetMismatch { .. } => "BalanceSheetMismatch",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Warning::UnclassifiedAccount { account, entries } => {
                let ids: Vec<_> = entries.iter().map(|id| id.to_string()).collect();
                format!(
                    "Account '{}' matches no PCM class; entries {} are excluded from totals",
                    account,
                    ids.join(", ")
                )
            }
            Warning::UnbalancedJournal { debit, credit } => format!(
                "Total debit {:.2} differs from total credit {:.2} by {:.2}",
                debit,
                credit,
                debit - credit
            ),
            Warning::BalanceSheetMismatch { actif, passif } => format!(
                "Total Actif {:.2} differs from Total Passif {:.2}",
                actif, passif
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn messages() {
        let w = Warning::UnclassifiedAccount {
            account: "8100".to_string(),
            entries: vec![EntryId(2), EntryId(5)],
        };
        assert_eq!(w.kind(), "UnclassifiedAccount");
        assert!(w.message().contains("entries 2, 5"));

        let w = Warning::UnbalancedJournal {
            debit: dec!(100),
            credit: dec!(90),
        };
        assert_eq!(
            w.message(),
            "Total debit 100.00 differs from total credit 90.00 by 10.00"
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let w = Warning::BalanceSheetMismatch {
            actif: dec!(40),
            passif: dec!(0),
        };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["type"], "BalanceSheetMismatch");
    }
}
