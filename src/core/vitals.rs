use super::account::AccountClass;
use super::entry::JournalEntry;
use super::error::LedgerError;
use super::warnings::Warning;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Upper bound on the gross amount (debits plus credits) one set of
/// entries may carry. Every bucket and every sum of at most sixteen
/// buckets then stays inside the `Decimal` range.
pub fn volume_limit() -> Decimal {
    Decimal::MAX / Decimal::from(16)
}

/// Signed running balance per account class.
///
/// Every amount is accumulated with the sign convention of its class, so
/// `revenues` grows with credits and `expenses` with debits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets {
    pub equity: Decimal,
    pub fixed_assets: Decimal,
    pub current_assets: Decimal,
    pub vat_deductible_charges: Decimal,
    pub vat_deductible_fixed_assets: Decimal,
    pub liabilities: Decimal,
    pub vat_collected: Decimal,
    pub treasury: Decimal,
    pub expenses: Decimal,
    pub revenues: Decimal,
    /// Entries whose account matched no class
    pub unclassified: usize,
    /// Gross debits plus credits posted, classified or not
    pub volume: Decimal,
}

impl Buckets {
    /// Accumulate one entry. Returns the class it was posted to, if any.
    ///
    /// Fails with `AmountOverflow`, leaving the buckets untouched, when the
    /// entry would push the gross volume past [`volume_limit`].
    pub fn post(&mut self, entry: &JournalEntry) -> Result<Option<AccountClass>, LedgerError> {
        let overflow = || LedgerError::AmountOverflow(entry.id());
        let volume = self
            .volume
            .checked_add(entry.side().amount())
            .filter(|volume| *volume <= volume_limit())
            .ok_or_else(overflow)?;

        let Some(class) = entry.class() else {
            self.volume = volume;
            self.unclassified += 1;
            return Ok(None);
        };
        let amount = entry.side().signed(class.normal_balance());
        let bucket = match class {
            AccountClass::Equity => &mut self.equity,
            AccountClass::FixedAssets => &mut self.fixed_assets,
            AccountClass::CurrentAssets => &mut self.current_assets,
            AccountClass::VatDeductibleCharges => &mut self.vat_deductible_charges,
            AccountClass::VatDeductibleFixedAssets => &mut self.vat_deductible_fixed_assets,
            AccountClass::Liabilities => &mut self.liabilities,
            AccountClass::VatCollected => &mut self.vat_collected,
            AccountClass::Treasury => &mut self.treasury,
            AccountClass::Expenses => &mut self.expenses,
            AccountClass::Revenues => &mut self.revenues,
        };
        *bucket = bucket.checked_add(amount).ok_or_else(overflow)?;
        self.volume = volume;
        Ok(Some(class))
    }

    /// Every bucket is bounded by `volume`, so these sums cannot overflow.
    pub fn snapshot(&self) -> VitalsSnapshot {
        let resultat_comptable = self.revenues - self.expenses;
        let tva_due =
            self.vat_collected - self.vat_deductible_charges - self.vat_deductible_fixed_assets;
        let assets = self.fixed_assets
            + self.current_assets
            + self.treasury
            + self.vat_deductible_charges
            + self.vat_deductible_fixed_assets;

        VitalsSnapshot {
            revenues: self.revenues,
            expenses: self.expenses,
            resultat_comptable,
            tva_facturee: self.vat_collected,
            tva_recuperable_charges: self.vat_deductible_charges,
            tva_recuperable_immo: self.vat_deductible_fixed_assets,
            tva_due,
            assets,
            equity: self.equity,
            cash: self.treasury,
            liabilities: self.liabilities,
            fixed_assets: self.fixed_assets,
            current_assets: self.current_assets,
        }
    }
}

/// Dashboard figures derived from the journal. Never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VitalsSnapshot {
    #[schemars(with = "f64")]
    pub revenues: Decimal,
    #[schemars(with = "f64")]
    pub expenses: Decimal,
    /// Revenues minus expenses
    #[schemars(with = "f64")]
    pub resultat_comptable: Decimal,
    /// VAT collected on sales (4455)
    #[schemars(with = "f64")]
    pub tva_facturee: Decimal,
    /// VAT recoverable on charges (3455)
    #[schemars(with = "f64")]
    pub tva_recuperable_charges: Decimal,
    /// VAT recoverable on fixed assets (3456)
    #[schemars(with = "f64")]
    pub tva_recuperable_immo: Decimal,
    /// Collected minus recoverable VAT; negative is a VAT credit
    #[schemars(with = "f64")]
    pub tva_due: Decimal,
    #[schemars(with = "f64")]
    pub assets: Decimal,
    #[schemars(with = "f64")]
    pub equity: Decimal,
    #[schemars(with = "f64")]
    pub cash: Decimal,
    /// Class 4 balances other than collected VAT
    #[schemars(with = "f64")]
    pub liabilities: Decimal,
    #[schemars(with = "f64")]
    pub fixed_assets: Decimal,
    #[schemars(with = "f64")]
    pub current_assets: Decimal,
}

impl VitalsSnapshot {
    /// Liabilities including collected VAT
    pub fn total_liabilities(&self) -> Decimal {
        self.liabilities + self.tva_facturee
    }

    /// "Total Actif"
    pub fn total_actif(&self) -> Decimal {
        self.assets
    }

    /// "Total Passif": equity, liabilities, collected VAT and the period result
    pub fn total_passif(&self) -> Decimal {
        self.equity + self.liabilities + self.resultat_comptable + self.tva_facturee
    }

    /// Actif minus passif; zero for a balanced, fully classified journal
    pub fn balance_gap(&self) -> Decimal {
        self.total_actif() - self.total_passif()
    }

    pub fn is_zero(&self) -> bool {
        *self == VitalsSnapshot::default()
    }
}

/// Fold entries into a vitals snapshot. Independent of entry order.
pub fn aggregate<'a, I>(entries: I) -> Result<VitalsSnapshot, LedgerError>
where
    I: IntoIterator<Item = &'a JournalEntry>,
{
    Ok(accumulate(entries)?.snapshot())
}

pub fn accumulate<'a, I>(entries: I) -> Result<Buckets, LedgerError>
where
    I: IntoIterator<Item = &'a JournalEntry>,
{
    let mut buckets = Buckets::default();
    for entry in entries {
        buckets.post(entry)?;
    }
    Ok(buckets)
}

/// Inclusive date range filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Period {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn filter<'a>(
        &'a self,
        entries: &'a [JournalEntry],
    ) -> impl Iterator<Item = &'a JournalEntry> + 'a {
        entries.iter().filter(move |e| self.contains(e.date()))
    }

    pub fn display(&self) -> String {
        match (self.from, self.to) {
            (None, None) => "All dates".to_string(),
            (Some(from), None) => format!("from {}", from),
            (None, Some(to)) => format!("until {}", to),
            (Some(from), Some(to)) => format!("{} to {}", from, to),
        }
    }
}

/// One line of the trial balance ("balance générale")
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalanceLine {
    pub account: String,
    pub class: Option<AccountClass>,
    pub entries: usize,
    pub debit: Decimal,
    pub credit: Decimal,
}

impl TrialBalanceLine {
    /// Debit minus credit
    pub fn balance(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Per-account totals, sorted by account code
pub fn trial_balance<'a, I>(entries: I) -> Result<Vec<TrialBalanceLine>, LedgerError>
where
    I: IntoIterator<Item = &'a JournalEntry>,
{
    let mut lines: BTreeMap<&str, TrialBalanceLine> = BTreeMap::new();
    for entry in entries {
        let line = lines
            .entry(entry.account())
            .or_insert_with(|| TrialBalanceLine {
                account: entry.account().to_string(),
                class: entry.class(),
                entries: 0,
                debit: Decimal::ZERO,
                credit: Decimal::ZERO,
            });
        let overflow = || LedgerError::AmountOverflow(entry.id());
        line.entries += 1;
        line.debit = line.debit.checked_add(entry.debit()).ok_or_else(overflow)?;
        line.credit = line.credit.checked_add(entry.credit()).ok_or_else(overflow)?;
    }
    Ok(lines.into_values().collect())
}

/// Total debits and total credits
pub fn totals<'a, I>(entries: I) -> Result<(Decimal, Decimal), LedgerError>
where
    I: IntoIterator<Item = &'a JournalEntry>,
{
    entries
        .into_iter()
        .try_fold((Decimal::ZERO, Decimal::ZERO), |(d, c), e| {
            match (d.checked_add(e.debit()), c.checked_add(e.credit())) {
                (Some(d), Some(c)) => Ok((d, c)),
                _ => Err(LedgerError::AmountOverflow(e.id())),
            }
        })
}

/// Sum of debits equals sum of credits
pub fn is_balanced<'a, I>(entries: I) -> Result<bool, LedgerError>
where
    I: IntoIterator<Item = &'a JournalEntry>,
{
    let (debit, credit) = totals(entries)?;
    Ok(debit == credit)
}

/// Data-quality findings for a set of entries
pub fn check<'a, I>(entries: I) -> Result<Vec<Warning>, LedgerError>
where
    I: IntoIterator<Item = &'a JournalEntry> + Clone,
{
    let mut warnings = Vec::new();

    let mut unclassified: BTreeMap<&str, Vec<_>> = BTreeMap::new();
    for entry in entries.clone() {
        if entry.class().is_none() {
            unclassified.entry(entry.account()).or_default().push(entry.id());
        }
    }
    for (account, ids) in unclassified {
        warnings.push(Warning::UnclassifiedAccount {
            account: account.to_string(),
            entries: ids,
        });
    }

    let (debit, credit) = totals(entries.clone())?;
    if debit != credit {
        warnings.push(Warning::UnbalancedJournal { debit, credit });
    } else {
        let snapshot = aggregate(entries)?;
        if !snapshot.balance_gap().is_zero() {
            warnings.push(Warning::BalanceSheetMismatch {
                actif: snapshot.total_actif(),
                passif: snapshot.total_passif(),
            });
        }
    }

    Ok(warnings)
}

/// Distinct account codes with no class
pub fn unclassified_accounts<'a, I>(entries: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a JournalEntry>,
{
    entries
        .into_iter()
        .filter(|e| e.class().is_none())
        .map(|e| e.account().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::{EntryId, EntryRecord};
    use rust_decimal_macros::dec;

    fn posted(records: Vec<EntryRecord>) -> Vec<JournalEntry> {
        records
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.validate().unwrap().with_id(EntryId(i as u64 + 1)))
            .collect()
    }

    fn debit(account: &str, amount: Decimal) -> EntryRecord {
        EntryRecord::debit("2024-05-01", account, "", amount)
    }

    fn credit(account: &str, amount: Decimal) -> EntryRecord {
        EntryRecord::credit("2024-05-01", account, "", amount)
    }

    fn harvest_scenario() -> Vec<JournalEntry> {
        posted(vec![
            credit("7121", dec!(210000)),
            debit("6111", dec!(85000)),
            credit("4455", dec!(42000)),
            debit("3455", dec!(17000)),
        ])
    }

    /// Balanced farm journal touching every class
    fn balanced_journal() -> Vec<JournalEntry> {
        posted(vec![
            // capital contribution
            debit("5141", dec!(1000000)),
            credit("1111", dec!(1000000)),
            // tractor bought on credit, VAT on fixed assets
            debit("2340", dec!(300000)),
            debit("3456", dec!(60000)),
            credit("4481", dec!(360000)),
            // harvest sold to a cooperative
            debit("3421", dec!(252000)),
            credit("7121", dec!(210000)),
            credit("4455", dec!(42000)),
            // seeds and fertiliser
            debit("6121", dec!(85000)),
            debit("3455", dec!(17000)),
            credit("4411", dec!(102000)),
            // supplier paid
            debit("4411", dec!(102000)),
            credit("5141", dec!(102000)),
        ])
    }

    #[test]
    fn harvest_scenario_figures() {
        let vitals = aggregate(&harvest_scenario()).unwrap();
        assert_eq!(vitals.revenues, dec!(210000));
        assert_eq!(vitals.expenses, dec!(85000));
        assert_eq!(vitals.resultat_comptable, dec!(125000));
        assert_eq!(vitals.tva_facturee, dec!(42000));
        assert_eq!(vitals.tva_recuperable_charges, dec!(17000));
        assert_eq!(vitals.tva_recuperable_immo, dec!(0));
        assert_eq!(vitals.tva_due, dec!(25000));
    }

    #[test]
    fn empty_journal_is_all_zero() {
        let vitals = aggregate(&[]).unwrap();
        assert!(vitals.is_zero());
        assert_eq!(vitals.total_actif(), dec!(0));
        assert_eq!(vitals.total_passif(), dec!(0));
    }

    #[test]
    fn order_does_not_change_the_snapshot() {
        let entries = balanced_journal();
        let expected = aggregate(&entries).unwrap();

        let mut reversed = entries.clone();
        reversed.reverse();
        assert_eq!(aggregate(&reversed).unwrap(), expected);

        for shift in 1..entries.len() {
            let mut rotated = entries.clone();
            rotated.rotate_left(shift);
            assert_eq!(aggregate(&rotated).unwrap(), expected, "rotation {}", shift);
        }

        let mut by_account = entries.clone();
        by_account.sort_by(|a, b| a.account().cmp(b.account()));
        assert_eq!(aggregate(&by_account).unwrap(), expected);
    }

    #[test]
    fn balanced_journal_satisfies_balance_identity() {
        let entries = balanced_journal();
        assert!(is_balanced(&entries).unwrap());

        let vitals = aggregate(&entries).unwrap();
        assert_eq!(
            vitals.assets,
            vitals.equity + vitals.liabilities + vitals.resultat_comptable + vitals.tva_facturee
        );
        assert_eq!(vitals.balance_gap(), dec!(0));
        assert_eq!(vitals.cash, dec!(898000));
        assert_eq!(vitals.fixed_assets, dec!(300000));
        assert_eq!(vitals.current_assets, dec!(252000));
        assert_eq!(vitals.tva_recuperable_immo, dec!(60000));
        assert_eq!(vitals.assets, dec!(1527000));
        assert_eq!(vitals.liabilities, dec!(360000));
        assert_eq!(vitals.total_liabilities(), dec!(402000));
        assert_eq!(vitals.tva_due, dec!(-35000));
        assert!(check(&entries).unwrap().is_empty());
    }

    #[test]
    fn identity_holds_for_balanced_pairs() {
        let pairs = [
            (debit("5141", dec!(500)), credit("1111", dec!(500))),
            (debit("6111", dec!(120)), credit("5141", dec!(120))),
            (debit("3421", dec!(90)), credit("7121", dec!(90))),
            (debit("5141", dec!(75)), credit("4455", dec!(75))),
            (debit("3456", dec!(33)), credit("4481", dec!(33))),
        ];
        for (d, c) in pairs {
            let vitals = aggregate(&posted(vec![d.clone(), c.clone()])).unwrap();
            assert_eq!(vitals.balance_gap(), dec!(0), "{} / {}", d.account, c.account);
        }
    }

    #[test]
    fn unclassified_accounts_are_excluded_and_reported() {
        let mut records = vec![debit("8100", dec!(999))];
        records.extend(vec![credit("7121", dec!(10)), debit("5141", dec!(10))]);
        let entries = posted(records);

        let buckets = accumulate(&entries).unwrap();
        assert_eq!(buckets.unclassified, 1);
        assert_eq!(buckets.snapshot().revenues, dec!(10));
        assert_eq!(buckets.snapshot().assets, dec!(10));

        let warnings = check(&entries).unwrap();
        assert_eq!(
            warnings[0],
            Warning::UnclassifiedAccount {
                account: "8100".to_string(),
                entries: vec![EntryId(1)],
            }
        );
        assert!(matches!(warnings[1], Warning::UnbalancedJournal { .. }));
        assert_eq!(
            unclassified_accounts(&entries).into_iter().collect::<Vec<_>>(),
            vec!["8100".to_string()]
        );
    }

    #[test]
    fn balanced_journal_with_unclassified_account_reports_mismatch() {
        let entries = posted(vec![debit("5141", dec!(40)), credit("8800", dec!(40))]);
        let warnings = check(&entries).unwrap();
        assert!(warnings.contains(&Warning::BalanceSheetMismatch {
            actif: dec!(40),
            passif: dec!(0),
        }));
    }

    #[test]
    fn trial_balance_groups_by_account() {
        let lines = trial_balance(&balanced_journal()).unwrap();
        let accounts: Vec<_> = lines.iter().map(|l| l.account.as_str()).collect();
        assert_eq!(
            accounts,
            vec![
                "1111", "2340", "3421", "3455", "3456", "4411", "4455", "4481", "5141", "6121",
                "7121"
            ]
        );

        let bank = lines.iter().find(|l| l.account == "5141").unwrap();
        assert_eq!(bank.entries, 2);
        assert_eq!(bank.debit, dec!(1000000));
        assert_eq!(bank.credit, dec!(102000));
        assert_eq!(bank.balance(), dec!(898000));
        assert_eq!(bank.class, Some(AccountClass::Treasury));

        let supplier = lines.iter().find(|l| l.account == "4411").unwrap();
        assert_eq!(supplier.balance(), dec!(0));

        let total: Decimal = lines.iter().map(|l| l.balance()).sum();
        assert_eq!(total, dec!(0));
    }

    #[test]
    fn period_filter_is_inclusive() {
        let entries = posted(vec![
            EntryRecord::credit("2024-01-31", "7121", "", dec!(1)),
            EntryRecord::credit("2024-02-01", "7121", "", dec!(10)),
            EntryRecord::credit("2024-02-29", "7121", "", dec!(100)),
            EntryRecord::credit("2024-03-01", "7121", "", dec!(1000)),
        ]);
        let february = Period {
            from: NaiveDate::from_ymd_opt(2024, 2, 1),
            to: NaiveDate::from_ymd_opt(2024, 2, 29),
        };
        assert_eq!(aggregate(february.filter(&entries)).unwrap().revenues, dec!(110));
        let all = aggregate(Period::default().filter(&entries)).unwrap();
        assert_eq!(all.revenues, dec!(1111));
        assert!(Period::default().is_unbounded());
        assert_eq!(february.display(), "2024-02-01 to 2024-02-29");
    }

    #[test]
    fn sums_past_the_decimal_range_are_errors() {
        let entries = posted(vec![debit("5141", Decimal::MAX), debit("5141", dec!(1))]);
        let overflow = LedgerError::AmountOverflow(EntryId(2));
        assert_eq!(trial_balance(&entries), Err(overflow.clone()));
        assert_eq!(totals(&entries), Err(overflow.clone()));
        assert_eq!(is_balanced(&entries), Err(overflow.clone()));
        assert_eq!(check(&entries), Err(overflow));
        // a single maximal amount already exceeds the volume bound
        assert_eq!(
            aggregate(&entries[..1]),
            Err(LedgerError::AmountOverflow(EntryId(1)))
        );
    }

    #[test]
    fn buckets_stay_unchanged_when_an_entry_is_rejected() {
        let entries = posted(vec![credit("7121", volume_limit()), credit("7121", dec!(1000))]);
        let mut buckets = Buckets::default();
        assert_eq!(buckets.post(&entries[0]), Ok(Some(AccountClass::Revenues)));
        let before = buckets.clone();
        assert!(buckets.post(&entries[1]).is_err());
        assert_eq!(buckets, before);
        // the bound leaves room for the derived totals
        let snapshot = buckets.snapshot();
        assert_eq!(snapshot.total_passif(), volume_limit());
        assert_eq!(snapshot.balance_gap(), -volume_limit());
    }

    #[test]
    fn snapshot_serializes_with_dashboard_names() {
        let json = serde_json::to_value(aggregate(&harvest_scenario()).unwrap()).unwrap();
        assert_eq!(json["resultatComptable"], "125000");
        assert_eq!(json["tvaFacturee"], "42000");
        assert_eq!(json["tvaRecuperableCharges"], "17000");
        assert_eq!(json["tvaDue"], "25000");
    }
}
