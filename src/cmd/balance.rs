//! Balance command - trial balance (balance générale) per account

use crate::cmd::{read_journal, PeriodArgs};
use crate::core::{is_balanced, totals, trial_balance, TrialBalanceLine};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct BalanceCommand {
    /// Journal file (.json or .csv, "-" for stdin)
    #[arg(short, long)]
    journal: PathBuf,

    #[command(flatten)]
    period: PeriodArgs,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct BalanceRow {
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Entries")]
    entries: usize,
    #[tabled(rename = "Debit")]
    debit: String,
    #[tabled(rename = "Credit")]
    credit: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

impl From<&TrialBalanceLine> for BalanceRow {
    fn from(line: &TrialBalanceLine) -> Self {
        BalanceRow {
            account: line.account.clone(),
            class: line.class.map_or("unclassified".to_string(), |c| c.to_string()),
            entries: line.entries,
            debit: format!("{:.2}", line.debit),
            credit: format!("{:.2}", line.credit),
            balance: format!("{:.2}", line.balance()),
        }
    }
}

#[derive(Debug, Serialize)]
struct BalanceOutput {
    period: String,
    accounts: Vec<BalanceRow>,
    total_debit: String,
    total_credit: String,
    balanced: bool,
}

impl BalanceCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let journal = read_journal(&self.journal)?;
        let period = self.period.period();
        let lines = trial_balance(period.filter(journal.all()))?;

        let (total_debit, total_credit) = totals(period.filter(journal.all()))?;
        let balanced = is_balanced(period.filter(journal.all()))?;
        let rows: Vec<BalanceRow> = lines.iter().map(BalanceRow::from).collect();

        if self.json {
            let output = BalanceOutput {
                period: period.display(),
                accounts: rows,
                total_debit: format!("{:.2}", total_debit),
                total_credit: format!("{:.2}", total_credit),
                balanced,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!();
        println!("TRIAL BALANCE ({})", period.display());
        println!();
        if rows.is_empty() {
            println!("No entries found");
            return Ok(());
        }

        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!(
            "Total debit {:.2} | Total credit {:.2} | {}",
            total_debit,
            total_credit,
            if balanced {
                "balanced"
            } else {
                "NOT balanced"
            }
        );
        Ok(())
    }
}
