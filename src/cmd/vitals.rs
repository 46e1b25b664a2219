//! Vitals command - Finance Hub dashboard figures and the balance sheet

use crate::cmd::{format_mad, read_journal, PeriodArgs};
use crate::core::vitals::{accumulate, unclassified_accounts};
use crate::core::VitalsSnapshot;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct VitalsCommand {
    /// Journal file (.json or .csv, "-" for stdin)
    #[arg(short, long)]
    journal: PathBuf,

    #[command(flatten)]
    period: PeriodArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VitalsOutput {
    period: String,
    entry_count: usize,
    digest: String,
    vitals: VitalsSnapshot,
    total_actif: String,
    total_passif: String,
    unclassified_accounts: Vec<String>,
}

impl VitalsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let journal = read_journal(&self.journal)?;
        let period = self.period.period();

        let entries: Vec<_> = period.filter(journal.all()).collect();
        let entry_count = entries.len();

        // loading the journal has already warned about each unclassified entry
        let (vitals, excluded) = if period.is_unbounded() {
            (journal.vitals(), journal.buckets().unclassified)
        } else {
            let buckets = accumulate(entries.iter().copied())?;
            (buckets.snapshot(), buckets.unclassified)
        };
        log::debug!(
            "{} of {} entries excluded as unclassified",
            excluded,
            entry_count
        );
        let unclassified: Vec<String> = unclassified_accounts(entries.iter().copied())
            .into_iter()
            .collect();

        if self.json {
            let output = VitalsOutput {
                period: period.display(),
                entry_count,
                digest: journal.digest(),
                total_actif: format!("{:.2}", vitals.total_actif()),
                total_passif: format!("{:.2}", vitals.total_passif()),
                vitals,
                unclassified_accounts: unclassified,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_vitals(&vitals, &period.display(), entry_count, &unclassified);
        }
        Ok(())
    }
}

fn print_vitals(vitals: &VitalsSnapshot, period: &str, entry_count: usize, unclassified: &[String]) {
    println!();
    println!("FINANCE HUB VITALS ({}, {} entries)", period, entry_count);
    println!();

    if vitals.is_zero() {
        println!("No classified activity in this period.");
        println!();
    }

    println!("INCOME STATEMENT");
    println!("  Revenues: {}", format_mad(vitals.revenues));
    println!("  Expenses: {}", format_mad(vitals.expenses));
    println!("  Résultat comptable: {}", format_mad(vitals.resultat_comptable));
    println!();

    println!("TVA");
    println!("  Facturée (4455): {}", format_mad(vitals.tva_facturee));
    println!(
        "  Récupérable sur charges (3455): {}",
        format_mad(vitals.tva_recuperable_charges)
    );
    println!(
        "  Récupérable sur immobilisations (3456): {}",
        format_mad(vitals.tva_recuperable_immo)
    );
    if vitals.tva_due.is_sign_negative() && !vitals.tva_due.is_zero() {
        println!("  Crédit de TVA: {}", format_mad(vitals.tva_due.abs()));
    } else {
        println!("  TVA due: {}", format_mad(vitals.tva_due));
    }
    println!();

    println!("BILAN");
    println!("  Actif");
    println!("    Fixed assets: {}", format_mad(vitals.fixed_assets));
    println!("    Current assets: {}", format_mad(vitals.current_assets));
    println!(
        "    TVA récupérable: {}",
        format_mad(vitals.tva_recuperable_charges + vitals.tva_recuperable_immo)
    );
    println!("    Treasury: {}", format_mad(vitals.cash));
    println!("    Total Actif: {}", format_mad(vitals.total_actif()));
    println!("  Passif");
    println!("    Equity: {}", format_mad(vitals.equity));
    println!("    Liabilities: {}", format_mad(vitals.liabilities));
    println!("    TVA facturée: {}", format_mad(vitals.tva_facturee));
    println!("    Résultat: {}", format_mad(vitals.resultat_comptable));
    println!(
        "    (liabilities incl. TVA facturée: {})",
        format_mad(vitals.total_liabilities())
    );
    println!("    Total Passif: {}", format_mad(vitals.total_passif()));
    println!();

    if !vitals.balance_gap().is_zero() {
        println!(
            "\u{26A0} Actif and Passif differ by {}",
            format_mad(vitals.balance_gap())
        );
    }
    if !unclassified.is_empty() {
        println!(
            "\u{26A0} Excluded unclassified accounts: {}",
            unclassified.join(", ")
        );
    }
}
