//! Simulate command - IS bracket and TVA forecast, actual versus hypothetical

use crate::cmd::{format_mad, format_pct, read_journal, PeriodArgs};
use crate::core::{
    aggregate, Bracket, FiscalRegime, Simulation, SimulationOverrides, TaxBracketResult,
};
use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SimulateCommand {
    /// Journal file (.json or .csv, "-" for stdin)
    #[arg(short, long)]
    journal: PathBuf,

    #[command(flatten)]
    period: PeriodArgs,

    /// Hypothetical profit for the simulated IS bracket
    #[arg(short, long, allow_hyphen_values = true)]
    profit: Option<Decimal>,

    /// Sales figure for the TVA forecast (defaults to journal revenues)
    #[arg(short, long)]
    sales: Option<Decimal>,

    /// JSON file overriding the IS/TVA rates and thresholds
    #[arg(short, long)]
    regime: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationOutput {
    period: String,
    regime: FiscalRegime,
    #[serde(flatten)]
    simulation: Simulation,
}

impl SimulateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let regime = self.load_regime()?;
        let journal = read_journal(&self.journal)?;
        let period = self.period.period();
        let vitals = if period.is_unbounded() {
            journal.vitals()
        } else {
            aggregate(period.filter(journal.all()))?
        };

        let overrides = SimulationOverrides {
            profit: self.profit,
            sales: self.sales,
        };
        let simulation = regime.simulate_vitals(&vitals, overrides);
        log::debug!("Simulation: {:?}", simulation);

        if self.json {
            let output = SimulationOutput {
                period: period.display(),
                regime,
                simulation,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_simulation(&simulation, &regime, &period.display());
        }
        Ok(())
    }

    fn load_regime(&self) -> anyhow::Result<FiscalRegime> {
        match &self.regime {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("cannot open regime {}", path.display()))?;
                FiscalRegime::read_json(BufReader::new(file))
                    .with_context(|| format!("cannot read regime {}", path.display()))
            }
            None => Ok(FiscalRegime::default()),
        }
    }
}

fn print_simulation(sim: &Simulation, regime: &FiscalRegime, period: &str) {
    println!();
    println!("FISCAL SIMULATION ({})", period);
    println!();

    println!("IMPÔT SUR LES SOCIÉTÉS");
    print_bracket("Actual", sim.actual_profit, &sim.actual_bracket, sim.effective_rate_actual);
    print_bracket(
        "Simulated",
        sim.simulated_profit,
        &sim.simulated_bracket,
        sim.effective_rate_simulated,
    );
    let difference = sim.simulated_bracket.total - sim.actual_bracket.total;
    if !difference.is_zero() {
        println!("  Difference: {}", format_mad(difference));
    }
    println!();

    println!("TVA FORECAST");
    println!(
        "  Sales {} @ {}: {}",
        format_mad(sim.forecast_sales),
        format_pct(regime.vat_rate),
        format_mad(sim.vat_forecast)
    );
    println!();
}

fn print_bracket(name: &str, profit: Decimal, bracket: &TaxBracketResult, effective: Decimal) {
    if bracket.bracket == Bracket::Deficit {
        println!("  {}: profit {} | deficit, no IS due", name, format_mad(profit));
        return;
    }
    println!(
        "  {}: profit {} | bracket {} @ {:.0}% | IS {} | effective {}",
        name,
        format_mad(profit),
        bracket.label,
        bracket.rate_pct(),
        format_mad(bracket.total),
        format_pct(effective)
    );
}
