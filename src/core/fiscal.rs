use super::error::LedgerError;
use super::vitals::VitalsSnapshot;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Corporate income tax (IS) bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Bracket {
    Deficit,
    Reduced,
    Standard,
    Elevated,
}

impl Bracket {
    pub fn label(self) -> &'static str {
        match self {
            Bracket::Deficit => "deficit",
            Bracket::Reduced => "reduced (SME)",
            Bracket::Standard => "standard unified",
            Bracket::Elevated => "elevated (>100M)",
        }
    }
}

impl std::fmt::Display for Bracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// IS schedule and VAT rate.
///
/// The selected bracket's rate applies to the whole profit; there is no
/// marginal blending across brackets. Defaults to the Moroccan schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct FiscalRegime {
    /// Rate for 0 < profit < standard_threshold
    #[schemars(with = "f64")]
    pub reduced_rate: Decimal,
    /// Rate for standard_threshold <= profit < elevated_threshold
    #[schemars(with = "f64")]
    pub standard_rate: Decimal,
    /// Rate for profit >= elevated_threshold
    #[schemars(with = "f64")]
    pub elevated_rate: Decimal,
    #[schemars(with = "f64")]
    pub standard_threshold: Decimal,
    #[schemars(with = "f64")]
    pub elevated_threshold: Decimal,
    /// TVA rate applied to the sales forecast
    #[schemars(with = "f64")]
    pub vat_rate: Decimal,
}

impl Default for FiscalRegime {
    fn default() -> Self {
        FiscalRegime {
            reduced_rate: dec!(0.10),
            standard_rate: dec!(0.20),
            elevated_rate: dec!(0.35),
            standard_threshold: dec!(300000),
            elevated_threshold: dec!(100000000),
            vat_rate: dec!(0.20),
        }
    }
}

/// Income tax due on one profit figure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxBracketResult {
    #[serde(skip)]
    pub bracket: Bracket,
    /// Liability, rounded to 2 dp
    pub total: Decimal,
    /// Rate as a fraction (0.10 = 10%)
    pub rate: Decimal,
    pub label: &'static str,
}

impl TaxBracketResult {
    pub fn rate_pct(&self) -> Decimal {
        self.rate * dec!(100)
    }
}

/// Hypothetical figures for the simulator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationOverrides {
    pub profit: Option<Decimal>,
    pub sales: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub actual_profit: Decimal,
    pub simulated_profit: Decimal,
    pub forecast_sales: Decimal,
    pub actual_bracket: TaxBracketResult,
    pub simulated_bracket: TaxBracketResult,
    pub vat_forecast: Decimal,
    pub effective_rate_actual: Decimal,
    pub effective_rate_simulated: Decimal,
}

impl FiscalRegime {
    /// Read a regime from JSON. Missing fields keep their default.
    pub fn read_json<R: Read>(reader: R) -> anyhow::Result<FiscalRegime> {
        let regime: FiscalRegime = serde_json::from_reader(reader)?;
        regime.validate()?;
        Ok(regime)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        let rates = [
            ("reduced_rate", self.reduced_rate),
            ("standard_rate", self.standard_rate),
            ("elevated_rate", self.elevated_rate),
            ("vat_rate", self.vat_rate),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(LedgerError::InvalidRegime(format!(
                    "{} must be between 0 and 1, got {}",
                    name, rate
                )));
            }
        }
        if self.standard_threshold <= Decimal::ZERO {
            return Err(LedgerError::InvalidRegime(
                "standard_threshold must be positive".to_string(),
            ));
        }
        if self.elevated_threshold < self.standard_threshold {
            return Err(LedgerError::InvalidRegime(format!(
                "elevated_threshold {} is below standard_threshold {}",
                self.elevated_threshold, self.standard_threshold
            )));
        }
        Ok(())
    }

    pub fn bracket(&self, profit: Decimal) -> Bracket {
        if profit <= Decimal::ZERO {
            Bracket::Deficit
        } else if profit < self.standard_threshold {
            Bracket::Reduced
        } else if profit < self.elevated_threshold {
            Bracket::Standard
        } else {
            Bracket::Elevated
        }
    }

    pub fn rate(&self, bracket: Bracket) -> Decimal {
        match bracket {
            Bracket::Deficit => Decimal::ZERO,
            Bracket::Reduced => self.reduced_rate,
            Bracket::Standard => self.standard_rate,
            Bracket::Elevated => self.elevated_rate,
        }
    }

    /// IS liability: the bracket's rate times the whole profit
    pub fn income_tax(&self, profit: Decimal) -> TaxBracketResult {
        let bracket = self.bracket(profit);
        let rate = self.rate(bracket);
        let total = if bracket == Bracket::Deficit {
            Decimal::ZERO
        } else {
            (profit * rate).round_dp(2)
        };
        TaxBracketResult {
            bracket,
            total,
            rate,
            label: bracket.label(),
        }
    }

    /// Liability over profit, as a fraction rounded to 4 dp. Zero when there is no profit.
    pub fn effective_rate(&self, profit: Decimal) -> Decimal {
        if profit <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.income_tax(profit).total / profit).round_dp(4)
    }

    /// TVA expected on a sales figure
    pub fn vat_forecast(&self, sales: Decimal) -> Decimal {
        (sales * self.vat_rate).round_dp(2)
    }

    /// Compare the actual position with a hypothetical one.
    ///
    /// The profit override only feeds the simulated bracket; the sales
    /// override only feeds the VAT forecast, which otherwise uses actual sales.
    pub fn simulate(
        &self,
        actual_profit: Decimal,
        actual_sales: Decimal,
        overrides: SimulationOverrides,
    ) -> Simulation {
        let simulated_profit = overrides.profit.unwrap_or(actual_profit);
        let forecast_sales = overrides.sales.unwrap_or(actual_sales);

        Simulation {
            actual_profit,
            simulated_profit,
            forecast_sales,
            actual_bracket: self.income_tax(actual_profit),
            simulated_bracket: self.income_tax(simulated_profit),
            vat_forecast: self.vat_forecast(forecast_sales),
            effective_rate_actual: self.effective_rate(actual_profit),
            effective_rate_simulated: self.effective_rate(simulated_profit),
        }
    }

    /// Simulate from journal vitals: the accounting result and revenues
    pub fn simulate_vitals(
        &self,
        vitals: &VitalsSnapshot,
        overrides: SimulationOverrides,
    ) -> Simulation {
        self.simulate(vitals.resultat_comptable, vitals.revenues, overrides)
    }
}
