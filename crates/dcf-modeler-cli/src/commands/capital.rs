use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use dcf_modeler_core::capital::{calculate_cost_of_capital, CapitalStructureInputs};

use crate::input;

/// Arguments for the cost-of-capital calculation. Rates are in percent
/// terms (4.2 means 4.2%).
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct WaccArgs {
    /// Risk-free rate (e.g. 4.2 for the 10-year treasury)
    #[arg(long)]
    pub risk_free_rate: Option<Decimal>,

    /// Levered equity beta (may be negative)
    #[arg(long)]
    pub beta: Option<Decimal>,

    /// Market risk premium (e.g. 7.0)
    #[arg(long, alias = "mrp")]
    pub market_risk_premium: Option<Decimal>,

    /// Pre-tax cost of debt
    #[arg(long)]
    pub cost_of_debt: Option<Decimal>,

    /// Marginal corporate tax rate
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Debt-to-equity ratio (e.g. 0.4)
    #[arg(long, alias = "de")]
    pub debt_to_equity: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_wacc(args: WaccArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: CapitalStructureInputs = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        CapitalStructureInputs {
            risk_free_rate: args
                .risk_free_rate
                .ok_or("--risk-free-rate is required (or provide --input)")?,
            beta: args.beta.ok_or("--beta is required (or provide --input)")?,
            market_risk_premium: args
                .market_risk_premium
                .ok_or("--market-risk-premium is required (or provide --input)")?,
            cost_of_debt: args
                .cost_of_debt
                .ok_or("--cost-of-debt is required (or provide --input)")?,
            tax_rate: args
                .tax_rate
                .ok_or("--tax-rate is required (or provide --input)")?,
            debt_to_equity: args
                .debt_to_equity
                .ok_or("--debt-to-equity is required (or provide --input)")?,
        }
    };

    let result = calculate_cost_of_capital(&inputs)?;
    Ok(serde_json::to_value(result)?)
}
