use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use dcf_modeler_core::templates::Industry;
use dcf_modeler_core::types::{BaseAssumptions, Scenario};
use dcf_modeler_core::valuation::{run_valuation, ValuationInput};

use crate::input;

/// Shared model parameters for the `value` and `grid` subcommands.
/// Rates are in percent terms (15 means 15%).
#[derive(Args)]
pub struct ModelArgs {
    /// Path to a JSON valuation input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Industry template preset: saas, manufacturing, retail, custom
    #[arg(long)]
    pub template: Option<String>,

    /// Year 0 revenue
    #[arg(long, default_value = "5000000")]
    pub revenue_base: Decimal,

    /// Annual revenue growth rate (ignored when --template is set)
    #[arg(long)]
    pub growth_rate: Option<Decimal>,

    /// EBITDA margin as a percent of revenue
    #[arg(long)]
    pub ebitda_margin: Option<Decimal>,

    /// Tax rate applied to EBITDA
    #[arg(long, default_value = "21")]
    pub tax_rate: Decimal,

    /// Discount rate (WACC)
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Terminal (perpetuity) growth rate
    #[arg(long)]
    pub terminal_growth: Option<Decimal>,

    /// Scenario adjustment: base, upside, downside
    #[arg(long, default_value = "base")]
    pub scenario: String,
}

/// Arguments for the full DCF valuation
#[derive(Args)]
pub struct ValueArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Number of explicit forecast years (default 5)
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_value(args: ValueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut valuation_input = build_valuation_input(&args.model)?;
    if args.years.is_some() {
        valuation_input.forecast_years = args.years;
    }

    let result = run_valuation(&valuation_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Assemble a ValuationInput from an input file, piped stdin, or flags.
/// A template preset fills growth, margin, WACC, and terminal growth;
/// explicit flags win over the preset.
pub fn build_valuation_input(args: &ModelArgs) -> Result<ValuationInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return Ok(input::file::read_json(path)?);
    }
    if let Some(piped) = input::stdin::read_stdin()? {
        return Ok(piped);
    }

    let preset = match args.template.as_deref() {
        Some("saas") => Industry::Saas,
        Some("manufacturing") => Industry::Manufacturing,
        Some("retail") => Industry::Retail,
        Some("custom") | None => Industry::Custom,
        Some(other) => {
            return Err(format!(
                "Unknown template '{other}'; expected saas, manufacturing, retail, or custom"
            )
            .into())
        }
    };
    let template = preset.template();

    let assumptions = BaseAssumptions {
        revenue_base: args.revenue_base,
        growth_rate: args.growth_rate.unwrap_or(template.growth),
        ebitda_margin: args.ebitda_margin.unwrap_or(template.margin),
        tax_rate: args.tax_rate,
        discount_rate: args.discount_rate.unwrap_or(template.wacc),
        terminal_growth_rate: args.terminal_growth.unwrap_or(template.terminal),
    };

    let scenario = parse_scenario(&args.scenario)?;

    Ok(ValuationInput {
        assumptions,
        scenario,
        capital_structure: None,
        forecast_years: None,
    })
}

fn parse_scenario(s: &str) -> Result<Scenario, Box<dyn std::error::Error>> {
    match s {
        "base" => Ok(Scenario::Base),
        "upside" => Ok(Scenario::Upside),
        "downside" => Ok(Scenario::Downside),
        other => Err(format!("Unknown scenario '{other}'; expected base, upside, or downside").into()),
    }
}
