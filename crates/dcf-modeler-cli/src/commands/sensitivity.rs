use clap::Args;
use serde_json::Value;

use dcf_modeler_core::capital::calculate_cost_of_capital;
use dcf_modeler_core::scenario;
use dcf_modeler_core::sensitivity::generate_grid;

use crate::commands::valuation::{build_valuation_input, ModelArgs};

/// Arguments for the sensitivity grid. Takes the same model parameters as
/// `value`; the grid perturbs growth by [-4, -2, 0, +2, +4] points and
/// WACC by [-2, -1, 0, +1, +2] points around the resolved values.
#[derive(Args)]
pub struct GridArgs {
    #[command(flatten)]
    pub model: ModelArgs,
}

pub fn run_grid(args: GridArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let valuation_input = build_valuation_input(&args.model)?;
    let assumptions = &valuation_input.assumptions;

    let effective = scenario::resolve(assumptions, valuation_input.scenario);
    // CAPM-derived WACC takes over as the grid center when a capital
    // structure is supplied, same as in the valuation pipeline
    let center_rate = match valuation_input.capital_structure {
        Some(ref capital) => calculate_cost_of_capital(capital)?.result.wacc,
        None => assumptions.discount_rate,
    };
    let result = generate_grid(
        assumptions.revenue_base,
        &effective,
        assumptions.tax_rate,
        assumptions.terminal_growth_rate,
        center_rate,
    )?;

    Ok(serde_json::to_value(result)?)
}
