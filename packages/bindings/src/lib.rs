use napi::Result as NapiResult;
use napi_derive::napi;

use dcf_modeler_core::capital;
use dcf_modeler_core::scenario;
use dcf_modeler_core::sensitivity;
use dcf_modeler_core::templates::Industry;
use dcf_modeler_core::valuation;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[napi]
pub fn calculate_cost_of_capital(input_json: String) -> NapiResult<String> {
    let input: capital::CapitalStructureInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = capital::calculate_cost_of_capital(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn run_valuation(input_json: String) -> NapiResult<String> {
    let input: valuation::ValuationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = valuation::run_valuation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn generate_sensitivity_grid(input_json: String) -> NapiResult<String> {
    let input: valuation::ValuationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let effective = scenario::resolve(&input.assumptions, input.scenario);
    let center_rate = match input.capital_structure {
        Some(ref cs) => {
            capital::calculate_cost_of_capital(cs)
                .map_err(to_napi_error)?
                .result
                .wacc
        }
        None => input.assumptions.discount_rate,
    };
    let output = sensitivity::generate_grid(
        input.assumptions.revenue_base,
        &effective,
        input.assumptions.tax_rate,
        input.assumptions.terminal_growth_rate,
        center_rate,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn industry_templates() -> NapiResult<String> {
    let templates: Vec<_> = Industry::ALL.iter().map(|i| i.template()).collect();
    serde_json::to_string(&templates).map_err(to_napi_error)
}
