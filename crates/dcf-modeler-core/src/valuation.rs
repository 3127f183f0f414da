use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::capital::{calculate_cost_of_capital, CapitalStructureInputs, CostOfCapitalResult};
use crate::error::ModelError;
use crate::projection::{project, DEFAULT_FORECAST_YEARS};
use crate::scenario;
use crate::types::{
    with_metadata, BaseAssumptions, ComputationOutput, EffectiveAssumptions, Money, Percent,
    ProjectionPeriod, Scenario,
};
use crate::ModelResult;

/// Input for a full valuation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationInput {
    pub assumptions: BaseAssumptions,
    /// Scenario adjustment applied to growth and margin
    #[serde(default)]
    pub scenario: Scenario,
    /// If provided, the discount rate is replaced by the CAPM-derived WACC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital_structure: Option<CapitalStructureInputs>,
    /// Number of explicit forecast years (default 5)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_years: Option<u32>,
}

/// Terminal value and enterprise value derived from a projection.
/// Stateless and recomputed wholesale on any input change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub periods: Vec<ProjectionPeriod>,
    /// Gordon growth terminal value at the forecast horizon
    pub terminal_value: Money,
    /// Terminal value discounted back to today
    pub pv_of_terminal_value: Money,
    /// Sum of explicit-period PVs plus discounted terminal value
    pub enterprise_value: Money,
    /// Share of enterprise value contributed by the terminal value
    pub terminal_value_pct: Decimal,
}

/// Output of a full valuation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationOutput {
    /// Scenario-adjusted growth and margin actually used
    pub effective: EffectiveAssumptions,
    /// Discount rate actually used (manual or CAPM-derived)
    pub discount_rate_used: Percent,
    /// Present when the discount rate came from the capital structure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_of_capital: Option<CostOfCapitalResult>,
    pub valuation: ValuationResult,
}

/// Fold a projection and a Gordon growth terminal value into enterprise
/// value.
///
/// The non-convergence check runs before any division: a discount rate
/// equal to the terminal growth rate divides by zero, and one below it
/// produces a silently negative terminal value, so both are rejected up
/// front. Aggregation uses the unrounded period figures throughout to
/// avoid compounding rounding error.
pub fn aggregate(
    periods: &[ProjectionPeriod],
    terminal_growth_rate: Percent,
    discount_rate: Percent,
) -> ModelResult<ValuationResult> {
    if discount_rate <= dec!(-100) {
        return Err(ModelError::InvalidDiscountRate(format!(
            "discount rate must exceed -100%, got {discount_rate}%"
        )));
    }
    if discount_rate <= terminal_growth_rate {
        return Err(ModelError::NonConvergentTerminalValue(format!(
            "discount rate ({discount_rate}%) must exceed terminal growth rate ({terminal_growth_rate}%)"
        )));
    }
    let last = periods.last().ok_or_else(|| {
        ModelError::InsufficientData("No projection periods to aggregate".into())
    })?;

    let terminal_value = last.fcf * (Decimal::ONE + terminal_growth_rate / dec!(100))
        / ((discount_rate - terminal_growth_rate) / dec!(100));

    let horizon = Decimal::from(periods.len() as u32);
    let tv_discount_factor = (Decimal::ONE + discount_rate / dec!(100)).powd(horizon);
    let pv_of_terminal_value = terminal_value / tv_discount_factor;

    let pv_of_periods: Money = periods.iter().map(|p| p.present_value).sum();
    let enterprise_value = pv_of_periods + pv_of_terminal_value;

    let terminal_value_pct = if enterprise_value.is_zero() {
        Decimal::ZERO
    } else {
        pv_of_terminal_value / enterprise_value
    };

    Ok(ValuationResult {
        periods: periods.to_vec(),
        terminal_value,
        pv_of_terminal_value,
        enterprise_value,
        terminal_value_pct,
    })
}

/// Run the full pipeline: scenario resolution, five-period projection,
/// terminal-value aggregation.
pub fn run_valuation(input: &ValuationInput) -> ModelResult<ComputationOutput<ValuationOutput>> {
    let mut warnings: Vec<String> = Vec::new();

    let (discount_rate, cost_of_capital) = resolve_discount_rate(input, &mut warnings)?;

    let effective = scenario::resolve(&input.assumptions, input.scenario);
    if effective.margin < Decimal::ZERO || effective.margin > dec!(100) {
        warnings.push(format!(
            "Scenario-adjusted EBITDA margin of {}% is outside [0%, 100%]; the adjustment is applied unclamped",
            effective.margin
        ));
    }
    if effective.growth < Decimal::ZERO {
        warnings.push(format!(
            "Scenario-adjusted growth of {}% implies shrinking revenue",
            effective.growth
        ));
    }

    let years = input.forecast_years.unwrap_or(DEFAULT_FORECAST_YEARS);
    let periods = project(
        input.assumptions.revenue_base,
        &effective,
        input.assumptions.tax_rate,
        discount_rate,
        years,
    )?;

    let valuation = aggregate(&periods, input.assumptions.terminal_growth_rate, discount_rate)?;

    if valuation.terminal_value_pct > dec!(0.75) {
        warnings.push(format!(
            "Terminal value represents {:.1}% of enterprise value; consider extending the explicit forecast period",
            valuation.terminal_value_pct * dec!(100)
        ));
    }

    let output = ValuationOutput {
        effective,
        discount_rate_used: discount_rate,
        cost_of_capital,
        valuation,
    };

    Ok(with_metadata(
        "Five-period FCF DCF with Gordon growth terminal value",
        input,
        warnings,
        output,
    ))
}

fn resolve_discount_rate(
    input: &ValuationInput,
    warnings: &mut Vec<String>,
) -> ModelResult<(Percent, Option<CostOfCapitalResult>)> {
    if let Some(ref capital) = input.capital_structure {
        let coc = calculate_cost_of_capital(capital)?;
        for w in &coc.warnings {
            warnings.push(format!("[WACC] {w}"));
        }
        Ok((coc.result.wacc, Some(coc.result)))
    } else {
        Ok((input.assumptions.discount_rate, None))
    }
}
