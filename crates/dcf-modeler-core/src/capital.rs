use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::types::{with_metadata, ComputationOutput, Percent};
use crate::ModelResult;

/// Input parameters for the cost-of-capital calculation. All rates are in
/// percent terms; `debt_to_equity` is a plain ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalStructureInputs {
    /// Risk-free rate (e.g. 10-year government bond yield)
    pub risk_free_rate: Percent,
    /// Levered equity beta; may be negative for defensive exposures
    pub beta: Decimal,
    /// Market risk premium (market return minus risk-free rate)
    pub market_risk_premium: Percent,
    /// Pre-tax cost of debt
    pub cost_of_debt: Percent,
    /// Marginal corporate tax rate, applied to the debt leg
    pub tax_rate: Percent,
    /// Debt-to-equity ratio (market value basis)
    pub debt_to_equity: Decimal,
}

/// Output of the cost-of-capital calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostOfCapitalResult {
    /// Cost of equity via CAPM
    pub cost_of_equity: Percent,
    /// Cost of debt after the tax shield
    pub after_tax_cost_of_debt: Percent,
    /// Equity weight implied by the D/E ratio
    pub equity_weight: Decimal,
    /// Debt weight implied by the D/E ratio
    pub debt_weight: Decimal,
    /// Blended weighted average cost of capital
    pub wacc: Percent,
}

/// Derive cost of equity and blended WACC from CAPM inputs and the
/// capital-structure ratio.
///
/// Cost of equity: Ke = Rf + Beta * MRP
/// Weights: We = 1 / (1 + D/E), Wd = (D/E) / (1 + D/E)
/// WACC = We * Ke + Wd * Kd * (1 - tax)
///
/// Pure and side-effect-free; safe to memoize on input equality.
pub fn calculate_cost_of_capital(
    input: &CapitalStructureInputs,
) -> ModelResult<ComputationOutput<CostOfCapitalResult>> {
    let mut warnings: Vec<String> = Vec::new();

    validate_inputs(input)?;

    // CAPM. Beta is deliberately unconstrained: a negative beta models a
    // defensive or inverse exposure and produces Ke below the risk-free rate.
    let cost_of_equity = input.risk_free_rate + input.beta * input.market_risk_premium;

    let one_plus_de = Decimal::ONE + input.debt_to_equity;
    let equity_weight = Decimal::ONE / one_plus_de;
    let debt_weight = input.debt_to_equity / one_plus_de;

    let after_tax_cost_of_debt =
        input.cost_of_debt * (Decimal::ONE - input.tax_rate / dec!(100));
    let wacc = equity_weight * cost_of_equity + debt_weight * after_tax_cost_of_debt;

    if input.beta.abs() > dec!(3.0) {
        warnings.push(format!(
            "Beta of {} is unusual; betas beyond +/-3.0 warrant a market-data check",
            input.beta
        ));
    }
    if input.beta < Decimal::ZERO {
        warnings.push(format!(
            "Negative beta ({}): cost of equity falls below the risk-free rate",
            input.beta
        ));
    }
    if wacc > dec!(20) {
        warnings.push(format!(
            "WACC of {wacc}% exceeds 20%; appropriate for high-risk situations only"
        ));
    }

    let output = CostOfCapitalResult {
        cost_of_equity,
        after_tax_cost_of_debt,
        equity_weight,
        debt_weight,
        wacc,
    };

    Ok(with_metadata("WACC via CAPM", input, warnings, output))
}

fn validate_inputs(input: &CapitalStructureInputs) -> ModelResult<()> {
    if input.debt_to_equity < Decimal::ZERO {
        // A negative ratio produces a negative debt weight and the weights
        // no longer sum to 1.
        return Err(ModelError::InvalidCapitalStructure(format!(
            "debt-to-equity ratio must be non-negative, got {}",
            input.debt_to_equity
        )));
    }
    if input.risk_free_rate < Decimal::ZERO {
        return Err(ModelError::InvalidInput {
            field: "risk_free_rate".into(),
            reason: "Risk-free rate cannot be negative".into(),
        });
    }
    if input.market_risk_premium < Decimal::ZERO {
        return Err(ModelError::InvalidInput {
            field: "market_risk_premium".into(),
            reason: "Market risk premium cannot be negative".into(),
        });
    }
    if input.cost_of_debt < Decimal::ZERO {
        return Err(ModelError::InvalidInput {
            field: "cost_of_debt".into(),
            reason: "Cost of debt cannot be negative".into(),
        });
    }
    if input.tax_rate < Decimal::ZERO || input.tax_rate > dec!(100) {
        return Err(ModelError::InvalidInput {
            field: "tax_rate".into(),
            reason: "Tax rate must be between 0 and 100 percent".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Defaults from the modeling tool: 10-year treasury, historical MRP.
    fn sample_input() -> CapitalStructureInputs {
        CapitalStructureInputs {
            risk_free_rate: dec!(4.2),
            beta: dec!(1.2),
            market_risk_premium: dec!(7.0),
            cost_of_debt: dec!(5.5),
            tax_rate: dec!(21),
            debt_to_equity: dec!(0.4),
        }
    }

    #[test]
    fn test_capm_cost_of_equity() {
        let result = calculate_cost_of_capital(&sample_input()).unwrap();
        // Ke = 4.2 + 1.2 * 7.0 = 12.6
        assert_eq!(result.result.cost_of_equity, dec!(12.6));
    }

    #[test]
    fn test_weights_sum_to_one() {
        let result = calculate_cost_of_capital(&sample_input()).unwrap();
        let out = &result.result;
        assert!((out.equity_weight + out.debt_weight - Decimal::ONE).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_blended_wacc() {
        let result = calculate_cost_of_capital(&sample_input()).unwrap();
        let out = &result.result;

        // We = 1/1.4, Wd = 0.4/1.4
        // Kd_at = 5.5 * 0.79 = 4.345
        // WACC = 12.6/1.4 + 0.4*4.345/1.4 = 9.0 + 1.2414... = 10.2414...
        let expected = dec!(12.6) / dec!(1.4) + dec!(0.4) * dec!(4.345) / dec!(1.4);
        assert!(
            (out.wacc - expected).abs() < dec!(0.0001),
            "WACC: expected ~{expected}, got {}",
            out.wacc
        );
        assert_eq!(out.after_tax_cost_of_debt, dec!(4.3450));
    }

    #[test]
    fn test_all_equity_structure() {
        let mut input = sample_input();
        input.debt_to_equity = Decimal::ZERO;

        let result = calculate_cost_of_capital(&input).unwrap();
        let out = &result.result;
        assert_eq!(out.equity_weight, Decimal::ONE);
        assert_eq!(out.debt_weight, Decimal::ZERO);
        // With no debt leg, WACC collapses to the cost of equity
        assert_eq!(out.wacc, out.cost_of_equity);
    }

    #[test]
    fn test_negative_debt_to_equity_rejected() {
        let mut input = sample_input();
        input.debt_to_equity = dec!(-0.2);

        match calculate_cost_of_capital(&input) {
            Err(ModelError::InvalidCapitalStructure(_)) => {}
            other => panic!("Expected InvalidCapitalStructure, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_beta_allowed() {
        let mut input = sample_input();
        input.beta = dec!(-0.3);

        let result = calculate_cost_of_capital(&input).unwrap();
        // Ke = 4.2 - 0.3 * 7.0 = 2.1
        assert_eq!(result.result.cost_of_equity, dec!(2.1));
        assert!(result.warnings.iter().any(|w| w.contains("Negative beta")));
    }

    #[test]
    fn test_negative_risk_free_rate_rejected() {
        let mut input = sample_input();
        input.risk_free_rate = dec!(-0.5);
        assert!(calculate_cost_of_capital(&input).is_err());
    }

    #[test]
    fn test_tax_rate_above_100_rejected() {
        let mut input = sample_input();
        input.tax_rate = dec!(120);
        assert!(calculate_cost_of_capital(&input).is_err());
    }

    #[test]
    fn test_high_wacc_warning() {
        let mut input = sample_input();
        input.beta = dec!(2.8);
        input.market_risk_premium = dec!(9);

        let result = calculate_cost_of_capital(&input).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("exceeds 20%")));
    }

    #[test]
    fn test_methodology_string() {
        let result = calculate_cost_of_capital(&sample_input()).unwrap();
        assert_eq!(result.methodology, "WACC via CAPM");
    }
}
