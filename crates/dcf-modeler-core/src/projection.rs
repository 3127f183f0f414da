use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::ModelError;
use crate::types::{EffectiveAssumptions, Money, Percent, ProjectionPeriod};
use crate::ModelResult;

/// Explicit forecast horizon used by the model.
pub const DEFAULT_FORECAST_YEARS: u32 = 5;

/// Project revenue, EBITDA, tax, free cash flow, and present value for
/// each forecast year.
///
/// Periods are strictly sequential: year i's revenue compounds off year
/// i-1's, so the rows are produced in order and cannot be computed
/// independently. All figures are returned unrounded; rounding is a
/// display concern (see [`ProjectionPeriod::rounded`]).
pub fn project(
    revenue_base: Money,
    effective: &EffectiveAssumptions,
    tax_rate: Percent,
    discount_rate: Percent,
    periods: u32,
) -> ModelResult<Vec<ProjectionPeriod>> {
    if revenue_base <= Decimal::ZERO {
        return Err(ModelError::InvalidInput {
            field: "revenue_base".into(),
            reason: "Base revenue must be positive".into(),
        });
    }
    if periods == 0 {
        return Err(ModelError::InvalidInput {
            field: "periods".into(),
            reason: "At least one forecast period is required".into(),
        });
    }
    if discount_rate <= dec!(-100) {
        return Err(ModelError::InvalidDiscountRate(format!(
            "discount rate must exceed -100%, got {discount_rate}%"
        )));
    }

    let growth_factor = Decimal::ONE + effective.growth / dec!(100);
    let discount_base = Decimal::ONE + discount_rate / dec!(100);

    let mut projection = Vec::with_capacity(periods as usize);
    let mut revenue = revenue_base;

    for year in 1..=periods {
        revenue *= growth_factor;
        let ebitda = revenue * (effective.margin / dec!(100));
        let tax = ebitda * (tax_rate / dec!(100));
        let fcf = ebitda - tax;
        let discount_factor = discount_base.powd(Decimal::from(year));
        let present_value = fcf / discount_factor;

        projection.push(ProjectionPeriod {
            period: year,
            revenue,
            ebitda,
            tax,
            fcf,
            discount_factor,
            present_value,
        });
    }

    Ok(projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_effective() -> EffectiveAssumptions {
        EffectiveAssumptions {
            growth: dec!(15),
            margin: dec!(20),
        }
    }

    #[test]
    fn test_five_period_projection() {
        let periods = project(
            dec!(5000000),
            &sample_effective(),
            dec!(21),
            dec!(10),
            DEFAULT_FORECAST_YEARS,
        )
        .unwrap();

        assert_eq!(periods.len(), 5);
        assert_eq!(periods[0].period, 1);
        assert_eq!(periods[4].period, 5);
    }

    #[test]
    fn test_year_one_formula_chain() {
        // Checked against the formulas, not hard-coded output constants:
        // revenue = 5,000,000 * 1.15, ebitda = revenue * 0.20,
        // tax = ebitda * 0.21, fcf = ebitda - tax, pv = fcf / 1.10
        let periods = project(dec!(5000000), &sample_effective(), dec!(21), dec!(10), 5).unwrap();
        let y1 = &periods[0];

        assert_eq!(y1.revenue, dec!(5750000));
        assert_eq!(y1.ebitda, dec!(1150000));
        assert_eq!(y1.tax, dec!(241500));
        assert_eq!(y1.fcf, dec!(908500));

        let expected_pv = dec!(908500) / dec!(1.10);
        assert!(
            (y1.present_value - expected_pv).abs() < dec!(0.01),
            "PV: expected ~{expected_pv}, got {}",
            y1.present_value
        );
        // ~826k once rounded for display
        assert_eq!(y1.rounded().present_value, dec!(825909));
    }

    #[test]
    fn test_sequential_revenue_dependency() {
        let periods = project(dec!(5000000), &sample_effective(), dec!(21), dec!(10), 5).unwrap();
        let growth_factor = dec!(1.15);

        assert_eq!(periods[0].revenue, dec!(5000000) * growth_factor);
        for i in 1..periods.len() {
            assert_eq!(
                periods[i].revenue,
                periods[i - 1].revenue * growth_factor,
                "period {} revenue must compound off period {}",
                i + 1,
                i
            );
        }
    }

    #[test]
    fn test_fcf_is_ebitda_less_tax() {
        let periods = project(dec!(2000000), &sample_effective(), dec!(25), dec!(9), 5).unwrap();
        for p in &periods {
            assert_eq!(p.fcf, p.ebitda - p.tax);
        }
    }

    #[test]
    fn test_negative_margin_flows_through() {
        // Downside scenarios can push the margin below zero; the projection
        // carries the negative cash flows rather than clamping.
        let effective = EffectiveAssumptions {
            growth: dec!(5),
            margin: dec!(-5),
        };
        let periods = project(dec!(1000000), &effective, dec!(21), dec!(10), 5).unwrap();
        assert!(periods.iter().all(|p| p.ebitda < Decimal::ZERO));
        assert!(periods.iter().all(|p| p.fcf < Decimal::ZERO));
    }

    #[test]
    fn test_zero_revenue_rejected() {
        let result = project(Decimal::ZERO, &sample_effective(), dec!(21), dec!(10), 5);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_periods_rejected() {
        let result = project(dec!(1000000), &sample_effective(), dec!(21), dec!(10), 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_discount_rate_at_minus_100_rejected() {
        let result = project(dec!(1000000), &sample_effective(), dec!(21), dec!(-100), 5);
        match result {
            Err(ModelError::InvalidDiscountRate(_)) => {}
            other => panic!("Expected InvalidDiscountRate, got {other:?}"),
        }
    }

    #[test]
    fn test_deep_negative_discount_rate_accepted() {
        // -50% is odd but mathematically defined; only <= -100 is rejected
        let periods = project(dec!(1000000), &sample_effective(), dec!(21), dec!(-50), 5).unwrap();
        assert_eq!(periods.len(), 5);
        assert!(periods[0].discount_factor > Decimal::ZERO);
    }
}
