use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::projection::DEFAULT_FORECAST_YEARS;
use crate::types::{round_currency, with_metadata, ComputationOutput, EffectiveAssumptions, Money, Percent};
use crate::ModelResult;

/// Growth perturbations applied per row, in percentage points, ascending.
pub const GROWTH_OFFSETS: [Decimal; 5] =
    [dec!(-4), dec!(-2), dec!(0), dec!(2), dec!(4)];

/// Discount-rate perturbations applied per column, in percentage points,
/// ascending.
pub const WACC_OFFSETS: [Decimal; 5] = [dec!(-2), dec!(-1), dec!(0), dec!(1), dec!(2)];

/// One cell of the sensitivity grid.
///
/// A perturbed WACC at or below the terminal growth rate makes that cell's
/// perpetuity non-convergent; the cell is flagged rather than carrying a
/// wrong number into a formatted table, and the rest of the grid still
/// computes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GridCell {
    /// Enterprise value scaled to millions and rounded to the nearest
    /// whole million
    Value { ev_millions: Money },
    NonConvergent,
}

/// 5x5 matrix of enterprise values across growth and discount-rate
/// perturbations. Rows follow [`GROWTH_OFFSETS`], columns follow
/// [`WACC_OFFSETS`]; the center cell [2][2] is the unperturbed base case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityGrid {
    /// Absolute growth rate per row (center growth plus offset)
    pub growth_rates: Vec<Percent>,
    /// Absolute discount rate per column (center WACC plus offset)
    pub discount_rates: Vec<Percent>,
    /// cells[row][col] indexed by growth row, then WACC column
    pub cells: Vec<Vec<GridCell>>,
    /// Always (2, 2): the zero-offset cell
    pub base_case_position: (usize, usize),
}

/// Generate the WACC x growth sensitivity grid.
///
/// Each cell is a fully independent five-period simulation sharing no
/// intermediate state with its neighbours; margin, tax rate, and terminal
/// growth stay fixed at the base case while growth and WACC are perturbed.
pub fn generate_grid(
    revenue_base: Money,
    effective: &EffectiveAssumptions,
    tax_rate: Percent,
    terminal_growth_rate: Percent,
    center_discount_rate: Percent,
) -> ModelResult<ComputationOutput<SensitivityGrid>> {
    let mut warnings: Vec<String> = Vec::new();

    if revenue_base <= Decimal::ZERO {
        return Err(ModelError::InvalidInput {
            field: "revenue_base".into(),
            reason: "Base revenue must be positive".into(),
        });
    }

    let growth_rates: Vec<Percent> =
        GROWTH_OFFSETS.iter().map(|o| effective.growth + o).collect();
    let discount_rates: Vec<Percent> =
        WACC_OFFSETS.iter().map(|o| center_discount_rate + o).collect();

    let mut cells = Vec::with_capacity(growth_rates.len());
    for growth in &growth_rates {
        let mut row = Vec::with_capacity(discount_rates.len());
        for wacc in &discount_rates {
            let cell = evaluate_cell(
                revenue_base,
                *growth,
                effective.margin,
                tax_rate,
                terminal_growth_rate,
                *wacc,
            );
            if cell == GridCell::NonConvergent {
                warnings.push(format!(
                    "Cell (growth {growth}%, WACC {wacc}%) is non-convergent: WACC does not exceed terminal growth of {terminal_growth_rate}%"
                ));
            }
            row.push(cell);
        }
        cells.push(row);
    }

    let output = SensitivityGrid {
        growth_rates,
        discount_rates,
        cells,
        base_case_position: (2, 2),
    };

    Ok(with_metadata(
        "WACC x growth sensitivity grid (EV in millions)",
        &serde_json::json!({
            "revenue_base": revenue_base.to_string(),
            "margin": effective.margin.to_string(),
            "tax_rate": tax_rate.to_string(),
            "terminal_growth_rate": terminal_growth_rate.to_string(),
            "center_discount_rate": center_discount_rate.to_string(),
        }),
        warnings,
        output,
    ))
}

/// Compressed five-period simulation for a single cell: FCF collapses to
/// revenue x margin x (1 - tax) per year, discounted at the perturbed WACC.
fn evaluate_cell(
    revenue_base: Money,
    growth: Percent,
    margin: Percent,
    tax_rate: Percent,
    terminal_growth_rate: Percent,
    wacc: Percent,
) -> GridCell {
    // Both the perpetuity constraint and the compounding domain are
    // per-cell conditions under perturbation
    if wacc <= terminal_growth_rate || wacc <= dec!(-100) {
        return GridCell::NonConvergent;
    }

    let growth_factor = Decimal::ONE + growth / dec!(100);
    let discount_base = Decimal::ONE + wacc / dec!(100);
    let fcf_rate = (margin / dec!(100)) * (Decimal::ONE - tax_rate / dec!(100));

    let mut revenue = revenue_base;
    let mut pv_sum = Decimal::ZERO;
    let mut last_fcf = Decimal::ZERO;
    for year in 1..=DEFAULT_FORECAST_YEARS {
        revenue *= growth_factor;
        last_fcf = revenue * fcf_rate;
        pv_sum += last_fcf / discount_base.powd(Decimal::from(year));
    }

    let terminal_value = last_fcf * (Decimal::ONE + terminal_growth_rate / dec!(100))
        / ((wacc - terminal_growth_rate) / dec!(100));
    let enterprise_value =
        pv_sum + terminal_value / discount_base.powd(Decimal::from(DEFAULT_FORECAST_YEARS));

    GridCell::Value {
        ev_millions: round_currency(enterprise_value / dec!(1000000)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario;
    use crate::types::{BaseAssumptions, Scenario};
    use crate::valuation::run_valuation;
    use crate::valuation::ValuationInput;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample_assumptions() -> BaseAssumptions {
        BaseAssumptions {
            revenue_base: dec!(5000000),
            growth_rate: dec!(15),
            ebitda_margin: dec!(20),
            tax_rate: dec!(21),
            discount_rate: dec!(10),
            terminal_growth_rate: dec!(2.5),
        }
    }

    fn sample_grid() -> ComputationOutput<SensitivityGrid> {
        let base = sample_assumptions();
        let effective = scenario::resolve(&base, Scenario::Base);
        generate_grid(
            base.revenue_base,
            &effective,
            base.tax_rate,
            base.terminal_growth_rate,
            base.discount_rate,
        )
        .unwrap()
    }

    #[test]
    fn test_grid_dimensions_and_ordering() {
        let grid = sample_grid().result;

        assert_eq!(grid.cells.len(), 5);
        assert!(grid.cells.iter().all(|row| row.len() == 5));
        // Rows: growth 11..19 ascending; columns: WACC 8..12 ascending
        assert_eq!(
            grid.growth_rates,
            vec![dec!(11), dec!(13), dec!(15), dec!(17), dec!(19)]
        );
        assert_eq!(
            grid.discount_rates,
            vec![dec!(8), dec!(9), dec!(10), dec!(11), dec!(12)]
        );
        assert_eq!(grid.base_case_position, (2, 2));
    }

    #[test]
    fn test_center_cell_matches_pipeline() {
        let grid = sample_grid().result;
        let center = &grid.cells[2][2];

        let input = ValuationInput {
            assumptions: sample_assumptions(),
            scenario: Scenario::Base,
            capital_structure: None,
            forecast_years: None,
        };
        let ev = run_valuation(&input).unwrap().result.valuation.enterprise_value;
        let expected = round_currency(ev / dec!(1000000));

        match center {
            GridCell::Value { ev_millions } => assert_eq!(*ev_millions, expected),
            GridCell::NonConvergent => panic!("center cell must converge"),
        }
    }

    #[test]
    fn test_rows_increase_with_growth() {
        let grid = sample_grid().result;
        for col in 0..5 {
            for row in 1..5 {
                let (prev, cur) = (&grid.cells[row - 1][col], &grid.cells[row][col]);
                if let (GridCell::Value { ev_millions: a }, GridCell::Value { ev_millions: b }) =
                    (prev, cur)
                {
                    assert!(b > a, "EV must rise with growth (col {col}, row {row})");
                }
            }
        }
    }

    #[test]
    fn test_columns_decrease_with_wacc() {
        let grid = sample_grid().result;
        for row in 0..5 {
            for col in 1..5 {
                let (prev, cur) = (&grid.cells[row][col - 1], &grid.cells[row][col]);
                if let (GridCell::Value { ev_millions: a }, GridCell::Value { ev_millions: b }) =
                    (prev, cur)
                {
                    assert!(b < a, "EV must fall as WACC rises (row {row}, col {col})");
                }
            }
        }
    }

    #[test]
    fn test_low_wacc_cells_flagged_not_fatal() {
        // Center WACC of 4% puts the -2 and -1 columns at or below the 3%
        // terminal growth rate; those cells flag, the rest still compute
        let base = sample_assumptions();
        let effective = scenario::resolve(&base, Scenario::Base);
        let output = generate_grid(
            base.revenue_base,
            &effective,
            base.tax_rate,
            dec!(3),
            dec!(4),
        )
        .unwrap();
        let grid = &output.result;

        for row in &grid.cells {
            assert_eq!(row[0], GridCell::NonConvergent); // WACC 2%
            assert_eq!(row[1], GridCell::NonConvergent); // WACC 3% == terminal
            assert!(matches!(row[2], GridCell::Value { .. })); // WACC 4%
            assert!(matches!(row[4], GridCell::Value { .. })); // WACC 6%
        }
        assert!(!output.warnings.is_empty());
    }

    #[test]
    fn test_cells_are_in_whole_millions() {
        let grid = sample_grid().result;
        for row in &grid.cells {
            for cell in row {
                if let GridCell::Value { ev_millions } = cell {
                    assert_eq!(*ev_millions, round_currency(*ev_millions));
                }
            }
        }
    }

    #[test]
    fn test_zero_revenue_rejected() {
        let effective = EffectiveAssumptions {
            growth: dec!(10),
            margin: dec!(20),
        };
        let result = generate_grid(Decimal::ZERO, &effective, dec!(21), dec!(2.5), dec!(10));
        assert!(result.is_err());
    }
}
