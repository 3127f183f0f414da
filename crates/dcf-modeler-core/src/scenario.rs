use rust_decimal_macros::dec;

use crate::types::{BaseAssumptions, EffectiveAssumptions, Scenario};

/// Apply a named scenario to the base growth/margin pair.
///
/// - `base`: inputs pass through unchanged.
/// - `upside`: growth scaled by 1.25x, margin +5 percentage points.
/// - `downside`: growth scaled by 0.75x, margin -8 percentage points.
///
/// No clamping is applied: a downside margin driven below 0% (or an upside
/// margin above 100%) passes through unchanged, so the resulting numbers
/// show the scenario is unrealistic rather than being silently corrected.
/// The valuation pipeline surfaces an out-of-range margin as a warning.
pub fn resolve(base: &BaseAssumptions, scenario: Scenario) -> EffectiveAssumptions {
    match scenario {
        Scenario::Base => EffectiveAssumptions {
            growth: base.growth_rate,
            margin: base.ebitda_margin,
        },
        Scenario::Upside => EffectiveAssumptions {
            growth: base.growth_rate * dec!(1.25),
            margin: base.ebitda_margin + dec!(5),
        },
        Scenario::Downside => EffectiveAssumptions {
            growth: base.growth_rate * dec!(0.75),
            margin: base.ebitda_margin - dec!(8),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn test_base_passes_through() {
        let e = resolve(&sample_assumptions(), Scenario::Base);
        assert_eq!(e.growth, dec!(15));
        assert_eq!(e.margin, dec!(20));
    }

    #[test]
    fn test_upside_adjustment() {
        let e = resolve(&sample_assumptions(), Scenario::Upside);
        // growth * 1.25, margin + 5pp (absolute, not relative)
        assert_eq!(e.growth, dec!(18.75));
        assert_eq!(e.margin, dec!(25));
    }

    #[test]
    fn test_downside_adjustment() {
        let e = resolve(&sample_assumptions(), Scenario::Downside);
        assert_eq!(e.growth, dec!(11.25));
        assert_eq!(e.margin, dec!(12));
    }

    #[test]
    fn test_downside_margin_is_not_clamped() {
        let mut base = sample_assumptions();
        base.ebitda_margin = dec!(3);
        let e = resolve(&base, Scenario::Downside);
        // 3 - 8 = -5: deliberately passed through below zero
        assert_eq!(e.margin, dec!(-5));
    }

    #[test]
    fn test_upside_margin_can_exceed_100() {
        let mut base = sample_assumptions();
        base.ebitda_margin = dec!(98);
        let e = resolve(&base, Scenario::Upside);
        assert_eq!(e.margin, dec!(103));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let base = sample_assumptions();
        assert_eq!(
            resolve(&base, Scenario::Upside),
            resolve(&base, Scenario::Upside)
        );
    }
}
