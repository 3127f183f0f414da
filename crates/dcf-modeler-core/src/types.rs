use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed in percent terms (15 = 15%), never as fractions.
/// This matches the spreadsheet convention the model inputs come from;
/// formulas divide by 100 at the point of use.
pub type Percent = Decimal;

/// Named scenario applied on top of the base assumptions. A pure tag with
/// no owned state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    #[default]
    Base,
    Upside,
    Downside,
}

/// Caller-supplied model assumptions, before any scenario adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseAssumptions {
    /// Year 0 revenue
    pub revenue_base: Money,
    /// Annual revenue growth rate
    pub growth_rate: Percent,
    /// EBITDA as a percentage of revenue
    pub ebitda_margin: Percent,
    /// Tax rate applied to EBITDA
    pub tax_rate: Percent,
    /// Annual discount rate (WACC)
    pub discount_rate: Percent,
    /// Perpetuity growth rate for the terminal value
    pub terminal_growth_rate: Percent,
}

/// Growth and margin after the scenario adjustment. Derived and immutable;
/// recomputed on every call, never cached across assumption changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveAssumptions {
    pub growth: Percent,
    pub margin: Percent,
}

/// A single forecast year of the projection.
///
/// All monetary fields carry full decimal precision; aggregation always
/// runs on these unrounded figures. Use [`ProjectionPeriod::rounded`] for
/// a whole-currency display view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPeriod {
    /// 1-based forecast year
    pub period: u32,
    pub revenue: Money,
    pub ebitda: Money,
    pub tax: Money,
    pub fcf: Money,
    pub discount_factor: Decimal,
    pub present_value: Money,
}

impl ProjectionPeriod {
    /// Copy of this period with monetary fields rounded to the nearest
    /// whole currency unit. Display-only; never feed rounded periods back
    /// into aggregation.
    pub fn rounded(&self) -> ProjectionPeriod {
        ProjectionPeriod {
            period: self.period,
            revenue: round_currency(self.revenue),
            ebitda: round_currency(self.ebitda),
            tax: round_currency(self.tax),
            fcf: round_currency(self.fcf),
            discount_factor: self.discount_factor,
            present_value: round_currency(self.present_value),
        }
    }
}

/// Round to the nearest whole currency unit, halves away from zero.
pub fn round_currency(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
