use serde::{Deserialize, Serialize};

use rust_decimal_macros::dec;

use crate::types::{BaseAssumptions, Money, Percent};

/// Industry preset selector. Template selection is an explicit parameter
/// into the model, never ambient state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Saas,
    Manufacturing,
    Retail,
    #[default]
    Custom,
}

impl Industry {
    pub const ALL: [Industry; 4] = [
        Industry::Saas,
        Industry::Manufacturing,
        Industry::Retail,
        Industry::Custom,
    ];

    /// Preset growth, margin, WACC, and terminal growth for this industry.
    pub fn template(&self) -> IndustryTemplate {
        match self {
            Industry::Saas => IndustryTemplate {
                name: "SaaS / High Growth",
                growth: dec!(45),
                margin: dec!(22),
                wacc: dec!(11),
                terminal: dec!(3.5),
            },
            Industry::Manufacturing => IndustryTemplate {
                name: "Industrial / Mature",
                growth: dec!(6),
                margin: dec!(12),
                wacc: dec!(8),
                terminal: dec!(2.0),
            },
            Industry::Retail => IndustryTemplate {
                name: "Consumer / Retail",
                growth: dec!(12),
                margin: dec!(8),
                wacc: dec!(9),
                terminal: dec!(2.2),
            },
            Industry::Custom => IndustryTemplate {
                name: "Custom Model",
                growth: dec!(15),
                margin: dec!(20),
                wacc: dec!(10),
                terminal: dec!(2.5),
            },
        }
    }

    /// Build ready-to-run assumptions from this preset. Revenue base and
    /// tax rate are not part of any template and stay caller-supplied.
    pub fn assumptions(&self, revenue_base: Money, tax_rate: Percent) -> BaseAssumptions {
        let t = self.template();
        BaseAssumptions {
            revenue_base,
            growth_rate: t.growth,
            ebitda_margin: t.margin,
            tax_rate,
            discount_rate: t.wacc,
            terminal_growth_rate: t.terminal,
        }
    }
}

/// Parameter preset for one industry profile, in percent terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndustryTemplate {
    pub name: &'static str,
    pub growth: Percent,
    pub margin: Percent,
    pub wacc: Percent,
    pub terminal: Percent,
}
