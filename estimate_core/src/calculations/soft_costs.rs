//! # Soft-Cost Chain
//!
//! Percentage adjustments layered on top of direct cost. Each step multiplies
//! the running total left by the previous step, in a fixed order:
//!
//! ```text
//! direct cost
//!   × (1 + insurance + bond)                       -> with insurance & bond
//!   × (1 + escalation/yr × max(months, 0) / 12)    -> with escalation
//!   × (1 + contingency)                            -> with contingency
//!   × (1 + overhead)                               -> with overhead
//!   × (1 + profit)                                 -> with profit
//!   × (1 + sales tax)                              -> total with tax
//! ```
//!
//! The final product does not depend on step order, but every intermediate
//! total in the waterfall does, so the order above is part of the contract.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::calculations::soft_costs::{apply, SoftCostInputs};
//!
//! let inputs = SoftCostInputs { insurance_pct: 0.02, bond_pct: 0.01, ..SoftCostInputs::default() };
//! let waterfall = apply(10_000.0, &inputs);
//! assert!((waterfall.with_insurance_bond - 10_300.0).abs() < 1e-9);
//! assert_eq!(waterfall.total_with_tax, waterfall.with_insurance_bond);
//! ```

use serde::{Deserialize, Serialize};

use crate::money::round_currency;

/// `costs.risk`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInput {
    #[serde(default)]
    pub insurance_pct: f64,
    #[serde(default)]
    pub bond_pct: f64,
    #[serde(default)]
    pub contingency_pct: f64,
}

/// `costs.escalation`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationInput {
    /// Annual cost escalation, applied linearly over the schedule
    #[serde(default)]
    pub escalation_pct_per_year: f64,
}

/// `costs.overheadAndProfit`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverheadAndProfitInput {
    #[serde(default)]
    pub overhead_pct: f64,
    #[serde(default)]
    pub profit_pct: f64,
}

/// `costs.taxes`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxesInput {
    #[serde(default)]
    pub sales_tax_pct: f64,
}

/// Every rate the chain reads, gathered from the four input blocks and the
/// schedule. All default to zero, which makes each step an identity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SoftCostInputs {
    pub insurance_pct: f64,
    pub bond_pct: f64,
    pub escalation_pct_per_year: f64,
    pub duration_months: f64,
    pub contingency_pct: f64,
    pub overhead_pct: f64,
    pub profit_pct: f64,
    pub sales_tax_pct: f64,
}

impl SoftCostInputs {
    pub fn from_parts(
        risk: &RiskInput,
        escalation: &EscalationInput,
        overhead_and_profit: &OverheadAndProfitInput,
        taxes: &TaxesInput,
        duration_months: f64,
    ) -> Self {
        SoftCostInputs {
            insurance_pct: risk.insurance_pct,
            bond_pct: risk.bond_pct,
            escalation_pct_per_year: escalation.escalation_pct_per_year,
            duration_months,
            contingency_pct: risk.contingency_pct,
            overhead_pct: overhead_and_profit.overhead_pct,
            profit_pct: overhead_and_profit.profit_pct,
            sales_tax_pct: taxes.sales_tax_pct,
        }
    }

    /// Linear escalation over the schedule; negative durations count as zero.
    pub fn escalation_factor(&self) -> f64 {
        1.0 + self.escalation_pct_per_year * (self.duration_months.max(0.0) / 12.0)
    }
}

/// One multiplicative step of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoftCostStep {
    InsuranceBond,
    Escalation,
    Contingency,
    Overhead,
    Profit,
    SalesTax,
}

impl SoftCostStep {
    /// The only order in which the chain is ever evaluated.
    pub const ORDER: [SoftCostStep; 6] = [
        SoftCostStep::InsuranceBond,
        SoftCostStep::Escalation,
        SoftCostStep::Contingency,
        SoftCostStep::Overhead,
        SoftCostStep::Profit,
        SoftCostStep::SalesTax,
    ];

    /// Multiplier this step applies to the running total.
    pub fn factor(&self, inputs: &SoftCostInputs) -> f64 {
        match self {
            SoftCostStep::InsuranceBond => 1.0 + inputs.insurance_pct + inputs.bond_pct,
            SoftCostStep::Escalation => inputs.escalation_factor(),
            SoftCostStep::Contingency => 1.0 + inputs.contingency_pct,
            SoftCostStep::Overhead => 1.0 + inputs.overhead_pct,
            SoftCostStep::Profit => 1.0 + inputs.profit_pct,
            SoftCostStep::SalesTax => 1.0 + inputs.sales_tax_pct,
        }
    }
}

/// Running totals from direct cost to the taxed total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftCostWaterfall {
    pub direct_cost: f64,
    pub with_insurance_bond: f64,
    pub with_escalation: f64,
    pub with_contingency: f64,
    pub with_overhead: f64,
    pub with_profit: f64,
    pub total_with_tax: f64,
}

impl SoftCostWaterfall {
    /// Report labels and totals, in waterfall order.
    pub fn lines(&self) -> [(&'static str, f64); 7] {
        [
            ("Direct Cost", self.direct_cost),
            ("With Insurance & Bond", self.with_insurance_bond),
            ("With Escalation", self.with_escalation),
            ("With Contingency", self.with_contingency),
            ("With Overhead", self.with_overhead),
            ("With Profit", self.with_profit),
            ("Total With Tax", self.total_with_tax),
        ]
    }

    /// Copy with every total rounded to cents.
    pub fn rounded(&self) -> SoftCostWaterfall {
        SoftCostWaterfall {
            direct_cost: round_currency(self.direct_cost),
            with_insurance_bond: round_currency(self.with_insurance_bond),
            with_escalation: round_currency(self.with_escalation),
            with_contingency: round_currency(self.with_contingency),
            with_overhead: round_currency(self.with_overhead),
            with_profit: round_currency(self.with_profit),
            total_with_tax: round_currency(self.total_with_tax),
        }
    }
}

/// Run the chain over a direct cost.
pub fn apply(direct_cost: f64, inputs: &SoftCostInputs) -> SoftCostWaterfall {
    let [with_insurance_bond, with_escalation, with_contingency, with_overhead, with_profit, total_with_tax] =
        fold_steps(direct_cost, inputs, SoftCostStep::ORDER);

    SoftCostWaterfall {
        direct_cost,
        with_insurance_bond,
        with_escalation,
        with_contingency,
        with_overhead,
        with_profit,
        total_with_tax,
    }
}

fn fold_steps(direct_cost: f64, inputs: &SoftCostInputs, steps: [SoftCostStep; 6]) -> [f64; 6] {
    let mut running = direct_cost;
    steps.map(|step| {
        running *= step.factor(inputs);
        running
    })
}
