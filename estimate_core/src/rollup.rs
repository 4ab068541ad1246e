//! # Cost Rollup
//!
//! Drives the pipeline in its fixed order:
//!
//! 1. aggregate each direct-cost category
//! 2. add included allowances / alternates
//! 3. assemble direct cost
//! 4. run the soft-cost chain
//! 5. round every reported figure to cents and package the output document
//!
//! [`compute`] stops after step 4 and keeps full precision; [`run`] does all
//! five. Exporters work from the unrounded [`Rollup`] so they never round a
//! rounded number.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::estimate::Estimate;
//! use estimate_core::rollup;
//!
//! let estimate = Estimate::from_value(serde_json::json!({
//!     "costs": {
//!         "labor": { "baseLaborHours": 100, "productivityFactor": 1, "laborRate": 50 },
//!         "materials": { "items": [ { "quantity": 10, "wasteFactor": 0.1, "unitCost": 20 } ],
//!                        "freightCost": 100, "dutiesTaxesPct": 0.05 },
//!         "equipment": { "items": [] },
//!         "risk": {}, "escalation": {}, "overheadAndProfit": {}, "taxes": { "salesTaxPct": 0.1 }
//!     }
//! })).unwrap();
//!
//! let output = rollup::run(&estimate).unwrap();
//! assert_eq!(output.breakdown.waterfall.direct_cost, 5336.0);
//! assert_eq!(output.breakdown.waterfall.total_with_tax, 5869.6);
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::calculations::soft_costs::{self, SoftCostInputs, SoftCostWaterfall};
use crate::calculations::{
    allowances, direct_cost, equipment, labor, materials, permits, subcontractors, CostBreakdown,
    CostCategory,
};
use crate::errors::EstimateResult;
use crate::estimate::{Estimate, ScopeTerms};

/// Full-precision result of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollup {
    /// Category subtotals in report order
    pub breakdown: CostBreakdown,

    /// Direct cost through total with tax
    pub waterfall: SoftCostWaterfall,

    /// Rates the chain was run with
    pub inputs: SoftCostInputs,

    /// Typed scope the rollup read
    pub scope_terms: ScopeTerms,
}

impl Rollup {
    /// Round and package for output, echoing `meta` and `scope` from the
    /// source estimate.
    pub fn to_output(&self, estimate: &Estimate) -> EstimateOutput {
        EstimateOutput {
            meta: estimate.meta.clone(),
            scope: estimate.scope.clone(),
            breakdown: ReportedBreakdown {
                categories: self.breakdown.rounded(),
                waterfall: self.waterfall.rounded(),
            },
        }
    }
}

/// Output document: `{ meta, scope, breakdown }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateOutput {
    pub meta: Map<String, Value>,
    pub scope: Value,
    pub breakdown: ReportedBreakdown,
}

/// Rounded figures, serialized as one flat object: category subtotals first,
/// then `directCost` through `totalWithTax`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedBreakdown {
    #[serde(flatten)]
    pub categories: CostBreakdown,

    #[serde(flatten)]
    pub waterfall: SoftCostWaterfall,
}

/// Aggregate every category into a breakdown.
///
/// Allowances and alternates only appear when the scope declares the list.
pub fn aggregate(estimate: &Estimate, terms: &ScopeTerms) -> CostBreakdown {
    let costs = &estimate.costs;
    let mut breakdown = CostBreakdown::new();

    if costs.labor.productivity_floored() {
        warn!(
            productivity_factor = costs.labor.productivity_factor,
            "productivity factor below floor, clamping to {}",
            labor::MIN_PRODUCTIVITY
        );
    }
    breakdown.insert(CostCategory::Labor, labor::subtotal(&costs.labor));
    breakdown.insert(CostCategory::Materials, materials::subtotal(&costs.materials));
    breakdown.insert(CostCategory::Equipment, equipment::subtotal(&costs.equipment));
    breakdown.insert(
        CostCategory::Subcontractors,
        subcontractors::subtotal(&costs.subcontractors),
    );
    breakdown.insert(CostCategory::Permits, permits::subtotal(&costs.permits_and_fees));

    for (category, items) in [
        (CostCategory::Allowances, &terms.allowances),
        (CostCategory::Alternates, &terms.alternates),
    ] {
        if let Some(items) = items {
            breakdown.insert(category, allowances::included_total(items));
            debug!(%category, excluded = allowances::excluded_total(items), "carried for information");
        }
    }

    for (category, subtotal) in breakdown.iter() {
        debug!(%category, subtotal, "category aggregated");
    }

    breakdown
}

/// Run steps 1-4 at full precision.
pub fn compute(estimate: &Estimate) -> EstimateResult<Rollup> {
    let scope_terms = estimate.scope_terms()?;
    let breakdown = aggregate(estimate, &scope_terms);

    let direct = direct_cost(&breakdown);
    debug!(direct_cost = direct, "direct cost assembled");

    let inputs = estimate.soft_cost_inputs(&scope_terms);
    let waterfall = soft_costs::apply(direct, &inputs);
    debug!(
        total_with_tax = waterfall.total_with_tax,
        duration_months = inputs.duration_months,
        "soft-cost chain applied"
    );

    Ok(Rollup {
        breakdown,
        waterfall,
        inputs,
        scope_terms,
    })
}

/// Run the whole pipeline and produce the rounded output document.
pub fn run(estimate: &Estimate) -> EstimateResult<EstimateOutput> {
    Ok(compute(estimate)?.to_output(estimate))
}
