//! # Estimate Document
//!
//! The `Estimate` struct is the root of an input document. It is read once,
//! never mutated, and discarded after the rollup is emitted.
//!
//! ## Structure
//!
//! ```text
//! Estimate
//! ├── meta: free-form object, passed through to the output untouched
//! ├── scope: free-form object, passed through untouched; read for
//! │   ├── schedule.durationMonths
//! │   ├── allowances[]
//! │   └── alternates[]
//! └── costs: Costs (labor, materials, equipment, subcontractors,
//!     permitsAndFees, risk, escalation, overheadAndProfit, taxes)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::estimate::Estimate;
//!
//! let estimate = Estimate::from_value(serde_json::json!({
//!     "meta": { "project": "Warehouse Slab" },
//!     "costs": {
//!         "labor": { "baseLaborHours": 100, "productivityFactor": 1, "laborRate": 50 },
//!         "materials": { "items": [] },
//!         "equipment": { "items": [] },
//!         "risk": {}, "escalation": {}, "overheadAndProfit": {}, "taxes": {}
//!     }
//! })).unwrap();
//!
//! assert_eq!(estimate.scope_terms().unwrap().schedule.duration_months, 0.0);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::calculations::allowances::AllowanceItem;
use crate::calculations::soft_costs::{
    EscalationInput, OverheadAndProfitInput, RiskInput, SoftCostInputs, TaxesInput,
};
use crate::calculations::{EquipmentInput, LaborInput, MaterialsInput, PermitsAndFees, Subcontractor};
use crate::errors::{EstimateError, EstimateResult};

/// Root input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Identification fields (project name, client, estimator...), opaque
    #[serde(default)]
    pub meta: Map<String, Value>,

    /// Scope block, kept as raw JSON so it can be echoed verbatim.
    /// Use [`Estimate::scope_terms`] for the typed view.
    #[serde(default = "empty_object")]
    pub scope: Value,

    pub costs: Costs,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Estimate {
    /// Deserialize an estimate without structural validation.
    ///
    /// Missing required fields surface as [`EstimateError::MissingField`].
    /// Loaders that want every problem reported at once should run
    /// [`crate::validation::validate_estimate`] first.
    pub fn from_value(document: Value) -> EstimateResult<Self> {
        serde_json::from_value(document).map_err(|e| EstimateError::from_serde(&e))
    }

    /// Typed view of the fields the rollup reads from `scope`.
    pub fn scope_terms(&self) -> EstimateResult<ScopeTerms> {
        if self.scope.is_null() {
            return Ok(ScopeTerms::default());
        }
        serde_json::from_value(self.scope.clone()).map_err(|e| {
            EstimateError::invalid_input("scope", self.scope.to_string(), e.to_string())
        })
    }

    /// Rates for the soft-cost chain, with the schedule duration from scope.
    pub fn soft_cost_inputs(&self, terms: &ScopeTerms) -> SoftCostInputs {
        SoftCostInputs::from_parts(
            &self.costs.risk,
            &self.costs.escalation,
            &self.costs.overhead_and_profit,
            &self.costs.taxes,
            terms.schedule.duration_months,
        )
    }

    /// Number of priced line items across all categories.
    pub fn line_item_count(&self) -> usize {
        self.costs.materials.items.len()
            + self.costs.equipment.items.len()
            + self.costs.subcontractors.len()
    }
}

/// Cost inputs (`costs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Costs {
    pub labor: LaborInput,

    pub materials: MaterialsInput,

    pub equipment: EquipmentInput,

    #[serde(default)]
    pub subcontractors: Vec<Subcontractor>,

    #[serde(default)]
    pub permits_and_fees: PermitsAndFees,

    pub risk: RiskInput,

    pub escalation: EscalationInput,

    pub overhead_and_profit: OverheadAndProfitInput,

    pub taxes: TaxesInput,
}

/// Typed view of `scope`. Unknown keys are ignored here and still echoed
/// through the raw value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeTerms {
    #[serde(default)]
    pub schedule: Schedule,

    /// `None` when the document has no allowances list at all
    #[serde(default)]
    pub allowances: Option<Vec<AllowanceItem>>,

    #[serde(default)]
    pub alternates: Option<Vec<AllowanceItem>>,
}

/// `scope.schedule`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default)]
    pub duration_months: f64,
}
