//! # Cost Calculations
//!
//! Each direct-cost category lives in its own module and follows the same
//! pattern:
//!
//! - `*Input` / `*Item` - input parameters (JSON-serializable, camelCase)
//! - `subtotal(input) -> f64` - pure aggregation, full precision
//!
//! The category subtotals are collected into a [`CostBreakdown`], summed by
//! [`direct_cost`], and run through the [`soft_costs`] chain.
//!
//! ## Available Calculations
//!
//! - [`labor`] - productivity-adjusted crew hours
//! - [`materials`] - waste, freight and duties
//! - [`equipment`] - hourly rates, fuel surcharge, mobilization
//! - [`subcontractors`] - flat quotes
//! - [`permits`] - permit, inspection and disposal fees
//! - [`allowances`] - scope allowances and alternates
//! - [`direct_cost`] - category assembly
//! - [`soft_costs`] - insurance through sales tax

pub mod allowances;
pub mod direct_cost;
pub mod equipment;
pub mod labor;
pub mod materials;
pub mod permits;
pub mod soft_costs;
pub mod subcontractors;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::money::round_currency;

// Re-export commonly used types
pub use allowances::AllowanceItem;
pub use direct_cost::direct_cost;
pub use equipment::{EquipmentInput, EquipmentItem};
pub use labor::LaborInput;
pub use materials::{MaterialItem, MaterialsInput};
pub use permits::PermitsAndFees;
pub use soft_costs::{SoftCostInputs, SoftCostStep, SoftCostWaterfall};
pub use subcontractors::Subcontractor;

/// Direct-cost categories, in report order.
///
/// Declaration order drives `Ord`, which drives the row order of every
/// report. New categories go at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CostCategory {
    Labor,
    Materials,
    Equipment,
    Subcontractors,
    Permits,
    Allowances,
    Alternates,
}

impl CostCategory {
    pub const ALL: [CostCategory; 7] = [
        CostCategory::Labor,
        CostCategory::Materials,
        CostCategory::Equipment,
        CostCategory::Subcontractors,
        CostCategory::Permits,
        CostCategory::Allowances,
        CostCategory::Alternates,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CostCategory::Labor => "Labor",
            CostCategory::Materials => "Materials",
            CostCategory::Equipment => "Equipment",
            CostCategory::Subcontractors => "Subcontractors",
            CostCategory::Permits => "Permits",
            CostCategory::Allowances => "Allowances",
            CostCategory::Alternates => "Alternates",
        }
    }
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Category subtotals keyed by [`CostCategory`].
///
/// Serializes as a JSON object whose keys follow category order, e.g.
/// `{"Labor": 5000.0, "Materials": 336.0}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CostBreakdown(BTreeMap<CostCategory, f64>);

impl CostBreakdown {
    pub fn new() -> Self {
        CostBreakdown(BTreeMap::new())
    }

    /// Record a category subtotal, replacing any earlier value.
    pub fn insert(&mut self, category: CostCategory, subtotal: f64) {
        self.0.insert(category, subtotal);
    }

    pub fn get(&self, category: CostCategory) -> Option<f64> {
        self.0.get(&category).copied()
    }

    pub fn contains(&self, category: CostCategory) -> bool {
        self.0.contains_key(&category)
    }

    /// Subtotals in report order.
    pub fn iter(&self) -> impl Iterator<Item = (CostCategory, f64)> + '_ {
        self.0.iter().map(|(category, amount)| (*category, *amount))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy with every subtotal rounded to cents.
    pub fn rounded(&self) -> CostBreakdown {
        CostBreakdown(
            self.0
                .iter()
                .map(|(category, amount)| (*category, round_currency(*amount)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_iterates_in_category_order() {
        let mut breakdown = CostBreakdown::new();
        breakdown.insert(CostCategory::Alternates, 1.0);
        breakdown.insert(CostCategory::Permits, 2.0);
        breakdown.insert(CostCategory::Labor, 3.0);

        let order: Vec<_> = breakdown.iter().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![CostCategory::Labor, CostCategory::Permits, CostCategory::Alternates]
        );
    }

    #[test]
    fn test_breakdown_serializes_as_ordered_object() {
        let mut breakdown = CostBreakdown::new();
        breakdown.insert(CostCategory::Materials, 336.0);
        breakdown.insert(CostCategory::Labor, 5000.0);

        let json = serde_json::to_string(&breakdown).unwrap();
        assert_eq!(json, r#"{"Labor":5000.0,"Materials":336.0}"#);
    }

    #[test]
    fn test_rounded_copy() {
        let mut breakdown = CostBreakdown::new();
        breakdown.insert(CostCategory::Equipment, 1234.5678);
        let rounded = breakdown.rounded();
        assert_eq!(rounded.get(CostCategory::Equipment), Some(1234.57));
        assert_eq!(breakdown.get(CostCategory::Equipment), Some(1234.5678));
    }

    #[test]
    fn test_all_categories_are_sorted() {
        let mut sorted = CostCategory::ALL;
        sorted.sort();
        assert_eq!(sorted, CostCategory::ALL);
        assert_eq!(CostCategory::Permits.to_string(), "Permits");
    }
}
