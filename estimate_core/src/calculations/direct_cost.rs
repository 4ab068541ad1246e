//! # Direct Cost
//!
//! Sum of every category subtotal present in the breakdown. Allowance and
//! alternate subtotals arrive already filtered to included items.

use super::CostBreakdown;

pub fn direct_cost(breakdown: &CostBreakdown) -> f64 {
    breakdown.iter().map(|(_, subtotal)| subtotal).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::CostCategory;

    #[test]
    fn test_sums_all_present_categories() {
        let mut breakdown = CostBreakdown::new();
        breakdown.insert(CostCategory::Labor, 5000.0);
        breakdown.insert(CostCategory::Materials, 336.0);
        breakdown.insert(CostCategory::Allowances, 1000.0);
        assert_eq!(direct_cost(&breakdown), 6336.0);
    }

    #[test]
    fn test_empty_breakdown() {
        assert_eq!(direct_cost(&CostBreakdown::new()), 0.0);
    }
}
