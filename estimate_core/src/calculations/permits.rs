//! # Permits & Fees

use serde::{Deserialize, Serialize};

/// Flat fees (`costs.permitsAndFees`). Every field defaults to zero and the
/// whole block may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitsAndFees {
    #[serde(default)]
    pub permit_fees: f64,

    #[serde(default)]
    pub testing_inspection_costs: f64,

    #[serde(default)]
    pub disposal_fees: f64,
}

impl PermitsAndFees {
    /// Fee lines as (label, amount), for detail reports.
    pub fn lines(&self) -> [(&'static str, f64); 3] {
        [
            ("Permit fees", self.permit_fees),
            ("Testing & inspection", self.testing_inspection_costs),
            ("Disposal fees", self.disposal_fees),
        ]
    }
}

pub fn subtotal(input: &PermitsAndFees) -> f64 {
    input.permit_fees + input.testing_inspection_costs + input.disposal_fees
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fees_are_summed() {
        let fees = PermitsAndFees {
            permit_fees: 1500.0,
            testing_inspection_costs: 750.0,
            disposal_fees: 420.0,
        };
        assert_eq!(subtotal(&fees), 2670.0);
        let from_lines: f64 = fees.lines().iter().map(|(_, amount)| amount).sum();
        assert_eq!(from_lines, subtotal(&fees));
    }

    #[test]
    fn test_partial_block() {
        let fees: PermitsAndFees =
            serde_json::from_value(serde_json::json!({ "disposalFees": 90 })).unwrap();
        assert_eq!(subtotal(&fees), 90.0);
    }
}
