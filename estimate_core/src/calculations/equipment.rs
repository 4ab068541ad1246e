//! # Equipment
//!
//! Hourly equipment with a fuel surcharge, plus a mobilization lump sum that
//! is added after the surcharge:
//!
//! ```text
//! equipment = (Σ hours × rate) × (1 + fuel_pct) + mobilization
//! ```

use serde::{Deserialize, Serialize};

/// One equipment line (`costs.equipment.items[]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Work-breakdown code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wbs: Option<String>,

    #[serde(default)]
    pub hours: f64,

    /// Hourly rate
    #[serde(default)]
    pub rate: f64,
}

impl EquipmentItem {
    pub fn amount(&self) -> f64 {
        self.hours * self.rate
    }
}

/// Equipment block (`costs.equipment`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentInput {
    pub items: Vec<EquipmentItem>,

    #[serde(default)]
    pub fuel_pct: f64,

    #[serde(default)]
    pub mobilization_lump_sum: f64,
}

impl EquipmentInput {
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(EquipmentItem::amount).sum()
    }

    /// Fuel surcharge on the hourly items only.
    pub fn fuel_amount(&self) -> f64 {
        self.items_total() * self.fuel_pct
    }
}

/// Total equipment cost.
pub fn subtotal(input: &EquipmentInput) -> f64 {
    input.items_total() * (1.0 + input.fuel_pct) + input.mobilization_lump_sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(hours: f64, rate: f64) -> EquipmentItem {
        EquipmentItem {
            hours,
            rate,
            ..EquipmentItem::default()
        }
    }

    #[test]
    fn test_mobilization_is_not_surcharged() {
        let input = EquipmentInput {
            items: vec![item(10.0, 100.0)],
            fuel_pct: 0.1,
            mobilization_lump_sum: 500.0,
        };
        // 1000 × 1.1 + 500 = 1600, not (1000 + 500) × 1.1 = 1650
        assert!((subtotal(&input) - 1600.0).abs() < 1e-9);
        assert!((input.fuel_amount() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_fuel_is_identity() {
        let input = EquipmentInput {
            items: vec![item(8.0, 95.0), item(4.0, 150.0)],
            ..EquipmentInput::default()
        };
        assert_eq!(subtotal(&input), 1360.0);
    }

    #[test]
    fn test_mobilization_only() {
        let input: EquipmentInput = serde_json::from_value(serde_json::json!({
            "items": [],
            "mobilizationLumpSum": 1200
        }))
        .unwrap();
        assert_eq!(subtotal(&input), 1200.0);
    }
}
