//! # Labor
//!
//! Crew cost from estimated hours, adjusted for crew productivity.
//!
//! ```text
//! adjusted_hours = base_hours / max(productivity, 1e-9)
//! labor_cost     = adjusted_hours × rate × overtime × (1 + burden)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::calculations::labor::{subtotal, LaborInput};
//!
//! let input = LaborInput::new(100.0, 1.0, 50.0);
//! assert_eq!(subtotal(&input), 5000.0);
//! ```

use serde::{Deserialize, Serialize};

/// Floor applied to the productivity factor so zero or negative
/// productivity never divides by zero.
pub const MIN_PRODUCTIVITY: f64 = 1e-9;

/// Labor inputs (`costs.labor`).
///
/// ## JSON Example
///
/// ```json
/// {
///   "baseLaborHours": 320,
///   "productivityFactor": 0.85,
///   "laborRate": 62.5,
///   "laborBurdenPct": 0.32,
///   "overtimeMultiplier": 1.1,
///   "wbs": "01-100"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborInput {
    /// Estimated crew hours at nominal productivity
    pub base_labor_hours: f64,

    /// Crew productivity relative to nominal (1.0 = nominal, 0.8 = slower)
    pub productivity_factor: f64,

    /// Hourly labor rate
    pub labor_rate: f64,

    /// Payroll burden as a fraction of wages (taxes, benefits)
    #[serde(default)]
    pub labor_burden_pct: f64,

    /// Blended overtime premium; 1.0 means straight time
    #[serde(default = "default_overtime_multiplier")]
    pub overtime_multiplier: f64,

    /// Work-breakdown code for the labor line in detail reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wbs: Option<String>,
}

fn default_overtime_multiplier() -> f64 {
    1.0
}

impl LaborInput {
    /// Labor input with no burden and straight-time hours.
    pub fn new(base_labor_hours: f64, productivity_factor: f64, labor_rate: f64) -> Self {
        LaborInput {
            base_labor_hours,
            productivity_factor,
            labor_rate,
            labor_burden_pct: 0.0,
            overtime_multiplier: default_overtime_multiplier(),
            wbs: None,
        }
    }

    /// True when the productivity factor is below [`MIN_PRODUCTIVITY`] and
    /// gets clamped.
    pub fn productivity_floored(&self) -> bool {
        self.productivity_factor < MIN_PRODUCTIVITY
    }

    /// Hours after dividing out crew productivity.
    pub fn adjusted_hours(&self) -> f64 {
        self.base_labor_hours / self.productivity_factor.max(MIN_PRODUCTIVITY)
    }
}

/// Total labor cost.
pub fn subtotal(input: &LaborInput) -> f64 {
    input.adjusted_hours()
        * input.labor_rate
        * input.overtime_multiplier
        * (1.0 + input.labor_burden_pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_labor() {
        let input = LaborInput::new(100.0, 1.0, 50.0);
        assert_eq!(subtotal(&input), 5000.0);
    }

    #[test]
    fn test_productivity_adjustment() {
        // 100 h at 80% productivity takes 125 h
        let input = LaborInput::new(100.0, 0.8, 40.0);
        assert!((input.adjusted_hours() - 125.0).abs() < 1e-9);
        assert!((subtotal(&input) - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn test_burden_and_overtime() {
        let input = LaborInput {
            labor_burden_pct: 0.3,
            overtime_multiplier: 1.5,
            ..LaborInput::new(10.0, 1.0, 20.0)
        };
        // 10 × 20 × 1.5 × 1.3 = 390
        assert!((subtotal(&input) - 390.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_productivity_is_floored() {
        let input = LaborInput::new(1.0, 0.0, 1.0);
        let cost = subtotal(&input);
        assert!(cost.is_finite());
        assert!((cost - 1.0 / MIN_PRODUCTIVITY).abs() < 1.0);

        let negative = LaborInput::new(1.0, -3.0, 1.0);
        assert_eq!(subtotal(&negative), cost);

        assert!(input.productivity_floored());
        assert!(negative.productivity_floored());
        assert!(!LaborInput::new(1.0, 0.5, 1.0).productivity_floored());
    }

    #[test]
    fn test_optional_fields_default() {
        let input: LaborInput = serde_json::from_value(serde_json::json!({
            "baseLaborHours": 8,
            "productivityFactor": 1,
            "laborRate": 30
        }))
        .unwrap();
        assert_eq!(input.labor_burden_pct, 0.0);
        assert_eq!(input.overtime_multiplier, 1.0);
        assert_eq!(input.wbs, None);
        assert_eq!(subtotal(&input), 240.0);
    }

    #[test]
    fn test_required_fields_are_enforced() {
        let result = serde_json::from_value::<LaborInput>(serde_json::json!({
            "productivityFactor": 1,
            "laborRate": 30
        }));
        assert!(result.is_err());
    }
}
