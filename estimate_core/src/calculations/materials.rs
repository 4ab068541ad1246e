//! # Materials
//!
//! Line items with waste, plus freight, with duties applied to the whole
//! subtotal including freight:
//!
//! ```text
//! item      = quantity × (1 + waste_factor) × unit_cost
//! materials = (Σ item + freight) × (1 + duties_taxes_pct)
//! ```

use serde::{Deserialize, Serialize};

/// One material line (`costs.materials.items[]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Work-breakdown code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wbs: Option<String>,

    #[serde(default)]
    pub quantity: f64,

    /// Extra fraction ordered to cover cutting and breakage (0.1 = 10%)
    #[serde(default)]
    pub waste_factor: f64,

    #[serde(default)]
    pub unit_cost: f64,
}

impl MaterialItem {
    /// Item cost including waste, before freight and duties.
    pub fn amount(&self) -> f64 {
        self.quantity * (1.0 + self.waste_factor) * self.unit_cost
    }
}

/// Materials block (`costs.materials`).
///
/// ## JSON Example
///
/// ```json
/// {
///   "items": [
///     { "id": "M-1", "wbs": "03-300", "quantity": 10, "wasteFactor": 0.1, "unitCost": 20 }
///   ],
///   "freightCost": 100,
///   "dutiesTaxesPct": 0.05
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialsInput {
    pub items: Vec<MaterialItem>,

    #[serde(default)]
    pub freight_cost: f64,

    #[serde(default)]
    pub duties_taxes_pct: f64,
}

impl MaterialsInput {
    /// Sum of item amounts, before freight and duties.
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(MaterialItem::amount).sum()
    }

    /// Duties charged on items and freight together.
    pub fn duties_amount(&self) -> f64 {
        (self.items_total() + self.freight_cost) * self.duties_taxes_pct
    }
}

/// Total materials cost.
pub fn subtotal(input: &MaterialsInput) -> f64 {
    (input.items_total() + input.freight_cost) * (1.0 + input.duties_taxes_pct)
}
