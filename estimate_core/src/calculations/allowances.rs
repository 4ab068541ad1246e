//! # Allowances & Alternates
//!
//! Scope allowances and priced alternates share one shape. Only items
//! flagged `includeInTotal` count toward the estimate; the rest are carried
//! for information and show up in detail reports as excluded.

use serde::{Deserialize, Serialize};

/// One allowance or alternate (`scope.allowances[]`, `scope.alternates[]`).
///
/// ## JSON Example
///
/// ```json
/// { "id": "ALT-2", "description": "Upgrade to standing-seam roof", "amount": 18500, "includeInTotal": false }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wbs: Option<String>,

    #[serde(default)]
    pub amount: f64,

    #[serde(default)]
    pub include_in_total: bool,
}

/// Sum of the items flagged for inclusion.
pub fn included_total(items: &[AllowanceItem]) -> f64 {
    items
        .iter()
        .filter(|item| item.include_in_total)
        .map(|item| item.amount)
        .sum()
}

/// Sum of the items carried for information only.
pub fn excluded_total(items: &[AllowanceItem]) -> f64 {
    items
        .iter()
        .filter(|item| !item.include_in_total)
        .map(|item| item.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<AllowanceItem> {
        serde_json::from_value(serde_json::json!([
            { "id": "A-1", "amount": 5000, "includeInTotal": true },
            { "id": "A-2", "amount": 2500, "includeInTotal": false },
            { "id": "A-3", "amount": 1200 }
        ]))
        .unwrap()
    }

    #[test]
    fn test_only_flagged_items_are_included() {
        assert_eq!(included_total(&items()), 5000.0);
    }

    #[test]
    fn test_unflagged_items_default_to_excluded() {
        let items = items();
        assert!(!items[2].include_in_total);
        assert_eq!(excluded_total(&items), 3700.0);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(included_total(&[]), 0.0);
    }
}
