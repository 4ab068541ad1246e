//! # Subcontractors
//!
//! Flat quotes, summed without markup. Markup on subcontracted work comes
//! from the overhead and profit steps of the soft-cost chain.

use serde::{Deserialize, Serialize};

/// One subcontractor quote (`costs.subcontractors[]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcontractor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Trade or company name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wbs: Option<String>,

    #[serde(default)]
    pub quote: f64,
}

impl Subcontractor {
    /// Label for reports: description, then name, then id.
    pub fn label(&self) -> &str {
        self.description
            .as_deref()
            .or(self.name.as_deref())
            .or(self.id.as_deref())
            .unwrap_or("")
    }
}

pub fn subtotal(subcontractors: &[Subcontractor]) -> f64 {
    subcontractors.iter().map(|s| s.quote).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_are_summed() {
        let subs: Vec<Subcontractor> = serde_json::from_value(serde_json::json!([
            { "name": "Electrical", "quote": 12500 },
            { "name": "Plumbing", "quote": 8400.5 },
            { "name": "No quote yet" }
        ]))
        .unwrap();
        assert_eq!(subtotal(&subs), 20900.5);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(subtotal(&[]), 0.0);
    }

    #[test]
    fn test_label_fallbacks() {
        let sub = Subcontractor {
            id: Some("S-7".to_string()),
            name: Some("Roofing Co".to_string()),
            ..Subcontractor::default()
        };
        assert_eq!(sub.label(), "Roofing Co");
        assert_eq!(Subcontractor::default().label(), "");
    }
}
