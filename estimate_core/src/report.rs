//! # Report Rows
//!
//! Shapes a computed rollup into the row lists every exporter consumes:
//!
//! - **summary rows**: `(label, amount)` for each category present, then
//!   direct cost and every step of the soft-cost waterfall
//! - **detail rows**: one per underlying line item (plus category-level
//!   adders such as freight or mobilization), tagged with the item's
//!   work-breakdown code
//!
//! All amounts are rounded here. Exporters format them and nothing else.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::calculations::allowances::AllowanceItem;
use crate::calculations::CostCategory;
use crate::errors::EstimateResult;
use crate::estimate::Estimate;
use crate::money::round_currency;
use crate::rollup::{self, EstimateOutput, Rollup};

/// WBS code used for lines without one.
pub const UNASSIGNED_WBS: &str = "UNASSIGNED";

/// One summary line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub label: String,
    pub amount: f64,
}

/// One line item (or category adder) in the WBS detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub wbs: String,
    pub category: CostCategory,
    pub item: String,
    pub description: String,
    pub amount: f64,
    /// False for allowances/alternates carried for information only
    pub included: bool,
}

/// Included detail amounts grouped by WBS code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WbsSubtotal {
    pub wbs: String,
    pub amount: f64,
}

/// Everything an exporter needs, fully computed and rounded.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub output: EstimateOutput,
    pub rows: Vec<ReportRow>,
    pub details: Vec<DetailRow>,
}

impl Report {
    pub fn meta(&self) -> &Map<String, Value> {
        &self.output.meta
    }

    /// Taxed total as reported.
    pub fn total(&self) -> f64 {
        self.output.breakdown.waterfall.total_with_tax
    }

    /// Included detail amounts per WBS code, in code order.
    pub fn wbs_subtotals(&self) -> Vec<WbsSubtotal> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for row in self.details.iter().filter(|row| row.included) {
            *totals.entry(row.wbs.as_str()).or_insert(0.0) += row.amount;
        }
        totals
            .into_iter()
            .map(|(wbs, amount)| WbsSubtotal {
                wbs: wbs.to_string(),
                amount: round_currency(amount),
            })
            .collect()
    }
}

/// Run the rollup and shape the report.
pub fn build_report(estimate: &Estimate) -> EstimateResult<Report> {
    let rollup = rollup::compute(estimate)?;
    Ok(shape(estimate, &rollup))
}

/// Shape an already computed rollup.
pub fn shape(estimate: &Estimate, rollup: &Rollup) -> Report {
    Report {
        output: rollup.to_output(estimate),
        rows: summary_rows(rollup),
        details: detail_rows(estimate, rollup),
    }
}

/// Categories, then the waterfall, rounded.
pub fn summary_rows(rollup: &Rollup) -> Vec<ReportRow> {
    let categories = rollup.breakdown.iter().map(|(category, amount)| ReportRow {
        label: category.display_name().to_string(),
        amount: round_currency(amount),
    });
    let waterfall = rollup.waterfall.lines().into_iter().map(|(label, amount)| ReportRow {
        label: label.to_string(),
        amount: round_currency(amount),
    });
    categories.chain(waterfall).collect()
}

/// Per-item rows sorted by WBS code. Rows sharing a code keep category and
/// input order.
pub fn detail_rows(estimate: &Estimate, rollup: &Rollup) -> Vec<DetailRow> {
    let costs = &estimate.costs;
    let mut rows = Vec::new();

    rows.push(line(
        costs.labor.wbs.as_deref(),
        CostCategory::Labor,
        "LABOR",
        format!(
            "{:.2} adjusted hours @ {:.2}",
            costs.labor.adjusted_hours(),
            costs.labor.labor_rate
        ),
        rollup.breakdown.get(CostCategory::Labor).unwrap_or(0.0),
    ));

    for (i, item) in costs.materials.items.iter().enumerate() {
        rows.push(line(
            item.wbs.as_deref(),
            CostCategory::Materials,
            &item_id(item.id.as_deref(), "M", i),
            item.description.clone().unwrap_or_default(),
            item.amount(),
        ));
    }
    push_adder(&mut rows, CostCategory::Materials, "FREIGHT", "Freight", costs.materials.freight_cost);
    push_adder(
        &mut rows,
        CostCategory::Materials,
        "DUTIES",
        "Duties & taxes on materials and freight",
        costs.materials.duties_amount(),
    );

    for (i, item) in costs.equipment.items.iter().enumerate() {
        rows.push(line(
            item.wbs.as_deref(),
            CostCategory::Equipment,
            &item_id(item.id.as_deref(), "E", i),
            item.description.clone().unwrap_or_default(),
            item.amount(),
        ));
    }
    push_adder(&mut rows, CostCategory::Equipment, "FUEL", "Fuel surcharge", costs.equipment.fuel_amount());
    push_adder(
        &mut rows,
        CostCategory::Equipment,
        "MOBILIZATION",
        "Mobilization",
        costs.equipment.mobilization_lump_sum,
    );

    for (i, sub) in costs.subcontractors.iter().enumerate() {
        rows.push(line(
            sub.wbs.as_deref(),
            CostCategory::Subcontractors,
            &item_id(sub.id.as_deref(), "S", i),
            sub.label().to_string(),
            sub.quote,
        ));
    }

    for (label, amount) in costs.permits_and_fees.lines() {
        push_adder(&mut rows, CostCategory::Permits, "FEE", label, amount);
    }

    if let Some(items) = &rollup.scope_terms.allowances {
        push_allowances(&mut rows, CostCategory::Allowances, "AL", items);
    }
    if let Some(items) = &rollup.scope_terms.alternates {
        push_allowances(&mut rows, CostCategory::Alternates, "ALT", items);
    }

    rows.sort_by(|a, b| a.wbs.cmp(&b.wbs));
    rows
}

fn line(
    wbs: Option<&str>,
    category: CostCategory,
    item: &str,
    description: String,
    amount: f64,
) -> DetailRow {
    DetailRow {
        wbs: wbs
            .filter(|code| !code.trim().is_empty())
            .unwrap_or(UNASSIGNED_WBS)
            .to_string(),
        category,
        item: item.to_string(),
        description,
        amount: round_currency(amount),
        included: true,
    }
}

/// Category-level amounts that belong to no single item. Zero adders are
/// left out.
fn push_adder(rows: &mut Vec<DetailRow>, category: CostCategory, item: &str, description: &str, amount: f64) {
    if amount != 0.0 {
        rows.push(line(None, category, item, description.to_string(), amount));
    }
}

fn push_allowances(rows: &mut Vec<DetailRow>, category: CostCategory, prefix: &str, items: &[AllowanceItem]) {
    for (i, allowance) in items.iter().enumerate() {
        let mut row = line(
            allowance.wbs.as_deref(),
            category,
            &item_id(allowance.id.as_deref(), prefix, i),
            allowance.description.clone().unwrap_or_default(),
            allowance.amount,
        );
        row.included = allowance.include_in_total;
        rows.push(row);
    }
}

fn item_id(id: Option<&str>, prefix: &str, index: usize) -> String {
    match id {
        Some(id) => id.to_string(),
        None => format!("{}-{}", prefix, index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn estimate() -> Estimate {
        Estimate::from_value(json!({
            "meta": { "project": "Depot Canopy" },
            "scope": {
                "schedule": { "durationMonths": 4 },
                "allowances": [
                    { "id": "AL-1", "wbs": "09-000", "description": "Finishes", "amount": 1500, "includeInTotal": true },
                    { "description": "Owner art", "amount": 800 }
                ]
            },
            "costs": {
                "labor": { "baseLaborHours": 100, "productivityFactor": 1, "laborRate": 50, "wbs": "01-000" },
                "materials": {
                    "items": [
                        { "id": "M-1", "wbs": "05-100", "description": "Steel", "quantity": 10, "wasteFactor": 0.1, "unitCost": 20 },
                        { "wbs": "03-300", "description": "Concrete", "quantity": 5, "unitCost": 150 }
                    ],
                    "freightCost": 100,
                    "dutiesTaxesPct": 0.05
                },
                "equipment": {
                    "items": [ { "id": "E-1", "wbs": "05-100", "description": "Crane", "hours": 8, "rate": 250 } ],
                    "mobilizationLumpSum": 400
                },
                "subcontractors": [ { "name": "Electrical", "wbs": "26-000", "quote": 3200 } ],
                "permitsAndFees": { "permitFees": 250 },
                "risk": { "contingencyPct": 0.05 },
                "escalation": {},
                "overheadAndProfit": { "overheadPct": 0.1 },
                "taxes": {}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_row_order() {
        let report = build_report(&estimate()).unwrap();
        let labels: Vec<_> = report.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Labor",
                "Materials",
                "Equipment",
                "Subcontractors",
                "Permits",
                "Allowances",
                "Direct Cost",
                "With Insurance & Bond",
                "With Escalation",
                "With Contingency",
                "With Overhead",
                "With Profit",
                "Total With Tax",
            ]
        );
    }

    #[test]
    fn test_summary_rows_match_output_document() {
        let report = build_report(&estimate()).unwrap();
        let output = &report.output.breakdown;
        let row = |label: &str| report.rows.iter().find(|r| r.label == label).unwrap().amount;
        assert_eq!(row("Materials"), output.categories.get(CostCategory::Materials).unwrap());
        assert_eq!(row("Direct Cost"), output.waterfall.direct_cost);
        assert_eq!(row("Total With Tax"), report.total());
    }

    #[test]
    fn test_detail_rows_sum_to_category_subtotals() {
        let report = build_report(&estimate()).unwrap();
        for category in [CostCategory::Materials, CostCategory::Equipment, CostCategory::Allowances] {
            let detail: f64 = report
                .details
                .iter()
                .filter(|r| r.category == category && r.included)
                .map(|r| r.amount)
                .sum();
            let subtotal = report.output.breakdown.categories.get(category).unwrap();
            assert!((detail - subtotal).abs() < 0.011, "{category}: {detail} vs {subtotal}");
        }
    }

    #[test]
    fn test_detail_rows_sorted_by_wbs() {
        let report = build_report(&estimate()).unwrap();
        let codes: Vec<_> = report.details.iter().map(|r| r.wbs.as_str()).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
        assert_eq!(codes.first(), Some(&"01-000"));
        assert!(codes.contains(&UNASSIGNED_WBS));
    }

    #[test]
    fn test_generated_ids_and_exclusion_flag() {
        let report = build_report(&estimate()).unwrap();
        let concrete = report.details.iter().find(|r| r.description == "Concrete").unwrap();
        assert_eq!(concrete.item, "M-2");
        assert_eq!(concrete.amount, 750.0);

        let art = report.details.iter().find(|r| r.description == "Owner art").unwrap();
        assert_eq!(art.item, "AL-2");
        assert!(!art.included);
    }

    #[test]
    fn test_zero_adders_are_omitted() {
        let report = build_report(&estimate()).unwrap();
        assert!(report.details.iter().all(|r| r.item != "FUEL"));
        assert_eq!(
            report.details.iter().filter(|r| r.category == CostCategory::Permits).count(),
            1
        );
    }

    #[test]
    fn test_labor_row_uses_rollup_subtotal() {
        let mut estimate = estimate();
        estimate.costs.labor.productivity_factor = 0.0;
        let rollup = rollup::compute(&estimate).unwrap();
        let details = detail_rows(&estimate, &rollup);

        let labor_rows: Vec<_> = details.iter().filter(|r| r.category == CostCategory::Labor).collect();
        assert_eq!(labor_rows.len(), 1);
        assert_eq!(
            labor_rows[0].amount,
            round_currency(rollup.breakdown.get(CostCategory::Labor).unwrap())
        );
        assert!(labor_rows[0].amount.is_finite());
    }

    #[test]
    fn test_wbs_subtotals_skip_excluded_rows() {
        let report = build_report(&estimate()).unwrap();
        let subtotals = report.wbs_subtotals();
        let steel = subtotals.iter().find(|s| s.wbs == "05-100").unwrap();
        // steel 220 + crane 2000
        assert_eq!(steel.amount, 2220.0);

        let grand: f64 = subtotals.iter().map(|s| s.amount).sum();
        assert!((grand - report.output.breakdown.waterfall.direct_cost).abs() < 0.05);
    }
}
