//! # Schema Validation
//!
//! Structural checks run on the raw JSON document before anything is
//! deserialized or computed. A document with any issue is rejected as a
//! whole; the pipeline never runs on partial input.
//!
//! Validators sit behind [`SchemaValidator`] so another engine can be
//! dropped in. The built-in [`EstimateSchema`] is driven by a rule table,
//! and the same table exports a draft-07 JSON Schema via [`json_schema`]
//! for tools that want to validate documents on their own.
//!
//! ## Paths
//!
//! Rule paths use dots for object keys and `[]` for "every element", e.g.
//! `costs.materials.items[].quantity`. Reported paths are concrete:
//! `costs.materials.items[2].quantity`.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::validation::{EstimateSchema, SchemaValidator};
//!
//! let issues = EstimateSchema.validate(&serde_json::json!({ "costs": {} }));
//! assert!(issues.iter().any(|i| i.path == "costs.labor"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{EstimateError, EstimateResult};

/// One structural problem in a document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Anything that can check a document and list what is wrong with it.
///
/// Implementations return issues sorted by path; an empty list means the
/// document may be computed.
pub trait SchemaValidator {
    fn validate(&self, document: &Value) -> Vec<ValidationIssue>;
}

/// Expected JSON type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Object,
    Array,
    Number,
    /// Number that must be zero or greater
    Amount,
    String,
    Boolean,
}

impl FieldKind {
    fn name(&self) -> &'static str {
        match self {
            FieldKind::Object => "object",
            FieldKind::Array => "array",
            FieldKind::Number | FieldKind::Amount => "number",
            FieldKind::String => "string",
            FieldKind::Boolean => "boolean",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::Object => value.is_object(),
            FieldKind::Array => value.is_array(),
            FieldKind::Number | FieldKind::Amount => value.is_number(),
            FieldKind::String => value.is_string(),
            FieldKind::Boolean => value.is_boolean(),
        }
    }

    fn schema(&self) -> Value {
        match self {
            FieldKind::Amount => json!({ "type": "number", "minimum": 0 }),
            kind => json!({ "type": kind.name() }),
        }
    }
}

/// One entry of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub path: &'static str,
    pub kind: FieldKind,
    /// Must be present whenever its parent object is present
    pub required: bool,
}

const fn required(path: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule { path, kind, required: true }
}

const fn optional(path: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule { path, kind, required: false }
}

use FieldKind::{Amount, Array, Boolean, Number, Object, String as Text};

/// Structure of an estimate document. Parents come before children.
pub const ESTIMATE_RULES: &[FieldRule] = &[
    optional("meta", Object),
    optional("scope", Object),
    optional("scope.schedule", Object),
    optional("scope.schedule.durationMonths", Number),
    optional("scope.allowances", Array),
    optional("scope.allowances[]", Object),
    optional("scope.allowances[].id", Text),
    optional("scope.allowances[].description", Text),
    optional("scope.allowances[].wbs", Text),
    optional("scope.allowances[].amount", Number),
    optional("scope.allowances[].includeInTotal", Boolean),
    optional("scope.alternates", Array),
    optional("scope.alternates[]", Object),
    optional("scope.alternates[].id", Text),
    optional("scope.alternates[].description", Text),
    optional("scope.alternates[].wbs", Text),
    optional("scope.alternates[].amount", Number),
    optional("scope.alternates[].includeInTotal", Boolean),
    required("costs", Object),
    required("costs.labor", Object),
    required("costs.labor.baseLaborHours", Amount),
    required("costs.labor.productivityFactor", Number),
    required("costs.labor.laborRate", Number),
    optional("costs.labor.laborBurdenPct", Number),
    optional("costs.labor.overtimeMultiplier", Number),
    optional("costs.labor.wbs", Text),
    required("costs.materials", Object),
    required("costs.materials.items", Array),
    optional("costs.materials.items[]", Object),
    optional("costs.materials.items[].id", Text),
    optional("costs.materials.items[].description", Text),
    optional("costs.materials.items[].wbs", Text),
    optional("costs.materials.items[].quantity", Amount),
    optional("costs.materials.items[].wasteFactor", Number),
    optional("costs.materials.items[].unitCost", Number),
    optional("costs.materials.freightCost", Number),
    optional("costs.materials.dutiesTaxesPct", Number),
    required("costs.equipment", Object),
    required("costs.equipment.items", Array),
    optional("costs.equipment.items[]", Object),
    optional("costs.equipment.items[].id", Text),
    optional("costs.equipment.items[].description", Text),
    optional("costs.equipment.items[].wbs", Text),
    optional("costs.equipment.items[].hours", Amount),
    optional("costs.equipment.items[].rate", Number),
    optional("costs.equipment.fuelPct", Number),
    optional("costs.equipment.mobilizationLumpSum", Number),
    optional("costs.subcontractors", Array),
    optional("costs.subcontractors[]", Object),
    optional("costs.subcontractors[].id", Text),
    optional("costs.subcontractors[].name", Text),
    optional("costs.subcontractors[].description", Text),
    optional("costs.subcontractors[].wbs", Text),
    optional("costs.subcontractors[].quote", Number),
    optional("costs.permitsAndFees", Object),
    optional("costs.permitsAndFees.permitFees", Number),
    optional("costs.permitsAndFees.testingInspectionCosts", Number),
    optional("costs.permitsAndFees.disposalFees", Number),
    required("costs.risk", Object),
    optional("costs.risk.insurancePct", Number),
    optional("costs.risk.bondPct", Number),
    optional("costs.risk.contingencyPct", Number),
    required("costs.escalation", Object),
    optional("costs.escalation.escalationPctPerYear", Number),
    required("costs.overheadAndProfit", Object),
    optional("costs.overheadAndProfit.overheadPct", Number),
    optional("costs.overheadAndProfit.profitPct", Number),
    required("costs.taxes", Object),
    optional("costs.taxes.salesTaxPct", Number),
];

/// Built-in validator for estimate documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimateSchema;

impl SchemaValidator for EstimateSchema {
    fn validate(&self, document: &Value) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if !document.is_object() {
            issues.push(ValidationIssue::new("$", "expected object"));
            return issues;
        }

        for rule in ESTIMATE_RULES {
            check_rule(rule, document, &mut issues);
        }

        issues.sort();
        issues
    }
}

/// Validate with the built-in schema, failing on any issue.
pub fn validate_estimate(document: &Value) -> EstimateResult<()> {
    validate_with(&EstimateSchema, document)
}

/// Validate with any validator, failing on any issue.
pub fn validate_with(validator: &dyn SchemaValidator, document: &Value) -> EstimateResult<()> {
    let issues = validator.validate(document);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(EstimateError::SchemaViolation { issues })
    }
}

fn check_rule(rule: &FieldRule, document: &Value, issues: &mut Vec<ValidationIssue>) {
    for (path, value) in locate(document, rule.path) {
        match value {
            None if rule.required => issues.push(ValidationIssue::new(path, "is a required property")),
            None => {}
            Some(value) if !rule.kind.matches(value) => issues.push(ValidationIssue::new(
                path,
                format!("expected {}, found {}", rule.kind.name(), type_name(value)),
            )),
            Some(value) => {
                if rule.kind == FieldKind::Amount && value.as_f64().is_some_and(|n| n < 0.0) {
                    issues.push(ValidationIssue::new(path, format!("{value} is less than the minimum of 0")));
                }
            }
        }
    }
}

/// Every concrete location a rule path refers to, with the value found
/// there. Locations whose parent is missing or of the wrong type are
/// skipped; the parent's own rule reports those.
fn locate<'a>(document: &'a Value, rule_path: &str) -> Vec<(String, Option<&'a Value>)> {
    let segments: Vec<&str> = rule_path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return Vec::new();
    };

    let mut frontier: Vec<(String, &Value)> = vec![(String::new(), document)];
    for segment in parents {
        let (key, each) = split_segment(segment);
        let mut next = Vec::new();
        for (path, value) in frontier {
            let Some(child) = value.as_object().and_then(|o| o.get(key)) else {
                continue;
            };
            let child_path = join(&path, key);
            if each {
                if let Some(elements) = child.as_array() {
                    for (i, element) in elements.iter().enumerate() {
                        next.push((format!("{child_path}[{i}]"), element));
                    }
                }
            } else {
                next.push((child_path, child));
            }
        }
        frontier = next;
    }

    let (key, each) = split_segment(last);
    let mut found = Vec::new();
    for (path, value) in frontier {
        let Some(object) = value.as_object() else {
            continue;
        };
        let child = object.get(key);
        let child_path = join(&path, key);
        if each {
            if let Some(elements) = child.and_then(Value::as_array) {
                for (i, element) in elements.iter().enumerate() {
                    found.push((format!("{child_path}[{i}]"), Some(element)));
                }
            }
        } else {
            found.push((child_path, child));
        }
    }
    found
}

fn split_segment(segment: &str) -> (&str, bool) {
    match segment.strip_suffix("[]") {
        Some(key) => (key, true),
        None => (segment, false),
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Draft-07 JSON Schema equivalent of [`ESTIMATE_RULES`].
pub fn json_schema() -> Value {
    let mut root = json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "Construction cost estimate",
        "type": "object",
    });

    for rule in ESTIMATE_RULES {
        let segments: Vec<&str> = rule.path.split('.').collect();
        let mut node = &mut root;
        for (i, segment) in segments.iter().enumerate() {
            let (key, each) = split_segment(segment);
            let last = i + 1 == segments.len();

            if last && rule.required && !each {
                let list = &mut node["required"];
                if list.is_null() {
                    *list = json!([]);
                }
                if let Value::Array(names) = list {
                    names.push(json!(key));
                }
            }

            node = &mut node["properties"][key];
            if each {
                node = &mut node["items"];
            }
        }

        if node.is_null() {
            *node = json!({});
        }
        if let (Value::Object(target), Value::Object(fields)) = (node, rule.kind.schema()) {
            target.extend(fields);
        }
    }

    root
}
