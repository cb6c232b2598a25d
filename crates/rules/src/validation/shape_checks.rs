//! Shape checks for the document root, rules, and conditions.

use serde_json::{Map, Value};

use super::ValidationReport;

const SCALAR_OR_LIST: &str = "a string, number, or list of those";

pub(super) fn validate_document(value: &Value, report: &mut ValidationReport) {
    let Some(root) = value.as_object() else {
        report.wrong_type("", "an object");
        return;
    };

    match root.get("ruleset_version") {
        None | Some(Value::Null) => report.missing("ruleset_version"),
        Some(Value::String(s)) if s.is_empty() => report.empty("ruleset_version"),
        Some(Value::String(_)) => {}
        Some(_) => report.wrong_type("ruleset_version", "a string"),
    }

    optional_string(root, "description", "description", report);

    match root.get("rules") {
        None | Some(Value::Null) => report.missing("rules"),
        Some(Value::Array(rules)) => {
            for (i, rule) in rules.iter().enumerate() {
                validate_rule(rule, &format!("rules[{i}]"), report);
            }
        }
        Some(_) => report.wrong_type("rules", "an array"),
    }
}

fn validate_rule(value: &Value, path: &str, report: &mut ValidationReport) {
    let Some(rule) = value.as_object() else {
        report.wrong_type(path, "an object");
        return;
    };

    required_string(rule, "rule_id", &format!("{path}.rule_id"), report);
    optional_string(rule, "description", &format!("{path}.description"), report);

    let conditions_path = format!("{path}.conditions");
    match rule.get("conditions") {
        None => report.missing(conditions_path),
        // Written by the backend for a rule without conditions.
        Some(Value::Null) => {}
        Some(Value::Array(conditions)) => {
            for (i, condition) in conditions.iter().enumerate() {
                validate_condition(condition, &format!("{conditions_path}[{i}]"), report);
            }
        }
        Some(_) => report.wrong_type(conditions_path, "an array"),
    }
}

fn validate_condition(value: &Value, path: &str, report: &mut ValidationReport) {
    let Some(condition) = value.as_object() else {
        report.wrong_type(path, "an object");
        return;
    };

    required_string(condition, "field", &format!("{path}.field"), report);
    // Operator vocabulary belongs to the backend; only the type is checked.
    required_string(condition, "operator", &format!("{path}.operator"), report);

    let value_path = format!("{path}.value");
    match condition.get("value") {
        None => report.missing(value_path),
        Some(v) if is_scalar(v) => {}
        Some(Value::Array(items)) if items.iter().all(is_scalar) => {}
        Some(_) => report.wrong_type(value_path, SCALAR_OR_LIST),
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_))
}

fn required_string(obj: &Map<String, Value>, key: &str, path: &str, report: &mut ValidationReport) {
    match obj.get(key) {
        None => report.missing(path),
        Some(Value::String(_)) => {}
        Some(_) => report.wrong_type(path, "a string"),
    }
}

fn optional_string(obj: &Map<String, Value>, key: &str, path: &str, report: &mut ValidationReport) {
    match obj.get(key) {
        None | Some(Value::String(_)) => {}
        Some(_) => report.wrong_type(path, "a string"),
    }
}
