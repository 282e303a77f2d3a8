//! Condition dispatch: one (field, value) pair in, exactly one query
//! fragment out.

use super::caller::parse_caller_exclusions;
use super::date::parse_date_range;
use super::priority::parse_priority_list;

/// Pseudo-field whose value is already a complete query string.
pub const COMPLETE_QUERY_FIELD: &str = "_complete_query";
/// Pseudo-field whose value is already a complete caller-exclusion filter.
pub const COMPLETE_CALLER_EXCLUSION_FIELD: &str = "_complete_caller_exclusion";

const CREATED_ON_FIELD: &str = "sys_created_on";

type Handler = fn(&str, &str) -> Option<String>;

/// Handler chain, most specific first. The order is a contract: the date,
/// priority, and exclusion rewrites must run before the generic operator
/// and equality fallbacks or they would never fire.
const HANDLERS: &[Handler] = &[
    date_range_condition,
    priority_condition,
    caller_exclusion_condition,
    complete_filter_condition,
    explicit_operator_condition,
    suffix_operator_condition,
];

/// Build one query fragment for a filter entry. Total: the equality
/// fallback guarantees every input produces output.
pub fn build_condition(field: &str, value: &str) -> String {
    if field == COMPLETE_QUERY_FIELD || field == COMPLETE_CALLER_EXCLUSION_FIELD {
        return value.to_string();
    }
    for handler in HANDLERS {
        if let Some(fragment) = handler(field, value) {
            return fragment;
        }
    }
    format!("{field}={value}")
}

fn has_comparison_operator(value: &str) -> bool {
    [">=", "<=", ">", "<", "="]
        .iter()
        .any(|op| value.contains(op))
}

fn is_complete_store_filter(value: &str) -> bool {
    value.contains("^OR") || value.contains("ON")
}

/// Creation-timestamp values: pass through ready-made range syntax, else
/// try the natural-language grammars and emit a scripted BETWEEN range
/// spanning whole days.
fn date_range_condition(field: &str, value: &str) -> Option<String> {
    if field != CREATED_ON_FIELD {
        return None;
    }
    if value.contains("BETWEEN") {
        return Some(value.to_string());
    }
    if value.starts_with(">=") || value.starts_with("<=") {
        return Some(format!("{field}{value}"));
    }
    let range = parse_date_range(value)?;
    Some(format!(
        "{field}BETWEENjavascript:gs.dateGenerate('{}','00:00:00')@javascript:gs.dateGenerate('{}','23:59:59')",
        range.start, range.end
    ))
}

fn priority_condition(field: &str, value: &str) -> Option<String> {
    let p_notation = value.starts_with('P') || value.starts_with('p');
    if field == "priority" && (value.contains(',') || p_notation) {
        return Some(parse_priority_list(value));
    }
    None
}

fn caller_exclusion_condition(field: &str, value: &str) -> Option<String> {
    if field == "exclude_caller" || field == "caller_exclusion" {
        return Some(parse_caller_exclusions(value));
    }
    None
}

fn complete_filter_condition(_field: &str, value: &str) -> Option<String> {
    if is_complete_store_filter(value) {
        return Some(value.to_string());
    }
    None
}

fn explicit_operator_condition(field: &str, value: &str) -> Option<String> {
    if has_comparison_operator(value) {
        return Some(format!("{field}{value}"));
    }
    None
}

fn suffix_operator_condition(field: &str, value: &str) -> Option<String> {
    for (suffix, op) in [("_gte", ">="), ("_lte", "<="), ("_gt", ">"), ("_lt", "<")] {
        if let Some(base) = field.strip_suffix(suffix) {
            return Some(format!("{base}{op}{value}"));
        }
    }
    if field.to_uppercase().contains("CONTAINS") {
        return Some(field.to_string());
    }
    None
}
