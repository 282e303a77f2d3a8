//! Priority shorthand normalization.

/// Strip a leading `P`/`p` from P-notation (`P1` -> `1`). Bare numbers
/// pass through unchanged.
pub fn normalize_priority(priority: &str) -> &str {
    let mut chars = priority.chars();
    match chars.next() {
        Some('P') | Some('p') if priority.len() > 1 => chars.as_str(),
        _ => priority,
    }
}

fn strip_wrapping(value: &str) -> &str {
    value.trim_matches(|c| matches!(c, '[' | ']' | '"' | '\''))
}

/// Expand a priority value into store syntax.
///
/// `"3"` -> `priority=3`, `"P1,P2"` -> `priority=1^ORpriority=2`.
/// Values already containing `^OR` pass through unchanged.
pub fn parse_priority_list(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    if value.contains("^OR") {
        return value.to_string();
    }
    if value.contains(',') {
        let fragments: Vec<String> = strip_wrapping(value)
            .split(',')
            .map(|item| item.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|item| !item.is_empty())
            .map(|item| format!("priority={}", normalize_priority(item)))
            .collect();
        return fragments.join("^OR");
    }
    format!("priority={}", normalize_priority(value))
}

/// OR-join an explicit priority list: `["1", "2"]` ->
/// `priority=1^ORpriority=2`. Empty input yields an empty filter.
pub fn build_priority_filter(priorities: &[String]) -> String {
    priorities
        .iter()
        .map(|p| format!("priority={p}"))
        .collect::<Vec<_>>()
        .join("^OR")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_numeric_priority() {
        assert_eq!(parse_priority_list("3"), "priority=3");
    }

    #[test]
    fn single_p_notation() {
        assert_eq!(parse_priority_list("P1"), "priority=1");
        assert_eq!(parse_priority_list("p2"), "priority=2");
    }

    #[test]
    fn comma_list_expands_to_or() {
        assert_eq!(parse_priority_list("P1,P2"), "priority=1^ORpriority=2");
        assert_eq!(parse_priority_list("1,2"), "priority=1^ORpriority=2");
    }

    #[test]
    fn bracketed_quoted_list() {
        assert_eq!(
            parse_priority_list("[\"1\", \"2\"]"),
            "priority=1^ORpriority=2"
        );
    }

    #[test]
    fn already_expanded_passes_through() {
        assert_eq!(
            parse_priority_list("priority=1^ORpriority=2"),
            "priority=1^ORpriority=2"
        );
    }

    #[test]
    fn empty_items_are_dropped() {
        assert_eq!(parse_priority_list("1,,2"), "priority=1^ORpriority=2");
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(parse_priority_list("   "), "");
    }

    #[test]
    fn bare_p_is_not_stripped() {
        assert_eq!(normalize_priority("P"), "P");
    }

    #[test]
    fn explicit_filter_single_and_multiple() {
        assert_eq!(build_priority_filter(&[]), "");
        assert_eq!(build_priority_filter(&["1".to_string()]), "priority=1");
        assert_eq!(
            build_priority_filter(&["1".to_string(), "2".to_string()]),
            "priority=1^ORpriority=2"
        );
    }
}
