//! Caller-exclusion rewriting.

/// Human-readable caller aliases and their store identifiers.
const KNOWN_CALLERS: &[(&str, &str)] = &[("logicmonitor", "1727339e47d99190c43d3171e36d43ad")];

fn strip_wrapping(value: &str) -> &str {
    value.trim_matches(|c| matches!(c, '[' | ']' | '"' | '\''))
}

/// Rewrite a caller-exclusion value into not-equal fragments.
///
/// `"logicmonitor"` resolves through the alias table; comma-separated
/// identifiers become one `caller_id!=` fragment per item, AND-joined.
/// Idempotent: a value already in `caller_id!=` form is returned as-is.
pub fn parse_caller_exclusions(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }

    let lower = value.to_lowercase();
    if let Some((_, sys_id)) = KNOWN_CALLERS.iter().find(|(name, _)| *name == lower) {
        return format!("caller_id!={sys_id}");
    }

    if value.contains(',') {
        let fragments: Vec<String> = strip_wrapping(value)
            .split(',')
            .map(|item| item.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|item| !item.is_empty())
            .map(|item| format!("caller_id!={item}"))
            .collect();
        return fragments.join("^");
    }

    if !value.starts_with("caller_id!=") {
        return format!("caller_id!={value}");
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_alias_resolves_to_sys_id() {
        assert_eq!(
            parse_caller_exclusions("logicmonitor"),
            "caller_id!=1727339e47d99190c43d3171e36d43ad"
        );
        assert_eq!(
            parse_caller_exclusions("LogicMonitor"),
            "caller_id!=1727339e47d99190c43d3171e36d43ad"
        );
    }

    #[test]
    fn comma_list_becomes_and_joined_not_equals() {
        assert_eq!(
            parse_caller_exclusions("sys_id1,sys_id2"),
            "caller_id!=sys_id1^caller_id!=sys_id2"
        );
    }

    #[test]
    fn single_value_becomes_not_equal() {
        assert_eq!(parse_caller_exclusions("abc123"), "caller_id!=abc123");
    }

    #[test]
    fn rewriting_is_idempotent() {
        let once = parse_caller_exclusions("abc123");
        assert_eq!(parse_caller_exclusions(&once), once);
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(parse_caller_exclusions("  "), "");
    }
}
