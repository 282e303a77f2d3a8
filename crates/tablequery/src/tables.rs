//! Static per-table configuration: field catalogs, number prefixes, and
//! which tables support priority filtering.

/// Fields used when a table has no configured catalog.
pub const FALLBACK_FIELDS: &[&str] = &["number", "short_description"];

#[derive(Debug, Clone, Copy)]
pub struct TableConfig {
    pub name: &'static str,
    pub display_name: &'static str,
    pub number_prefix: Option<&'static str>,
    pub priority_field: Option<&'static str>,
    pub state_field: &'static str,
}

const TABLE_CONFIGS: &[TableConfig] = &[
    TableConfig {
        name: "incident",
        display_name: "Incident",
        number_prefix: Some("INC"),
        priority_field: Some("priority"),
        state_field: "state",
    },
    TableConfig {
        name: "change_request",
        display_name: "Change Request",
        number_prefix: Some("CHG"),
        priority_field: Some("priority"),
        state_field: "state",
    },
    TableConfig {
        name: "sc_req_item",
        display_name: "Service Catalog Request Item",
        number_prefix: Some("RITM"),
        priority_field: Some("priority"),
        state_field: "state",
    },
    TableConfig {
        name: "universal_request",
        display_name: "Universal Request",
        number_prefix: Some("UR"),
        priority_field: Some("priority"),
        state_field: "state",
    },
    TableConfig {
        name: "kb_knowledge",
        display_name: "Knowledge Base Article",
        number_prefix: Some("KB"),
        priority_field: None,
        state_field: "state",
    },
    TableConfig {
        name: "vtb_task",
        display_name: "Private Task",
        number_prefix: Some("VTB"),
        priority_field: Some("priority"),
        state_field: "state",
    },
    TableConfig {
        name: "task_sla",
        display_name: "Task SLA",
        number_prefix: None,
        priority_field: None,
        state_field: "stage",
    },
];

/// Look up the configuration for a table, if it is known.
pub fn table_config(name: &str) -> Option<&'static TableConfig> {
    TABLE_CONFIGS.iter().find(|config| config.name == name)
}

/// The compact field set returned by default queries.
pub fn essential_fields(table: &str) -> Option<&'static [&'static str]> {
    let fields: &[&str] = match table {
        "incident" => &[
            "number",
            "short_description",
            "priority",
            "state",
            "category",
            "sys_created_on",
        ],
        "change_request" | "universal_request" | "vtb_task" => &[
            "number",
            "short_description",
            "priority",
            "state",
            "sys_created_on",
        ],
        "kb_knowledge" => &[
            "number",
            "short_description",
            "kb_category",
            "state",
            "sys_created_on",
        ],
        "task_sla" => &[
            "task",
            "sla",
            "stage",
            "business_percentage",
            "active",
            "sys_created_on",
        ],
        _ => return None,
    };
    Some(fields)
}

/// The expanded field set returned by detail queries.
pub fn detail_fields(table: &str) -> Option<&'static [&'static str]> {
    let fields: &[&str] = match table {
        "incident" => &[
            "number",
            "short_description",
            "description",
            "priority",
            "state",
            "category",
            "sys_created_on",
            "assigned_to",
            "assignment_group",
            "work_notes",
            "comments",
            "u_reference_1",
            "company",
            "cmdb_ci",
            "correlation_id",
            "major_incident_state",
        ],
        "change_request" => &[
            "number",
            "short_description",
            "description",
            "priority",
            "state",
            "sys_created_on",
            "assigned_to",
            "assignment_group",
            "work_notes",
            "comments",
            "u_reference_1",
            "company",
            "cmdb_ci",
        ],
        "universal_request" => &[
            "number",
            "short_description",
            "priority",
            "state",
            "sys_created_on",
            "assigned_to",
            "assignment_group",
            "comments",
            "u_reference_1",
            "company",
            "cmdb_ci",
        ],
        "kb_knowledge" => &[
            "number",
            "short_description",
            "text",
            "kb_category",
            "state",
            "sys_created_on",
            "assigned_to",
        ],
        "vtb_task" => &[
            "number",
            "short_description",
            "priority",
            "state",
            "sys_created_on",
            "assigned_to",
            "assignment_group",
            "work_notes",
            "comments",
        ],
        "task_sla" => &[
            "task",
            "sla",
            "stage",
            "business_percentage",
            "active",
            "sys_created_on",
            "breach_time",
            "business_time_left",
            "duration",
            "has_breached",
            "business_duration",
            "business_elapsed_time",
            "planned_end_time",
        ],
        _ => return None,
    };
    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_table_has_config() {
        let config = table_config("incident").expect("incident config");
        assert_eq!(config.number_prefix, Some("INC"));
        assert_eq!(config.priority_field, Some("priority"));
    }

    #[test]
    fn unknown_table_has_no_config() {
        assert!(table_config("cmdb_ci_server").is_none());
    }

    #[test]
    fn kb_knowledge_has_no_priority_field() {
        let config = table_config("kb_knowledge").expect("kb config");
        assert!(config.priority_field.is_none());
    }

    #[test]
    fn essential_fields_are_a_subset_of_detail_fields() {
        for table in ["incident", "change_request", "vtb_task", "task_sla"] {
            let essential = essential_fields(table).unwrap();
            let detail = detail_fields(table).unwrap();
            for field in essential {
                assert!(detail.contains(field), "{table}: {field} missing from detail");
            }
        }
    }
}
