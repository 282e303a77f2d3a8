use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// The one table whose category exclusions are enforced.
const CATEGORY_FILTER_TABLE: &str = "incident";

/// Immutable exclusion policy enforced at the query layer.
///
/// The policy is loaded once and injected into the assembler; query
/// execution never mutates it. Both filters append `!=` fragments after
/// all caller-supplied conditions, so a crafted filter value cannot
/// remove or reorder them — only the toggles can switch them off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionPolicy {
    /// Toggle for the incident category filter.
    pub category_filtering_enabled: bool,
    /// Category names hidden from incident results.
    pub excluded_categories: Vec<String>,
    /// Toggle for the service-catalog filter.
    pub catalog_filtering_enabled: bool,
    /// Catalog titles hidden from catalog-table results.
    pub excluded_catalog_titles: Vec<String>,
    /// Assignment-group names hidden from catalog-table results.
    pub excluded_assignment_groups: Vec<String>,
    /// Tables the catalog filter applies to.
    pub catalog_tables: Vec<String>,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self {
            category_filtering_enabled: true,
            excluded_categories: vec![
                "Payroll".to_string(),
                "People Support".to_string(),
                "Workplace".to_string(),
            ],
            catalog_filtering_enabled: true,
            excluded_catalog_titles: vec!["People_Pay".to_string()],
            excluded_assignment_groups: vec![
                "Payroll Managers".to_string(),
                "Payroll Representatives".to_string(),
                "Payroll Specialists".to_string(),
                "People Business Partners".to_string(),
                "People Business Partners - SGSC".to_string(),
                "People Knowledge Approvers".to_string(),
                "People Support Tier 1".to_string(),
                "People Support Tier 2".to_string(),
                "People Technology Team".to_string(),
                "Talent Acquisition".to_string(),
                "SG_Benefits Allowed Variable View".to_string(),
            ],
            catalog_tables: vec![
                "sc_request".to_string(),
                "sc_req_item".to_string(),
                "sc_task".to_string(),
            ],
        }
    }
}

impl ExclusionPolicy {
    /// A policy with both filters switched off. Intended for tests and
    /// deployments without data-protection requirements.
    pub fn disabled() -> Self {
        Self {
            category_filtering_enabled: false,
            catalog_filtering_enabled: false,
            ..Self::default()
        }
    }

    /// Load a policy from a JSON file.
    pub fn from_json_file(path: &Path) -> QueryResult<Self> {
        let data = std::fs::read_to_string(path).map_err(|error| {
            QueryError::Config(format!(
                "failed to read exclusion policy {}: {error}",
                path.display()
            ))
        })?;
        let policy: ExclusionPolicy = serde_json::from_str(&data).map_err(|error| {
            QueryError::Config(format!(
                "failed to parse exclusion policy {}: {error}",
                path.display()
            ))
        })?;
        tracing::info!("loaded exclusion policy from {}", path.display());
        Ok(policy)
    }

    /// Append category exclusions to `existing` when querying the
    /// incident table. Other tables pass through untouched.
    pub fn apply_category_filter(&self, table: &str, existing: &str) -> String {
        if table != CATEGORY_FILTER_TABLE || !self.category_filtering_enabled {
            return existing.to_string();
        }
        let fragments: Vec<String> = self
            .excluded_categories
            .iter()
            .map(|category| format!("category!={category}"))
            .collect();
        join_onto(existing, &fragments)
    }

    /// Append catalog-title and assignment-group exclusions to `existing`
    /// when querying one of the catalog tables.
    pub fn apply_catalog_filter(&self, table: &str, existing: &str) -> String {
        if !self.catalog_filtering_enabled || !self.catalog_tables.iter().any(|t| t == table) {
            return existing.to_string();
        }
        let mut fragments: Vec<String> = self
            .excluded_catalog_titles
            .iter()
            .map(|title| format!("cat_item.sc_catalogs.title!={title}"))
            .collect();
        fragments.extend(
            self.excluded_assignment_groups
                .iter()
                .map(|group| format!("assignment_group.name!={group}")),
        );
        join_onto(existing, &fragments)
    }
}

fn join_onto(existing: &str, fragments: &[String]) -> String {
    let appended = fragments.join("^");
    if appended.is_empty() {
        existing.to_string()
    } else if existing.is_empty() {
        appended
    } else {
        format!("{existing}^{appended}")
    }
}
