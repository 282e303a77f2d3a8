//! The table-query facade: composes the compiler, the exclusion policy,
//! and the paginated executor into the public operations.

use std::sync::Arc;

use serde::Serialize;

use crate::client::{fetch_paginated, table_url, Record, RecordStore, DEFAULT_PAGE_SIZE};
use crate::intent::{BasicKeywordExtractor, IntentResolver, KeywordExtractor, NoIntent};
use crate::policy::ExclusionPolicy;
use crate::query::priority::build_priority_filter;
use crate::query::{FilterMap, QueryAssembler};
use crate::tables;

pub const NO_RECORDS_FOUND: &str = "No records found.";
pub const RECORD_NOT_FOUND: &str = "Record not found.";
pub const NO_DESCRIPTION_FOUND: &str = "No description found.";
pub const NO_SIMILAR_RECORDS_FOUND: &str = "No similar records found (only exact match)";
pub const CONNECTION_ERROR: &str = "Connection error: Request failed";
pub const NO_VALID_PRIORITIES_ERROR: &str = "No valid priorities provided";

/// Result budget for text searches.
const TEXT_SEARCH_LIMIT: usize = 50;
/// Result budget for filtered and priority queries.
const FILTER_QUERY_LIMIT: usize = 100;
/// Confidence reported when an intelligent query degrades to keyword search.
const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Structured outcome of every facade operation. Either a `result`
/// sequence (possibly with a message) or an `error` string — faults never
/// cross this boundary as panics or raw errors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResponse {
    pub result: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intelligence: Option<Intelligence>,
}

impl QueryResponse {
    fn records(result: Vec<Record>, message: Option<String>) -> Self {
        Self {
            result,
            message,
            ..Self::default()
        }
    }

    fn empty(message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn failed(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Metadata attached to intelligent-query responses.
#[derive(Debug, Clone, Serialize)]
pub struct Intelligence {
    pub explanation: String,
    pub confidence: f64,
    pub suggestions: Vec<String>,
    pub filters_used: FilterMap,
}

/// Facade over one record store. Owns no mutable state: each operation
/// builds its own filters and page budget, so independent queries can run
/// concurrently without coordination.
pub struct TableQuery {
    store: Arc<dyn RecordStore>,
    assembler: QueryAssembler,
    keywords: Arc<dyn KeywordExtractor>,
    resolver: Arc<dyn IntentResolver>,
}

impl TableQuery {
    pub fn new(store: Arc<dyn RecordStore>, policy: ExclusionPolicy) -> Self {
        Self {
            store,
            assembler: QueryAssembler::new(policy),
            keywords: Arc::new(BasicKeywordExtractor),
            resolver: Arc::new(NoIntent),
        }
    }

    pub fn with_keyword_extractor(mut self, extractor: Arc<dyn KeywordExtractor>) -> Self {
        self.keywords = extractor;
        self
    }

    pub fn with_intent_resolver(mut self, resolver: Arc<dyn IntentResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    fn fields_for(&self, table: &str, detailed: bool) -> &'static [&'static str] {
        let fields = if detailed {
            tables::detail_fields(table)
        } else {
            tables::essential_fields(table)
        };
        fields.unwrap_or(tables::FALLBACK_FIELDS)
    }

    /// Search a table by text similarity: try each extracted keyword in
    /// order and return the first one that produces any records.
    pub async fn query_by_text(&self, table: &str, text: &str, detailed: bool) -> QueryResponse {
        let fields = self.fields_for(table, detailed);

        for keyword in self.keywords.extract(text) {
            let query = self
                .assembler
                .assemble_raw(table, format!("short_descriptionCONTAINS{keyword}"));
            let url = table_url(table, fields, &query, false);

            match fetch_paginated(self.store.as_ref(), &url, TEXT_SEARCH_LIMIT, DEFAULT_PAGE_SIZE)
                .await
            {
                Ok(results) if !results.is_empty() => {
                    let count = results.len();
                    let capped = if count == TEXT_SEARCH_LIMIT {
                        " (limited to 50)"
                    } else {
                        ""
                    };
                    return QueryResponse::records(
                        results,
                        Some(format!("Found {count} records matching '{keyword}'{capped}")),
                    );
                }
                Ok(_) => continue,
                Err(error) => return QueryResponse::failed(error.to_string()),
            }
        }
        QueryResponse::empty(NO_RECORDS_FOUND)
    }

    /// Fetch only the short description of one record.
    pub async fn record_description(&self, table: &str, number: &str) -> QueryResponse {
        let query = self.assembler.assemble_raw(table, format!("number={number}"));
        let url = table_url(table, &["short_description"], &query, false);
        self.single_record(&url).await
    }

    /// Fetch the detail field set of one record, with display values.
    pub async fn record_details(&self, table: &str, number: &str) -> QueryResponse {
        let fields = tables::detail_fields(table).unwrap_or(tables::FALLBACK_FIELDS);
        let query = self.assembler.assemble_raw(table, format!("number={number}"));
        let url = table_url(table, fields, &query, true);
        self.single_record(&url).await
    }

    async fn single_record(&self, url: &str) -> QueryResponse {
        match self.store.fetch(url).await {
            Ok(Some(page)) if !page.result.is_empty() => QueryResponse::records(page.result, None),
            Ok(_) => QueryResponse::empty(RECORD_NOT_FOUND),
            Err(error) => QueryResponse::failed(error.to_string()),
        }
    }

    /// Find records similar to an existing one by re-searching its own
    /// description, excluding the original record from the results.
    pub async fn find_similar(&self, table: &str, number: &str) -> QueryResponse {
        let description = self.record_description(table, number).await;
        if description.is_error() {
            return QueryResponse::empty(CONNECTION_ERROR);
        }

        let text = description
            .result
            .first()
            .and_then(|record| record.get("short_description"))
            .and_then(|value| value.as_str())
            .unwrap_or("")
            .trim()
            .to_string();
        if text.is_empty() {
            return QueryResponse::empty(NO_DESCRIPTION_FOUND);
        }

        let similar = self.query_by_text(table, &text, false).await;
        if similar.is_error() || similar.result.is_empty() {
            return similar;
        }

        let filtered: Vec<Record> = similar
            .result
            .into_iter()
            .filter(|record| {
                record.get("number").and_then(|value| value.as_str()) != Some(number)
            })
            .collect();

        if filtered.is_empty() {
            return QueryResponse::empty(NO_SIMILAR_RECORDS_FOUND);
        }
        let count = filtered.len();
        QueryResponse::records(
            filtered,
            Some(format!("Found {count} similar records (excluding original record)")),
        )
    }

    /// Query a table through the full compiler pipeline: every filter
    /// entry is dispatched, security exclusions appended, and the result
    /// paginated under the default budget.
    pub async fn query_with_filters(
        &self,
        table: &str,
        filters: &FilterMap,
        fields: Option<&[String]>,
    ) -> QueryResponse {
        let query = self.assembler.assemble(table, filters);
        tracing::debug!("assembled query for {table}: {query}");

        let owned_fields: Vec<&str>;
        let fields: &[&str] = match fields {
            Some(fields) => {
                owned_fields = fields.iter().map(String::as_str).collect();
                &owned_fields
            }
            None => self.fields_for(table, false),
        };
        let url = table_url(table, fields, &query, true);

        match fetch_paginated(self.store.as_ref(), &url, FILTER_QUERY_LIMIT, DEFAULT_PAGE_SIZE)
            .await
        {
            Ok(results) if !results.is_empty() => QueryResponse::records(results, None),
            Ok(_) => QueryResponse::empty(NO_RECORDS_FOUND),
            Err(error) => QueryResponse::failed(error.to_string()),
        }
    }

    /// Query by priority for tables that support it. Configuration
    /// problems (unknown table, no priority field, no field catalog) come
    /// back as error payloads, not panics.
    pub async fn records_by_priority(
        &self,
        table: &str,
        priorities: &[String],
        additional_filters: Option<&FilterMap>,
        detailed: bool,
    ) -> QueryResponse {
        let supports_priority = tables::table_config(table)
            .map(|config| config.priority_field.is_some())
            .unwrap_or(false);
        if !supports_priority {
            return QueryResponse::failed(format!(
                "Table {table} does not support priority filtering"
            ));
        }

        let fields = if detailed {
            tables::detail_fields(table)
        } else {
            tables::essential_fields(table)
        };
        let Some(fields) = fields else {
            return QueryResponse::failed(format!(
                "No field configuration found for table {table}"
            ));
        };

        let priority_filter = build_priority_filter(priorities);
        if priority_filter.is_empty() {
            return QueryResponse::failed(NO_VALID_PRIORITIES_ERROR.to_string());
        }

        let mut parts = vec![priority_filter];
        if let Some(additional) = additional_filters {
            for (field, value) in additional.iter() {
                parts.push(format!("{field}={value}"));
            }
        }
        let query = self.assembler.assemble_raw(table, parts.join("^"));
        let url = table_url(table, fields, &query, true);

        match fetch_paginated(self.store.as_ref(), &url, FILTER_QUERY_LIMIT, DEFAULT_PAGE_SIZE)
            .await
        {
            Ok(results) if !results.is_empty() => {
                let count = results.len();
                let capped = if count == FILTER_QUERY_LIMIT {
                    " (limited to 100)"
                } else {
                    ""
                };
                QueryResponse::records(results, Some(format!("Found {count} records{capped}")))
            }
            Ok(_) => QueryResponse::empty(NO_RECORDS_FOUND),
            Err(error) => QueryResponse::failed(format!("Request failed: {error}")),
        }
    }

    /// Query from a natural-language phrase. Filters come from the intent
    /// resolver; when it produces none, or the filtered query finds
    /// nothing, the operation degrades to keyword search with a
    /// lowered-confidence explanation.
    pub async fn query_intelligently(&self, table: &str, phrase: &str) -> QueryResponse {
        let intent = self.resolver.resolve(phrase, table);

        if !intent.filters.is_empty() {
            let mut response = self.query_with_filters(table, &intent.filters, None).await;
            if !response.is_error() && !response.result.is_empty() {
                response.intelligence = Some(Intelligence {
                    explanation: intent.explanation,
                    confidence: intent.confidence,
                    suggestions: intent.suggestions,
                    filters_used: intent.filters,
                });
                return response;
            }
        }

        tracing::debug!("intelligent query for {table} falling back to keyword search");
        let mut fallback = self.query_by_text(table, phrase, false).await;
        fallback.intelligence = Some(Intelligence {
            explanation: format!("Fallback keyword search for: {phrase}"),
            confidence: FALLBACK_CONFIDENCE,
            suggestions: vec![
                "Try being more specific with priorities, dates, or states".to_string(),
            ],
            filters_used: FilterMap::new(),
        });
        fallback
    }
}
