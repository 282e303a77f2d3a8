//! Transport seam and the bounded paginated executor.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{QueryError, QueryResult};

/// One opaque record as returned by the store: field name to display value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Default total-result budget for one paginated fetch.
pub const DEFAULT_MAX_RESULTS: usize = 100;
/// Default per-request page size.
pub const DEFAULT_PAGE_SIZE: usize = 250;

const HTTP_TIMEOUT_SECS: u64 = 30;

/// One page of records from the store. A response without a `result` key
/// deserializes to an empty page, which the executor reads as exhaustion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub result: Vec<Record>,
}

/// The transport collaborator. `Ok(None)` and an empty page both mean
/// "no data"; transport-level failure is an `Err(Transport)` so callers
/// can tell it apart from a legitimately empty result set.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch(&self, url: &str) -> QueryResult<Option<RecordPage>>;
}

/// reqwest-backed transport. Authentication and base-URL resolution are
/// the caller's concern: pass a pre-configured client when the instance
/// needs credentials attached.
pub struct HttpRecordStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordStore {
    pub fn new(base_url: impl Into<String>) -> QueryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| QueryError::Transport(format!("failed to build http client: {e}")))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn fetch(&self, url: &str) -> QueryResult<Option<RecordPage>> {
        let full_url = format!("{}{url}", self.base_url);
        let response = self
            .client
            .get(&full_url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| QueryError::Transport(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("store answered {status} for {full_url}");
            return Err(QueryError::Transport(format!(
                "store answered {status}"
            )));
        }

        let page: RecordPage = response
            .json()
            .await
            .map_err(|e| QueryError::Transport(format!("malformed response body: {e}")))?;
        Ok(Some(page))
    }
}

/// Build the table API path: fields, optional display values, and the
/// already-encoded query. An empty query omits the parameter entirely.
pub fn table_url(table: &str, fields: &[&str], encoded_query: &str, display_value: bool) -> String {
    let mut url = format!("/api/now/table/{table}?sysparm_fields={}", fields.join(","));
    if display_value {
        url.push_str("&sysparm_display_value=true");
    }
    if !encoded_query.is_empty() {
        url.push_str("&sysparm_query=");
        url.push_str(encoded_query);
    }
    url
}

/// Fetch up to `max_results` records by issuing successive page requests.
///
/// Stops on a missing or empty page, after a short page (end of data), or
/// once the budget is met; otherwise advances the offset by `page_size`.
/// Pages are requested one at a time — the next offset depends on the
/// previous page's length. No retries; a transport error propagates.
pub async fn fetch_paginated(
    store: &dyn RecordStore,
    url: &str,
    max_results: usize,
    page_size: usize,
) -> QueryResult<Vec<Record>> {
    let mut all_results: Vec<Record> = Vec::new();
    let mut offset = 0usize;

    while all_results.len() < max_results {
        let paginated = format!("{url}&sysparm_offset={offset}&sysparm_limit={page_size}");
        let page = match store.fetch(&paginated).await? {
            Some(page) => page,
            None => break,
        };
        if page.result.is_empty() {
            break;
        }

        let short_page = page.result.len() < page_size;
        all_results.extend(page.result);
        if short_page {
            break;
        }
        offset += page_size;
    }

    all_results.truncate(max_results);
    Ok(all_results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted transport: hands out queued responses in order and
    /// records every requested URL.
    struct ScriptedStore {
        responses: Mutex<Vec<QueryResult<Option<RecordPage>>>>,
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedStore {
        fn new(responses: Vec<QueryResult<Option<RecordPage>>>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RecordStore for ScriptedStore {
        async fn fetch(&self, url: &str) -> QueryResult<Option<RecordPage>> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Ok(Some(RecordPage::default())))
        }
    }

    fn records(count: usize) -> Vec<Record> {
        (0..count)
            .map(|i| {
                let mut record = Record::new();
                record.insert("number".to_string(), format!("INC{i:07}").into());
                record
            })
            .collect()
    }

    fn page(count: usize) -> QueryResult<Option<RecordPage>> {
        Ok(Some(RecordPage {
            result: records(count),
        }))
    }

    #[tokio::test]
    async fn full_pages_stop_at_budget() {
        // Pages of 25 forever: a budget of 100 takes exactly 4 requests.
        let store = ScriptedStore::new(vec![page(25), page(25), page(25), page(25), page(25)]);
        let results = fetch_paginated(&store, "/api/now/table/incident?x=1", 100, 25)
            .await
            .expect("fetch");
        assert_eq!(results.len(), 100);
        assert_eq!(store.request_count(), 4);
    }

    #[tokio::test]
    async fn overshooting_page_is_truncated_in_one_request() {
        let store = ScriptedStore::new(vec![page(250)]);
        let results = fetch_paginated(&store, "/t?x=1", 100, 250).await.expect("fetch");
        assert_eq!(results.len(), 100);
        assert_eq!(store.request_count(), 1);
    }

    #[tokio::test]
    async fn short_page_stops_without_extra_request() {
        let store = ScriptedStore::new(vec![page(250), page(40)]);
        let results = fetch_paginated(&store, "/t?x=1", 1000, 250).await.expect("fetch");
        assert_eq!(results.len(), 290);
        assert_eq!(store.request_count(), 2);
    }

    #[tokio::test]
    async fn empty_page_yields_empty_batch() {
        let store = ScriptedStore::new(vec![page(0)]);
        let results = fetch_paginated(&store, "/t?x=1", 100, 250).await.expect("fetch");
        assert!(results.is_empty());
        assert_eq!(store.request_count(), 1);
    }

    #[tokio::test]
    async fn missing_response_yields_empty_batch() {
        let store = ScriptedStore::new(vec![Ok(None)]);
        let results = fetch_paginated(&store, "/t?x=1", 100, 250).await.expect("fetch");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn offsets_advance_by_page_size() {
        let store = ScriptedStore::new(vec![page(50), page(50), page(10)]);
        fetch_paginated(&store, "/t?x=1", 1000, 50).await.expect("fetch");
        let requests = store.requests.lock().unwrap();
        assert!(requests[0].contains("sysparm_offset=0&sysparm_limit=50"));
        assert!(requests[1].contains("sysparm_offset=50&sysparm_limit=50"));
        assert!(requests[2].contains("sysparm_offset=100&sysparm_limit=50"));
    }

    #[tokio::test]
    async fn transport_error_propagates() {
        let store = ScriptedStore::new(vec![Err(QueryError::Transport("boom".to_string()))]);
        let err = fetch_paginated(&store, "/t?x=1", 100, 250)
            .await
            .expect_err("expected error");
        assert!(matches!(err, QueryError::Transport(_)));
    }

    #[tokio::test]
    async fn mid_stream_transport_error_propagates() {
        let store = ScriptedStore::new(vec![
            page(250),
            Err(QueryError::Transport("boom".to_string())),
        ]);
        let err = fetch_paginated(&store, "/t?x=1", 1000, 250)
            .await
            .expect_err("expected error");
        assert!(matches!(err, QueryError::Transport(_)));
    }

    #[test]
    fn table_url_shapes() {
        assert_eq!(
            table_url("incident", &["number", "state"], "", false),
            "/api/now/table/incident?sysparm_fields=number,state"
        );
        assert_eq!(
            table_url("incident", &["number"], "state=1", true),
            "/api/now/table/incident?sysparm_fields=number&sysparm_display_value=true&sysparm_query=state=1"
        );
    }

    #[test]
    fn page_without_result_key_is_empty() {
        let page: RecordPage = serde_json::from_str("{}").expect("deserialize");
        assert!(page.result.is_empty());
    }
}
