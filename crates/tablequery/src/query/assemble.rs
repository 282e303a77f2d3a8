//! Query assembly: dispatch every filter entry, AND-join the fragments,
//! apply the exclusion policy, and encode for transport.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::policy::ExclusionPolicy;

use super::condition::build_condition;

/// Characters the store's query grammar depends on; they must survive
/// transport encoding unescaped.
const PRESERVED: &[u8] = b"=<>&^():@!";

/// An ordered field -> value mapping. Keys are unique; insertion order is
/// preserved so the assembled query is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterMap {
    entries: Vec<(String, String)>,
}

impl FilterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a filter. Re-inserting a key overwrites its value in place,
    /// keeping the key's original position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(f, _)| *f == field) {
            entry.1 = value;
        } else {
            self.entries.push((field, value));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, v)| (f.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn from_pairs<I, F, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (field, value) in pairs {
            map.insert(field, value);
        }
        map
    }
}

impl Serialize for FilterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// Turns a [`FilterMap`] into one encoded query string. The exclusion
/// policy is applied downstream of all caller input, so caller-supplied
/// filters cannot displace it.
#[derive(Debug, Clone)]
pub struct QueryAssembler {
    policy: ExclusionPolicy,
}

impl QueryAssembler {
    pub fn new(policy: ExclusionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ExclusionPolicy {
        &self.policy
    }

    /// Assemble and encode the query for `table`. An empty mapping yields
    /// an empty string unless the policy adds exclusions for this table.
    pub fn assemble(&self, table: &str, filters: &FilterMap) -> String {
        let joined = filters
            .iter()
            .map(|(field, value)| build_condition(field, value))
            .collect::<Vec<_>>()
            .join("^");
        self.finish(table, joined)
    }

    /// Apply the policy and encoding to an already-built query fragment.
    /// Used by operations that construct their base condition directly
    /// (text search, number lookup, priority queries).
    pub fn assemble_raw(&self, table: &str, query: impl Into<String>) -> String {
        self.finish(table, query.into())
    }

    fn finish(&self, table: &str, query: String) -> String {
        let query = self.policy.apply_category_filter(table, &query);
        let query = self.policy.apply_catalog_filter(table, &query);
        encode_query(&query)
    }
}

/// Percent-encode a query string, leaving alphanumerics, `-._~`, and the
/// store grammar characters intact.
pub fn encode_query(query: &str) -> String {
    let mut encoded = String::with_capacity(query.len());
    for &byte in query.as_bytes() {
        let keep = byte.is_ascii_alphanumeric()
            || matches!(byte, b'-' | b'.' | b'_' | b'~')
            || PRESERVED.contains(&byte);
        if keep {
            encoded.push(byte as char);
        } else {
            encoded.push('%');
            encoded.push_str(&format!("{byte:02X}"));
        }
    }
    encoded
}
