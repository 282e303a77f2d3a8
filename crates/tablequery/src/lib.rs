//! Intent-to-query compiler and paginated client for a tabular record
//! store.
//!
//! The crate turns loosely-structured filter intents — natural-language
//! date ranges, shorthand priority lists, caller exclusions, raw operator
//! expressions — into one encoded query string, enforces the configured
//! security exclusions on it, and executes it against the store's table
//! API with bounded pagination. [`facade::TableQuery`] is the entry point;
//! the layers underneath are usable on their own.

pub mod client;
pub mod error;
pub mod facade;
pub mod intent;
pub mod policy;
pub mod query;
pub mod tables;

pub use client::{fetch_paginated, HttpRecordStore, Record, RecordPage, RecordStore};
pub use error::{QueryError, QueryResult};
pub use facade::{Intelligence, QueryResponse, TableQuery};
pub use intent::{Intent, IntentResolver, KeywordExtractor};
pub use policy::ExclusionPolicy;
pub use query::{parse_date_range, DateRange, FilterMap, QueryAssembler};
