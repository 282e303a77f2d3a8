//! The intent-to-query compiler: grammars, rewriters, condition dispatch,
//! and assembly into one encoded query string.

pub mod assemble;
pub mod caller;
pub mod condition;
pub mod date;
pub mod priority;

pub use assemble::{encode_query, FilterMap, QueryAssembler};
pub use condition::{build_condition, COMPLETE_CALLER_EXCLUSION_FIELD, COMPLETE_QUERY_FIELD};
pub use date::{parse_date_range, DateRange};
