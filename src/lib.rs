//! Entity-resolution engine for heterogeneous product catalogs.
//!
//! Given N source catalogs with inconsistent schemas, naming conventions and
//! identifiers, the pipeline links records that denote the same real-world
//! product: exact matching by global product code first, then fuzzy matching
//! of brand spellings and de-branded/de-sized product names.

pub mod common;
pub mod config;
pub mod domain;
pub mod observability;
pub mod pipeline;

// Re-export the types callers need to drive a run
pub use common::error::{MatcherError, Result};
pub use config::{InvalidRecordPolicy, MatcherConfig};
pub use domain::{ExportedItem, SourceRecord};
pub use pipeline::orchestrator::{MatchOutcome, MatchPipeline, MatchStats, SourceCatalog};
