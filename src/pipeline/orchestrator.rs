//! Ordered execution of the matching stages over a fixed source sequence.

use serde::Serialize;
use tracing::{debug, warn};

use crate::common::error::Result;
use crate::config::{InvalidRecordPolicy, MatcherConfig};
use crate::domain::{ExportedItem, MatchContext, SourceRecord};
use crate::pipeline::processing::alias::combine_by_alias;
use crate::pipeline::processing::brands::cluster_brands;
use crate::pipeline::processing::exact::combine_by_code;
use crate::pipeline::processing::expand::SourceItems;
use crate::pipeline::processing::merge::{export_groups, merge_groups};
use crate::pipeline::processing::normalize::ItemNormalizer;
use crate::pipeline::processing::size::parse_size;

/// One source catalog, already parsed into canonical records by its
/// (external) per-source parser. Callers pass catalogs in the order they
/// should be processed; matching output depends on that order.
#[derive(Debug, Clone)]
pub struct SourceCatalog {
    pub name: String,
    pub records: Vec<SourceRecord>,
}

/// Diagnostic counters of one run, suitable for logging.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchStats {
    /// Items loaded per source, in processing order (after code expansion)
    pub items_loaded: Vec<(String, usize)>,
    /// Records dropped by the invalid-record policy
    pub records_skipped: usize,
    /// Groups formed by exact code matching
    pub combined_by_code: usize,
    /// Distinct brand spellings registered after clustering
    pub unique_brands: usize,
    /// Groups touched by alias matching
    pub combined_by_alias: usize,
    /// Groups in the final merged result
    pub final_groups: usize,
}

/// Final result of one run.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub groups: Vec<Vec<ExportedItem>>,
    pub stats: MatchStats,
}

/// The matching/clustering engine.
///
/// All state is run-scoped: each call to [`run`](Self::run) starts fresh, so
/// the pipeline is reentrant and deterministic given a fixed source order.
pub struct MatchPipeline {
    config: MatcherConfig,
}

impl MatchPipeline {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, catalogs: &[SourceCatalog]) -> Result<MatchOutcome> {
        let normalizer = ItemNormalizer::new(&self.config.brand_stop_words);
        let mut ctx = MatchContext::default();
        let mut sources: Vec<SourceItems> = Vec::with_capacity(catalogs.len());
        let mut stats = MatchStats::default();

        // Normalize and expand every source before any matching begins
        for catalog in catalogs {
            let mut source_items = SourceItems::new(&catalog.name);
            for record in &catalog.records {
                let size = record.size.as_deref().map(parse_size).unwrap_or_default();
                match normalizer.normalize(&catalog.name, record, &size) {
                    Ok(item) => source_items.expand(&mut ctx, item),
                    Err(err) => match self.config.on_invalid_record {
                        InvalidRecordPolicy::Skip => {
                            warn!("skipping record in source `{}`: {}", catalog.name, err);
                            stats.records_skipped += 1;
                        }
                        InvalidRecordPolicy::Fail => return Err(err),
                    },
                }
            }
            debug!(
                "{} parsed: {} items loaded",
                catalog.name,
                source_items.items.len()
            );
            stats
                .items_loaded
                .push((catalog.name.clone(), source_items.items.len()));
            sources.push(source_items);
        }

        // Exact matching by code
        let code_matches = combine_by_code(&mut ctx, &sources);
        debug!("{} items combined by code", code_matches.groups.len());
        stats.combined_by_code = code_matches.groups.len();

        // Brand clustering, then fuzzy alias matching within clusters
        let clusters = cluster_brands(&ctx, &sources, self.config.brand_similarity_threshold);
        debug!(
            "{} unique brands found after matching with {}% threshold",
            clusters.spelling_count(),
            self.config.brand_similarity_threshold
        );
        stats.unique_brands = clusters.spelling_count();

        let alias_groups = combine_by_alias(
            &mut ctx,
            &sources,
            &clusters,
            self.config.alias_similarity_threshold,
        )?;
        debug!(
            "{} items combined by name with {}% threshold",
            alias_groups.len(),
            self.config.alias_similarity_threshold
        );
        stats.combined_by_alias = alias_groups.len();

        // Merge both group sets and project the output shape
        let final_groups = merge_groups(&ctx, &code_matches.groups, &alias_groups);
        let groups = export_groups(&ctx, &final_groups);
        stats.final_groups = groups.len();
        debug!("{} groups prepared as result list", groups.len());

        Ok(MatchOutcome { groups, stats })
    }
}
