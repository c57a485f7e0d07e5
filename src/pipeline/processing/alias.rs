//! Fuzzy matching of unlinked items by alias text within brand clusters.

use crate::common::error::{MatcherError, Result};
use crate::domain::{GroupId, ItemId, MatchContext};
use crate::pipeline::processing::brands::BrandClusters;
use crate::pipeline::processing::expand::SourceItems;
use crate::pipeline::processing::similarity::token_set_ratio;

/// Links items the code matcher left ungrouped by fuzzy alias similarity,
/// restricted to the item's brand cluster and weight bucket.
///
/// A candidate is eligible only when it comes from a different source and its
/// current group (if any) holds no item from the new item's source, so a
/// produced group never contains two items of the same catalog. Returns the
/// touched groups, each recorded once, in first-touch order.
pub fn combine_by_alias(
    ctx: &mut MatchContext,
    sources: &[SourceItems],
    clusters: &BrandClusters,
    threshold: u32,
) -> Result<Vec<GroupId>> {
    let mut result: Vec<GroupId> = Vec::new();

    for source in sources {
        for &item_id in &source.items {
            if ctx.items[item_id].group.is_some() {
                continue;
            }

            let (alias, brand, weight_key) = {
                let item = &ctx.items[item_id];
                (item.alias.clone(), item.brand.clone(), item.weight_key.clone())
            };

            let pool = clusters.pool(&brand).ok_or_else(|| {
                MatcherError::Invariant(format!(
                    "brand `{brand}` of source `{}` missing from cluster index",
                    source.name
                ))
            })?;

            // Best similarity over all eligible candidate aliases; ties keep
            // the earliest candidate.
            let mut best: Option<(u32, String)> = None;
            for &candidate in pool {
                if !eligible(ctx, candidate, &source.name, &weight_key) {
                    continue;
                }
                let score = token_set_ratio(&alias, &ctx.items[candidate].alias);
                if best.as_ref().map_or(true, |(top, _)| score > *top) {
                    best = Some((score, ctx.items[candidate].alias.clone()));
                }
            }

            let Some((best_score, best_alias)) = best else {
                continue; // no candidates at all
            };
            if best_score < threshold {
                continue; // best match not good enough
            }

            // Locate the first eligible candidate carrying that exact alias.
            // The similarity search just reported it, so failure here is a
            // logic bug, not bad data.
            let matched = pool
                .iter()
                .copied()
                .find(|&candidate| {
                    eligible(ctx, candidate, &source.name, &weight_key)
                        && ctx.items[candidate].alias == best_alias
                })
                .ok_or_else(|| {
                    MatcherError::Invariant(format!(
                        "best alias `{best_alias}` not found among eligible candidates \
                         of brand `{brand}`"
                    ))
                })?;

            let gid = match ctx.items[matched].group {
                Some(gid) => gid,
                None => ctx.new_group(vec![matched]),
            };
            ctx.append_to_group(gid, item_id);

            // A group may receive members from several sources but must
            // appear only once in the result list
            if !result.contains(&gid) {
                result.push(gid);
            }
        }
    }

    Ok(result)
}

/// Candidate filter: identical weight bucket, different source, and no group
/// already containing an item from the new item's source.
fn eligible(ctx: &MatchContext, candidate: ItemId, new_source: &str, weight_key: &str) -> bool {
    let item = &ctx.items[candidate];
    if item.source == new_source || item.weight_key != weight_key {
        return false;
    }
    match item.group {
        Some(gid) => !ctx.group_contains_source(gid, new_source),
        None => true,
    }
}
