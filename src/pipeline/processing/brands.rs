//! Greedy online clustering of brand-name spellings within and across sources.

use std::collections::HashMap;

use crate::domain::{ItemId, MatchContext};
use crate::pipeline::processing::expand::SourceItems;
use crate::pipeline::processing::similarity::token_set_ratio;

/// Clusters of brand spellings considered the same brand.
///
/// Every spelling ever seen maps to its cluster, so two merged spellings are
/// indistinguishable downstream: both resolve to the same item pool.
#[derive(Debug, Default)]
pub struct BrandClusters {
    /// Cluster id -> the merged item pool of every spelling in the cluster
    clusters: Vec<Vec<ItemId>>,
    /// Spelling -> cluster id, for exact hits and pool lookup
    index: HashMap<String, usize>,
    /// Every registered spelling, in registration order (the scan order for
    /// fuzzy matching, which makes ties deterministic: first wins)
    spellings: Vec<String>,
}

impl BrandClusters {
    /// The full item pool of the cluster this spelling belongs to.
    pub fn pool(&self, spelling: &str) -> Option<&[ItemId]> {
        self.index
            .get(spelling)
            .map(|&cid| self.clusters[cid].as_slice())
    }

    /// Number of distinct spellings registered.
    pub fn spelling_count(&self) -> usize {
        self.spellings.len()
    }

    fn start_cluster(&mut self, spelling: String, items: Vec<ItemId>) {
        let cid = self.clusters.len();
        self.clusters.push(items);
        self.index.insert(spelling.clone(), cid);
        self.spellings.push(spelling);
    }

    fn merge_into(&mut self, cid: usize, spelling: String, items: Vec<ItemId>) {
        self.clusters[cid].extend(items);
        if !self.index.contains_key(&spelling) {
            self.index.insert(spelling.clone(), cid);
            self.spellings.push(spelling);
        }
    }
}

/// Buckets each source's items by cleaned brand, then greedily clusters the
/// (source, brand, items) triples in processing order.
///
/// This is greedy, order-dependent and non-transitive on purpose: once a
/// spelling's best match is decided it is never revisited, even if a later
/// spelling would have been more central.
pub fn cluster_brands(
    ctx: &MatchContext,
    sources: &[SourceItems],
    threshold: u32,
) -> BrandClusters {
    let mut result = BrandClusters::default();

    for source in sources {
        for (brand, items) in bucket_by_brand(ctx, source) {
            // Exact spelling hit
            if let Some(&cid) = result.index.get(&brand) {
                result.clusters[cid].extend(items);
                continue;
            }

            if result.spellings.is_empty() {
                result.start_cluster(brand, items);
                continue;
            }

            // Best fuzzy hit over every registered spelling
            let mut best_score = 0;
            let mut best_cid = 0;
            for spelling in &result.spellings {
                let score = token_set_ratio(&brand, spelling);
                if score > best_score {
                    best_score = score;
                    best_cid = result.index[spelling.as_str()];
                }
            }

            if best_score >= threshold {
                result.merge_into(best_cid, brand, items);
            } else {
                result.start_cluster(brand, items);
            }
        }
    }

    result
}

/// One source's items grouped by brand spelling, first-seen order preserved.
fn bucket_by_brand(ctx: &MatchContext, source: &SourceItems) -> Vec<(String, Vec<ItemId>)> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<ItemId>> = HashMap::new();

    for &item_id in &source.items {
        let brand = &ctx.items[item_id].brand;
        match buckets.get_mut(brand.as_str()) {
            Some(bucket) => bucket.push(item_id),
            None => {
                order.push(brand.clone());
                buckets.insert(brand.clone(), vec![item_id]);
            }
        }
    }

    order
        .into_iter()
        .map(|brand| {
            let items = buckets.remove(&brand).unwrap_or_default();
            (brand, items)
        })
        .collect()
}
