//! Exact matching of items across sources by global product code.

use std::collections::HashMap;

use crate::domain::{GroupId, MatchContext};
use crate::pipeline::processing::expand::SourceItems;

/// Groups produced by code matching, in creation order.
#[derive(Debug, Default)]
pub struct CodeMatches {
    pub groups: Vec<GroupId>,
}

/// Links items across sources that share a global product code.
///
/// Sources are processed in the given order. A code already carrying a group
/// gets the new item appended; otherwise all previously processed sources are
/// scanned for the code and the first hit seeds a two-member group. Any two
/// items across any two sources sharing a code therefore always end up in the
/// same group, whichever of them arrives first.
pub fn combine_by_code(ctx: &mut MatchContext, sources: &[SourceItems]) -> CodeMatches {
    let mut code_groups: HashMap<String, GroupId> = HashMap::new();
    let mut matches = CodeMatches::default();
    let mut processed: Vec<usize> = Vec::new();

    for (source_idx, source) in sources.iter().enumerate() {
        for (code, item_id) in source.coded_entries(ctx) {
            if let Some(&gid) = code_groups.get(&code) {
                ctx.append_to_group(gid, item_id);
                continue;
            }

            // First pairing for this code: scan everything seen so far
            for &prev_idx in &processed {
                if let Some(&prev_id) = sources[prev_idx].by_code.get(&code) {
                    let gid = ctx.new_group(vec![prev_id, item_id]);
                    code_groups.insert(code.clone(), gid);
                    matches.groups.push(gid);
                    break;
                }
            }
        }
        processed.push(source_idx);
    }

    matches
}
