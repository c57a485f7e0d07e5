//! Final combination of code-based and alias-based match groups.

use std::collections::HashSet;

use crate::domain::{ExportedItem, GroupId, MatchContext};

/// Combines both group sets into the final disjoint result.
///
/// Code groups come first, in creation order, then alias groups. A group is
/// kept only if it shares no (source, record id) member with a group already
/// kept, so the output never places one record in two groups: identical
/// duplicates (an alias group that equals a code group, or two codes linking
/// the same record pair) collapse to the first occurrence.
pub fn merge_groups(
    ctx: &MatchContext,
    code_groups: &[GroupId],
    alias_groups: &[GroupId],
) -> Vec<GroupId> {
    let mut kept: Vec<GroupId> = Vec::new();
    let mut kept_ids: HashSet<GroupId> = HashSet::new();
    let mut claimed: HashSet<(String, String)> = HashSet::new();

    for &gid in code_groups.iter().chain(alias_groups) {
        if kept_ids.contains(&gid) {
            continue;
        }
        let members = ctx.member_keys(gid);
        if members.iter().any(|key| claimed.contains(key)) {
            continue;
        }
        claimed.extend(members);
        kept_ids.insert(gid);
        kept.push(gid);
    }

    kept
}

/// Projects each surviving group into the minimal output shape. No derived
/// fields leave the core.
pub fn export_groups(ctx: &MatchContext, groups: &[GroupId]) -> Vec<Vec<ExportedItem>> {
    groups
        .iter()
        .map(|&gid| {
            ctx.groups[gid]
                .members
                .iter()
                .map(|&item_id| {
                    let item = &ctx.items[item_id];
                    ExportedItem {
                        source: item.source.clone(),
                        id: item.id.clone(),
                        code: item.code.clone(),
                        display_name: item.display_name.clone(),
                    }
                })
                .collect()
        })
        .collect()
}
