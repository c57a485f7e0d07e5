use serde::{Deserialize, Serialize};

/// Index into [`MatchContext::items`].
pub type ItemId = usize;

/// Index into [`MatchContext::groups`].
pub type GroupId = usize;

/// A raw record from one source catalog, already mapped into the canonical
/// field shape by that source's parser. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Source-local identifier (required)
    pub id: String,
    /// Display name (required)
    pub name: String,
    /// Raw brand text, if the source carries one
    #[serde(default)]
    pub brand: Option<String>,
    /// Free-text size field, e.g. "250 ml"
    #[serde(default)]
    pub size: Option<String>,
    /// Global product codes (barcodes) associated with this record
    #[serde(default)]
    pub codes: Vec<String>,
    /// The original unmodified record, retained for traceability only
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// One matchable copy of a source record.
///
/// A record with k codes yields k copies, identical except for `code`; a
/// record with no codes yields a single codeless copy that still takes part
/// in alias matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedItem {
    /// Name of the owning source catalog
    pub source: String,
    /// Source-local record identifier
    pub id: String,
    /// The one global product code this copy is keyed by
    pub code: Option<String>,
    /// Cleaned brand text, or the literal "other" bucket when too short
    pub brand: String,
    /// Original display name, unmodified
    pub display_name: String,
    /// Canonical "<amount> <unit>" string; empty when the size was absent
    pub weight_key: String,
    /// Lowercased name with brand and size substrings stripped out
    pub alias: String,
    /// Full code set of the source record, kept for expansion
    pub codes: Vec<String>,
    /// Back-reference to the match group this copy was merged into
    pub group: Option<GroupId>,
}

/// A set of items across sources believed to denote the same product.
/// Append-only during a run; members are never removed.
#[derive(Debug, Clone, Default)]
pub struct MatchGroup {
    pub members: Vec<ItemId>,
}

/// Arena owning every item and group of one run.
///
/// Shared "every member sees the full current membership" semantics are
/// expressed as integer group ids plus a `group` back-reference on each item,
/// rather than shared mutable lists.
#[derive(Debug, Default)]
pub struct MatchContext {
    pub items: Vec<NormalizedItem>,
    pub groups: Vec<MatchGroup>,
}

impl MatchContext {
    pub fn add_item(&mut self, item: NormalizedItem) -> ItemId {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Creates a group from the given members and points each of them at it.
    pub fn new_group(&mut self, members: Vec<ItemId>) -> GroupId {
        let gid = self.groups.len();
        for &item_id in &members {
            self.items[item_id].group = Some(gid);
        }
        self.groups.push(MatchGroup { members });
        gid
    }

    /// Appends an item to an existing group and sets its back-reference.
    pub fn append_to_group(&mut self, gid: GroupId, item_id: ItemId) {
        self.groups[gid].members.push(item_id);
        self.items[item_id].group = Some(gid);
    }

    /// True when any current member of the group belongs to `source`.
    pub fn group_contains_source(&self, gid: GroupId, source: &str) -> bool {
        self.groups[gid]
            .members
            .iter()
            .any(|&id| self.items[id].source == source)
    }

    /// (source, record id) pairs of the group's current members.
    pub fn member_keys(&self, gid: GroupId) -> Vec<(String, String)> {
        self.groups[gid]
            .members
            .iter()
            .map(|&id| {
                let item = &self.items[id];
                (item.source.clone(), item.id.clone())
            })
            .collect()
    }
}

/// Minimal output projection of one group member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedItem {
    pub source: String,
    pub id: String,
    pub code: Option<String>,
    pub display_name: String,
}
