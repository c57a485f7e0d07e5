//! Expansion of normalized items into one matchable copy per product code.

use std::collections::HashMap;

use crate::domain::{ItemId, MatchContext, NormalizedItem};

/// One source catalog's expanded items plus its code-indexed view.
///
/// A duplicate code within one source overwrites the earlier entry in
/// `by_code` (exact duplicates inside a single catalog are a data-quality
/// issue, not a matching concern), but every copy stays in `items` so it can
/// still take part in alias matching.
#[derive(Debug)]
pub struct SourceItems {
    pub name: String,
    /// All copies, in record order
    pub items: Vec<ItemId>,
    /// Global product code -> the surviving copy keyed by it
    pub by_code: HashMap<String, ItemId>,
}

impl SourceItems {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            items: Vec::new(),
            by_code: HashMap::new(),
        }
    }

    /// Expands one normalized item: one copy per code, or a single codeless
    /// copy when the record carries no codes.
    pub fn expand(&mut self, ctx: &mut MatchContext, base: NormalizedItem) {
        if base.codes.is_empty() {
            let item_id = ctx.add_item(base);
            self.items.push(item_id);
            return;
        }

        let codes = base.codes.clone();
        for code in codes {
            let mut copy = base.clone();
            copy.code = Some(code.clone());
            let item_id = ctx.add_item(copy);
            self.items.push(item_id);
            self.by_code.insert(code, item_id);
        }
    }

    /// (code, item) pairs in insertion order, visiting only the copy that
    /// won the per-code last-write-wins slot.
    pub fn coded_entries(&self, ctx: &MatchContext) -> Vec<(String, ItemId)> {
        self.items
            .iter()
            .filter_map(|&item_id| {
                let code = ctx.items[item_id].code.as_deref()?;
                (self.by_code.get(code) == Some(&item_id))
                    .then(|| (code.to_string(), item_id))
            })
            .collect()
    }
}
