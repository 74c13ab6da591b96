//! Item catalog: id-to-title lookup used to resolve collaborative results
//! and to list the items a model was trained on.

use std::collections::HashMap;

use recsys_core::{canonical_id, Item};
use serde::{Deserialize, Serialize};

/// Resolves an item id to its display title.
pub trait CatalogLookup: Send + Sync {
    fn title(&self, item_id: &str) -> Option<&str>;
}

impl CatalogLookup for HashMap<String, String> {
    fn title(&self, item_id: &str) -> Option<&str> {
        self.get(item_id).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub item_id: String,
    pub title: String,
}

/// Catalog built from the item dataset. When an id repeats, the last row wins.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    positions: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_items(items: &[Item]) -> Self {
        let entries: Vec<CatalogEntry> = dedup_keep_last(items)
            .into_iter()
            .map(|item| CatalogEntry {
                item_id: item.item_id,
                title: item.title,
            })
            .collect();
        let positions = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.item_id.clone(), i))
            .collect();
        Self { entries, positions }
    }

    /// Entries in dataset order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, item_id: &str) -> Option<&CatalogEntry> {
        self.positions
            .get(&canonical_id(item_id))
            .map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CatalogLookup for Catalog {
    fn title(&self, item_id: &str) -> Option<&str> {
        self.get(item_id).map(|e| e.title.as_str())
    }
}

/// Canonicalize item ids and keep only the last occurrence of each.
/// Survivors stay in input order.
pub fn dedup_keep_last(items: &[Item]) -> Vec<Item> {
    let ids: Vec<String> = items.iter().map(|i| canonical_id(&i.item_id)).collect();
    let mut last: HashMap<&str, usize> = HashMap::with_capacity(items.len());
    for (i, id) in ids.iter().enumerate() {
        last.insert(id.as_str(), i);
    }
    items
        .iter()
        .zip(&ids)
        .enumerate()
        .filter(|(i, (_, id))| last.get(id.as_str()) == Some(i))
        .map(|(_, (item, id))| Item {
            item_id: id.clone(),
            ..item.clone()
        })
        .collect()
}
