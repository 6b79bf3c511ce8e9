// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{ContentItem, ItemId, MetaStore, StoreError};
use crate::meta::{DataValue, MetaEntry};
use log::error;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone)]
struct StoredItem {
    item: ContentItem,
    meta: Vec<MetaEntry>,
}

/// Item store kept in memory, for embedding hosts and tests.
#[derive(Clone, Default)]
pub struct MemoryItemStore {
    items: Arc<RwLock<BTreeMap<ItemId, StoredItem>>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_item(&self, item: ContentItem) {
        let Ok(mut items) = self.items.write() else {
            error!("🚨 CRITICAL: MemoryItemStore write lock poisoned in insert_item");
            return;
        };
        items.insert(
            item.id,
            StoredItem {
                item,
                meta: Vec::new(),
            },
        );
    }

    /// Appends a value to `key`, creating the entry when missing.
    /// Returns `false` when the item does not exist.
    pub fn add_meta(&self, id: ItemId, key: &str, value: impl Into<DataValue>) -> bool {
        let Ok(mut items) = self.items.write() else {
            error!("🚨 CRITICAL: MemoryItemStore write lock poisoned in add_meta");
            return false;
        };
        let Some(stored) = items.get_mut(&id) else {
            return false;
        };
        let value = value.into();
        match stored.meta.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.values.push(value),
            None => stored.meta.push(MetaEntry::new(key, vec![value])),
        }
        true
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<ItemId, StoredItem>>, StoreError> {
        self.items.read().map_err(|_| {
            error!("🚨 CRITICAL: MemoryItemStore read lock poisoned");
            StoreError::Invalid("item store lock poisoned".to_string())
        })
    }
}

impl MetaStore for MemoryItemStore {
    fn find_item(&self, id: ItemId) -> Result<Option<ContentItem>, StoreError> {
        Ok(self.read()?.get(&id).map(|stored| stored.item.clone()))
    }

    fn item_meta(&self, id: ItemId) -> Result<Vec<MetaEntry>, StoreError> {
        Ok(self
            .read()?
            .get(&id)
            .map(|stored| stored.meta.clone())
            .unwrap_or_default())
    }

    fn list_items(&self) -> Result<Vec<ContentItem>, StoreError> {
        Ok(self
            .read()?
            .values()
            .map(|stored| stored.item.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_meta_groups_values_by_key_in_insertion_order() {
        let store = MemoryItemStore::new();
        store.insert_item(ContentItem::new(ItemId(1), "post", "First"));
        assert!(store.add_meta(ItemId(1), "tags", "a"));
        assert!(store.add_meta(ItemId(1), "color", "red"));
        assert!(store.add_meta(ItemId(1), "tags", "b"));

        let meta = store.item_meta(ItemId(1)).expect("meta");
        assert_eq!(
            meta,
            vec![
                MetaEntry::new("tags", vec!["a".into(), "b".into()]),
                MetaEntry::new("color", vec!["red".into()]),
            ]
        );
    }

    #[test]
    fn unknown_items_have_no_meta_and_reject_writes() {
        let store = MemoryItemStore::new();
        assert!(!store.add_meta(ItemId(9), "key", "value"));
        assert!(store.find_item(ItemId(9)).expect("lookup").is_none());
        assert!(store.item_meta(ItemId(9)).expect("meta").is_empty());
    }

    #[test]
    fn list_items_is_ordered_by_id() {
        let store = MemoryItemStore::new();
        store.insert_item(ContentItem::new(ItemId(5), "page", "Five"));
        store.insert_item(ContentItem::new(ItemId(2), "post", "Two"));
        let ids: Vec<ItemId> = store
            .list_items()
            .expect("items")
            .into_iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(ids, vec![ItemId(2), ItemId(5)]);
    }
}
