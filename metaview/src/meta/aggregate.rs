// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::content::{ContentItem, MetaStore, StoreError};
use crate::extensions::ExtensionRegistry;
use crate::meta::{PostDataDocument, normalize_meta};

/// Builds the document of an already resolved item.
///
/// Storage failures are the only errors; whatever the data contributors
/// return is passed on unvalidated.
pub fn aggregate(
    store: &dyn MetaStore,
    extensions: &ExtensionRegistry,
    item: &ContentItem,
) -> Result<PostDataDocument, StoreError> {
    let entries = store.item_meta(item.id)?;
    let count = entries.len();
    let document = PostDataDocument::with_meta(normalize_meta(entries));
    log::debug!(
        "Aggregated {} meta keys for {} {}",
        count,
        item.item_type,
        item.id
    );
    Ok(extensions.apply_data(document, item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ItemId, MemoryItemStore};
    use crate::meta::{ArrayKey, DataValue, META_SECTION};
    use serde_json::json;

    fn store_with_item() -> (MemoryItemStore, ContentItem) {
        let store = MemoryItemStore::new();
        let item = ContentItem::new(ItemId(42), "post", "Hello");
        store.insert_item(item.clone());
        (store, item)
    }

    #[test]
    fn empty_meta_yields_empty_meta_section() {
        let (store, item) = store_with_item();
        let document = aggregate(&store, &ExtensionRegistry::new(), &item).expect("aggregate");
        assert_eq!(
            serde_json::to_value(&document).expect("encode"),
            json!({"meta": {}})
        );
    }

    #[test]
    fn single_values_flatten_and_lists_survive() {
        let (store, item) = store_with_item();
        store.add_meta(item.id, "tags", "a");
        store.add_meta(item.id, "color", "red");
        store.add_meta(item.id, "tags", "b");

        let document = aggregate(&store, &ExtensionRegistry::new(), &item).expect("aggregate");
        assert_eq!(
            serde_json::to_value(&document).expect("encode"),
            json!({"meta": {"color": "red", "tags": ["a", "b"]}})
        );
    }

    #[test]
    fn meta_keys_follow_sort_rule() {
        let (store, item) = store_with_item();
        for key in ["Zebra", "_internal", "apple"] {
            store.add_meta(item.id, key, "x");
        }
        let document = aggregate(&store, &ExtensionRegistry::new(), &item).expect("aggregate");
        let keys: Vec<ArrayKey> = document
            .meta()
            .and_then(|meta| meta.sequence_entries())
            .expect("meta entries")
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(
            keys,
            vec![
                ArrayKey::from("apple"),
                ArrayKey::from("_internal"),
                ArrayKey::from("Zebra")
            ]
        );
    }

    #[test]
    fn contributors_add_sections_after_meta() {
        let (store, item) = store_with_item();
        let mut extensions = ExtensionRegistry::new();
        extensions.register_data(|mut document: PostDataDocument, item: &ContentItem| {
            document.set_section("acme-orders", DataValue::List(vec![item.id.0.to_string().into()]));
            document
        });

        let document = aggregate(&store, &extensions, &item).expect("aggregate");
        let names: Vec<&str> = document.sections().map(|(name, _)| name).collect();
        assert_eq!(names, vec![META_SECTION, "acme-orders"]);
    }

    #[test]
    fn contributors_may_break_meta_without_failing() {
        let (store, item) = store_with_item();
        let mut extensions = ExtensionRegistry::new();
        extensions.register_data(|mut document: PostDataDocument, _item: &ContentItem| {
            document.remove_section(META_SECTION);
            document
        });

        let document = aggregate(&store, &extensions, &item).expect("aggregate");
        assert!(document.meta().is_none());
    }
}
