// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{ContentItem, ItemId, MetaStore, StoreError};
use crate::meta::{DataValue, MetaEntry};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

const ITEM_FILE_EXTENSION: &str = "yaml";

/// On-disk layout of one item: `<items_dir>/<id>.yaml`.
///
/// Every meta key maps to a list of stored values; a bare value is read as a
/// list with one element.
#[derive(Debug, Deserialize)]
struct ItemFile {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    meta: serde_yaml::Mapping,
}

/// Flat-file item store reading one YAML document per item.
#[derive(Debug, Clone)]
pub struct YamlItemStore {
    items_dir: PathBuf,
}

impl YamlItemStore {
    pub fn new(items_dir: PathBuf) -> Self {
        Self { items_dir }
    }

    pub fn items_dir(&self) -> &Path {
        &self.items_dir
    }

    pub fn item_path(&self, id: ItemId) -> PathBuf {
        item_path(&self.items_dir, id)
    }

    fn load(&self, id: ItemId) -> Result<Option<ItemFile>, StoreError> {
        read_yaml_file(&self.item_path(id), "item")
    }
}

pub fn item_path(items_dir: &Path, id: ItemId) -> PathBuf {
    items_dir.join(format!("{}.{}", id.0, ITEM_FILE_EXTENSION))
}

/// Reads and decodes a YAML file; missing or blank files yield `None`.
pub(crate) fn read_yaml_file<T: DeserializeOwned>(
    path: &Path,
    label: &str,
) -> Result<Option<T>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    let decoded = serde_yaml::from_str(&content).map_err(|err| {
        StoreError::Parse(format!(
            "Failed to parse {} file '{}': {}",
            label,
            path.display(),
            err
        ))
    })?;
    Ok(Some(decoded))
}

fn meta_entries(meta: serde_yaml::Mapping) -> Result<Vec<MetaEntry>, StoreError> {
    let mut entries = Vec::with_capacity(meta.len());
    for (key, value) in meta {
        let key = match key {
            serde_yaml::Value::String(key) => key,
            serde_yaml::Value::Number(number) => number.to_string(),
            other => {
                return Err(StoreError::Invalid(format!(
                    "meta key must be a string, got {:?}",
                    other
                )));
            }
        };
        let values = match value {
            serde_yaml::Value::Sequence(values) => {
                values.into_iter().map(DataValue::from).collect()
            }
            single => vec![DataValue::from(single)],
        };
        entries.push(MetaEntry::new(key, values));
    }
    Ok(entries)
}

fn parse_item_file_name(path: &Path) -> Option<ItemId> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(ITEM_FILE_EXTENSION) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() || !stem.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok().map(ItemId)
}

impl MetaStore for YamlItemStore {
    fn find_item(&self, id: ItemId) -> Result<Option<ContentItem>, StoreError> {
        Ok(self
            .load(id)?
            .map(|file| ContentItem::new(id, file.item_type, file.title)))
    }

    fn item_meta(&self, id: ItemId) -> Result<Vec<MetaEntry>, StoreError> {
        match self.load(id)? {
            Some(file) => meta_entries(file.meta),
            None => Ok(Vec::new()),
        }
    }

    fn list_items(&self) -> Result<Vec<ContentItem>, StoreError> {
        if !self.items_dir.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.items_dir)? {
            let path = entry?.path();
            match parse_item_file_name(&path) {
                Some(id) => ids.push(id),
                None => log::debug!("Skipping non-item file {}", path.display()),
            }
        }
        ids.sort();

        let mut items = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(item) = self.find_item(id)? {
                items.push(item);
            }
        }
        Ok(items)
    }
}
