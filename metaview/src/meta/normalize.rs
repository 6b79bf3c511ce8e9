// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::meta::value::DataValue;
use std::cmp::Ordering;

/// Leading character marking a key as internal.
pub const INTERNAL_KEY_MARKER: char = '_';

/// A key with all stored values, as handed out by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaEntry {
    pub key: String,
    pub values: Vec<DataValue>,
}

impl MetaEntry {
    pub fn new(key: impl Into<String>, values: Vec<DataValue>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }
}

/// Presents a single stored value as the bare value; multi-valued (and empty)
/// lists stay lists.
pub fn flatten_single_value(mut values: Vec<DataValue>) -> DataValue {
    if values.len() == 1
        && let Some(value) = values.pop()
    {
        return value;
    }
    DataValue::List(values)
}

/// Compares meta keys ASCII case-insensitively, ignoring one leading marker.
pub fn compare_meta_keys(a: &str, b: &str) -> Ordering {
    let a = strip_marker(a).bytes().map(|byte| byte.to_ascii_lowercase());
    let b = strip_marker(b).bytes().map(|byte| byte.to_ascii_lowercase());
    a.cmp(b)
}

fn strip_marker(key: &str) -> &str {
    key.strip_prefix(INTERNAL_KEY_MARKER).unwrap_or(key)
}

/// Sorts in place; equal keys keep their storage order.
pub fn sort_meta_keys<T>(entries: &mut [(String, T)]) {
    entries.sort_by(|(a, _), (b, _)| compare_meta_keys(a, b));
}

/// Flattens and sorts raw storage entries.
pub fn normalize_meta(entries: Vec<MetaEntry>) -> Vec<(String, DataValue)> {
    let mut normalized: Vec<(String, DataValue)> = entries
        .into_iter()
        .map(|entry| (entry.key, flatten_single_value(entry.values)))
        .collect();
    sort_meta_keys(&mut normalized);
    normalized
}
