// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod flat_storage;
pub mod memory;

use crate::meta::MetaEntry;
use std::fmt;

pub use flat_storage::YamlItemStore;
pub use memory::MemoryItemStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Reads an id the way request parameters are read: skip leading
    /// whitespace, take the leading digits, and fall back to `0` (which never
    /// resolves to an item) when there are none.
    pub fn parse_lenient(raw: &str) -> Self {
        let digits: String = raw
            .trim_start()
            .trim_start_matches('+')
            .chars()
            .take_while(|ch| ch.is_ascii_digit())
            .collect();
        ItemId(digits.parse().unwrap_or(0))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a stored item, as needed by the panel and export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: ItemId,
    pub item_type: String,
    pub title: String,
}

impl ContentItem {
    pub fn new(id: ItemId, item_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            item_type: item_type.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Parse(String),
    Invalid(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "item store I/O failed: {}", err),
            StoreError::Parse(msg) => write!(f, "item store parse failed: {}", msg),
            StoreError::Invalid(msg) => write!(f, "item store data invalid: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

/// Storage collaborator: resolves items and hands out their raw metadata.
pub trait MetaStore: Send + Sync {
    fn find_item(&self, id: ItemId) -> Result<Option<ContentItem>, StoreError>;

    /// All key/value-list associations of the item, in storage order.
    fn item_meta(&self, id: ItemId) -> Result<Vec<MetaEntry>, StoreError>;

    fn list_items(&self) -> Result<Vec<ContentItem>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lenient_reads_leading_digits() {
        assert_eq!(ItemId::parse_lenient("42"), ItemId(42));
        assert_eq!(ItemId::parse_lenient("  42abc"), ItemId(42));
        assert_eq!(ItemId::parse_lenient("+7"), ItemId(7));
    }

    #[test]
    fn parse_lenient_falls_back_to_zero() {
        assert_eq!(ItemId::parse_lenient(""), ItemId(0));
        assert_eq!(ItemId::parse_lenient("abc"), ItemId(0));
        assert_eq!(ItemId::parse_lenient("-5"), ItemId(0));
        assert_eq!(ItemId::parse_lenient("99999999999999999999999"), ItemId(0));
    }
}
