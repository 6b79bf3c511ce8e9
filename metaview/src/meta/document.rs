// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::meta::value::{ArrayKey, DataValue};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Section name reserved for item metadata.
pub const META_SECTION: &str = "meta";

/// Aggregated data of one item: the `meta` section plus sections contributed
/// by extensions, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostDataDocument {
    sections: Vec<(String, DataValue)>,
}

impl PostDataDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document whose `meta` section holds the given sorted entries.
    pub fn with_meta(meta: Vec<(String, DataValue)>) -> Self {
        let entries = meta
            .into_iter()
            .map(|(key, value)| (ArrayKey::Name(key), value))
            .collect();
        let mut document = Self::new();
        document.set_section(META_SECTION, DataValue::Map(entries));
        document
    }

    pub fn meta(&self) -> Option<&DataValue> {
        self.section(META_SECTION)
    }

    pub fn section(&self, name: &str) -> Option<&DataValue> {
        self.sections
            .iter()
            .find(|(section, _)| section == name)
            .map(|(_, value)| value)
    }

    /// Replaces an existing section in place or appends a new one.
    pub fn set_section(&mut self, name: impl Into<String>, value: DataValue) {
        let name = name.into();
        match self.sections.iter_mut().find(|(section, _)| *section == name) {
            Some((_, existing)) => *existing = value,
            None => self.sections.push((name, value)),
        }
    }

    pub fn remove_section(&mut self, name: &str) -> Option<DataValue> {
        let position = self.sections.iter().position(|(section, _)| section == name)?;
        Some(self.sections.remove(position).1)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &DataValue)> {
        self.sections
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Serialize for PostDataDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (name, value) in &self.sections {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_meta_creates_meta_section_first() {
        let document = PostDataDocument::with_meta(vec![("color".to_string(), "red".into())]);
        let names: Vec<&str> = document.sections().map(|(name, _)| name).collect();
        assert_eq!(names, vec![META_SECTION]);
        assert_eq!(
            document.meta().and_then(|meta| meta.get("color")),
            Some(&DataValue::from("red"))
        );
    }

    #[test]
    fn set_section_replaces_in_place_and_appends_new() {
        let mut document = PostDataDocument::with_meta(Vec::new());
        document.set_section("orders", DataValue::Int(1));
        document.set_section("notes", DataValue::Int(2));
        document.set_section("orders", DataValue::Int(3));
        let sections: Vec<(&str, &DataValue)> = document.sections().collect();
        assert_eq!(
            sections,
            vec![
                (META_SECTION, &DataValue::empty_map()),
                ("orders", &DataValue::Int(3)),
                ("notes", &DataValue::Int(2)),
            ]
        );
    }

    #[test]
    fn remove_section_drops_only_that_section() {
        let mut document = PostDataDocument::with_meta(Vec::new());
        document.set_section("extra", DataValue::Null);
        assert_eq!(document.remove_section(META_SECTION), Some(DataValue::empty_map()));
        assert!(document.meta().is_none());
        assert_eq!(document.len(), 1);
    }
}
