// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// Index of an entry inside an associative sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Index(i64),
    Name(String),
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Index(index) => write!(f, "{}", index),
            ArrayKey::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for ArrayKey {
    fn from(name: &str) -> Self {
        ArrayKey::Name(name.to_string())
    }
}

impl From<String> for ArrayKey {
    fn from(name: String) -> Self {
        ArrayKey::Name(name)
    }
}

impl From<i64> for ArrayKey {
    fn from(index: i64) -> Self {
        ArrayKey::Index(index)
    }
}

/// Dynamically typed value tree carried by item metadata and extension sections.
///
/// `List` and `Map` are both sequences: `List` has implicit sequential indices,
/// `Map` keeps explicit (possibly associative) keys in insertion order.
/// `Opaque` stands for anything an extension contributes that cannot be
/// introspected; it renders as a placeholder and refuses JSON export.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<DataValue>),
    Map(Vec<(ArrayKey, DataValue)>),
    Record {
        type_name: String,
        fields: Vec<(String, DataValue)>,
    },
    Opaque {
        type_name: String,
    },
}

impl DataValue {
    pub fn string(value: impl Into<String>) -> Self {
        DataValue::String(value.into())
    }

    pub fn empty_map() -> Self {
        DataValue::Map(Vec::new())
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            DataValue::Null
                | DataValue::Bool(_)
                | DataValue::Int(_)
                | DataValue::Float(_)
                | DataValue::String(_)
        )
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, DataValue::List(_) | DataValue::Map(_))
    }

    /// Number of entries for sequences, `None` otherwise.
    pub fn sequence_len(&self) -> Option<usize> {
        match self {
            DataValue::List(items) => Some(items.len()),
            DataValue::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Entries of a sequence with their keys; lists get sequential indices.
    pub fn sequence_entries(&self) -> Option<Vec<(ArrayKey, &DataValue)>> {
        match self {
            DataValue::List(items) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, value)| (ArrayKey::Index(index as i64), value))
                    .collect(),
            ),
            DataValue::Map(entries) => Some(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Looks up a string-keyed entry of a `Map`.
    pub fn get(&self, name: &str) -> Option<&DataValue> {
        match self {
            DataValue::Map(entries) => entries.iter().find_map(|(key, value)| match key {
                ArrayKey::Name(key) if key == name => Some(value),
                _ => None,
            }),
            _ => None,
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Int(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Float(value)
    }
}

impl From<serde_json::Value> for DataValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => DataValue::Null,
            serde_json::Value::Bool(flag) => DataValue::Bool(flag),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(int) => DataValue::Int(int),
                None => DataValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(text) => DataValue::String(text),
            serde_json::Value::Array(items) => {
                DataValue::List(items.into_iter().map(DataValue::from).collect())
            }
            serde_json::Value::Object(fields) => DataValue::Map(
                fields
                    .into_iter()
                    .map(|(key, value)| (ArrayKey::Name(key), DataValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_yaml::Value> for DataValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => DataValue::Null,
            serde_yaml::Value::Bool(flag) => DataValue::Bool(flag),
            serde_yaml::Value::Number(number) => match number.as_i64() {
                Some(int) => DataValue::Int(int),
                None => DataValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(text) => DataValue::String(text),
            serde_yaml::Value::Sequence(items) => {
                DataValue::List(items.into_iter().map(DataValue::from).collect())
            }
            serde_yaml::Value::Mapping(mapping) => DataValue::Map(
                mapping
                    .into_iter()
                    .map(|(key, value)| (yaml_key(key), DataValue::from(value)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => DataValue::Opaque {
                type_name: tagged.tag.to_string(),
            },
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> ArrayKey {
    match key {
        serde_yaml::Value::Number(number) => match number.as_i64() {
            Some(index) => ArrayKey::Index(index),
            None => ArrayKey::Name(number.to_string()),
        },
        serde_yaml::Value::String(text) => ArrayKey::Name(text),
        serde_yaml::Value::Bool(flag) => ArrayKey::Index(i64::from(flag)),
        serde_yaml::Value::Null => ArrayKey::Name(String::new()),
        other => ArrayKey::Name(
            serde_yaml::to_string(&other)
                .map(|text| text.trim_end().to_string())
                .unwrap_or_default(),
        ),
    }
}

impl Serialize for ArrayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ArrayKey::Index(index) => serializer.collect_str(index),
            ArrayKey::Name(name) => serializer.serialize_str(name),
        }
    }
}

impl Serialize for DataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DataValue::Null => serializer.serialize_unit(),
            DataValue::Bool(flag) => serializer.serialize_bool(*flag),
            DataValue::Int(int) => serializer.serialize_i64(*int),
            DataValue::Float(float) => {
                if !float.is_finite() {
                    return Err(S::Error::custom(format!(
                        "non-finite number {} cannot be encoded",
                        float
                    )));
                }
                serializer.serialize_f64(*float)
            }
            DataValue::String(text) => serializer.serialize_str(text),
            DataValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DataValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            DataValue::Record { fields, .. } => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            DataValue::Opaque { type_name } => Err(S::Error::custom(format!(
                "value of type {} cannot be encoded",
                type_name
            ))),
        }
    }
}
