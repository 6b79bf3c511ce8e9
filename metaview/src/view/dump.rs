// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Type-annotated rendering of arbitrary value trees for the inline panel.
//!
//! The output is HTML: literals are escaped here, and the only tags produced
//! are `<span>` around type names and `<em>` around placeholders. Spaces in
//! literals become `&nbsp;` so they survive whitespace-collapsing layout.

use crate::meta::{ArrayKey, DataValue};

const NBSP: &str = "&nbsp;";
const INDENT_WIDTH: usize = 4;
const NOT_IMPLEMENTED: &str = "<em>(value dump not implemented)</em>";

/// Renders `value` nested at `depth`. Pure: never fails, no shared state.
pub fn dump(value: &DataValue, depth: usize) -> String {
    let (type_name, body) = match value {
        DataValue::List(_) | DataValue::Map(_) => {
            let entries = value.sequence_entries().unwrap_or_default();
            (
                format!("array/{}", entries.len()),
                format!("[{}]", dump_entries(entries, depth)),
            )
        }
        DataValue::Record { type_name, fields } => {
            let entries = fields
                .iter()
                .map(|(name, value)| (ArrayKey::Name(name.clone()), value))
                .collect();
            (
                format!("object/{}", type_name),
                format!("{{{}}}", dump_entries(entries, depth)),
            )
        }
        DataValue::Opaque { type_name } => (type_name.clone(), NOT_IMPLEMENTED.to_string()),
        scalar => (
            scalar_type_name(scalar).to_string(),
            escape_literal(&scalar_literal(scalar)),
        ),
    };
    format!("<span>{}</span> {}", escape_html(&type_name), body)
}

fn dump_entries(entries: Vec<(ArrayKey, &DataValue)>, depth: usize) -> String {
    let indent = NBSP.repeat(INDENT_WIDTH * depth);
    let lines: Vec<String> = entries
        .into_iter()
        .map(|(key, value)| {
            format!(
                "{}{} => {}",
                indent,
                dump(&key_value(key), depth + 1),
                dump(value, depth + 1)
            )
        })
        .collect();
    format!("\n{}\n", lines.join("\n"))
}

fn key_value(key: ArrayKey) -> DataValue {
    match key {
        ArrayKey::Index(index) => DataValue::Int(index),
        ArrayKey::Name(name) => DataValue::String(name),
    }
}

fn scalar_type_name(value: &DataValue) -> &'static str {
    match value {
        DataValue::Null => "NULL",
        DataValue::Bool(_) => "boolean",
        DataValue::Int(_) => "integer",
        DataValue::Float(_) => "double",
        DataValue::String(_) => "string",
        _ => "unknown type",
    }
}

/// Source-literal form of a scalar: quoted strings, `NULL`, `true`/`false`,
/// doubles always carrying a fractional part.
pub fn scalar_literal(value: &DataValue) -> String {
    match value {
        DataValue::Null => "NULL".to_string(),
        DataValue::Bool(flag) => flag.to_string(),
        DataValue::Int(int) => int.to_string(),
        DataValue::Float(float) => float_literal(*float),
        DataValue::String(text) => quote_string(text),
        _ => String::new(),
    }
}

fn float_literal(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    let literal = value.to_string();
    if literal.contains(['.', 'e', 'E']) {
        literal
    } else {
        format!("{}.0", literal)
    }
}

fn quote_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for ch in text.chars() {
        if ch == '\\' || ch == '\'' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('\'');
    quoted
}

fn escape_literal(literal: &str) -> String {
    escape_html(literal).replace(' ', NBSP)
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_show_type_and_literal() {
        assert_eq!(dump(&DataValue::Int(42), 0), "<span>integer</span> 42");
        assert_eq!(dump(&DataValue::Bool(false), 0), "<span>boolean</span> false");
        assert_eq!(dump(&DataValue::Float(1.0), 0), "<span>double</span> 1.0");
        assert_eq!(dump(&DataValue::Float(0.25), 0), "<span>double</span> 0.25");
        assert_eq!(dump(&DataValue::Null, 0), "<span>NULL</span> NULL");
    }

    #[test]
    fn string_literal_is_quoted_escaped_and_spaced() {
        assert_eq!(
            dump(&DataValue::from("a <b> c"), 0),
            "<span>string</span> &#039;a&nbsp;&lt;b&gt;&nbsp;c&#039;"
        );
        assert_eq!(
            dump(&DataValue::from(r"it's C:\"), 0),
            r"<span>string</span> &#039;it\&#039;s&nbsp;C:\\&#039;"
        );
    }

    #[test]
    fn list_entries_are_indexed() {
        let value = DataValue::List(vec!["a".into(), "b".into()]);
        assert_eq!(
            dump(&value, 0),
            "<span>array/2</span> [\n\
             <span>integer</span> 0 => <span>string</span> &#039;a&#039;\n\
             <span>integer</span> 1 => <span>string</span> &#039;b&#039;\n]"
        );
    }

    #[test]
    fn nested_entries_indent_by_depth() {
        let value = DataValue::Map(vec![(
            ArrayKey::from("outer"),
            DataValue::List(vec![DataValue::Int(1)]),
        )]);
        assert_eq!(
            dump(&value, 0),
            "<span>array/1</span> [\n\
             <span>string</span> &#039;outer&#039; => <span>array/1</span> [\n\
             &nbsp;&nbsp;&nbsp;&nbsp;<span>integer</span> 0 => <span>integer</span> 1\n]\n]"
        );
    }

    #[test]
    fn empty_sequence_keeps_blank_body() {
        assert_eq!(
            dump(&DataValue::empty_map(), 0),
            "<span>array/0</span> [\n\n]"
        );
    }

    #[test]
    fn records_show_type_identity() {
        let value = DataValue::Record {
            type_name: "OrderItem".to_string(),
            fields: vec![("qty".to_string(), DataValue::Int(2))],
        };
        assert_eq!(
            dump(&value, 1),
            "<span>object/OrderItem</span> {\n\
             &nbsp;&nbsp;&nbsp;&nbsp;<span>string</span> &#039;qty&#039; => <span>integer</span> 2\n}"
        );
    }

    #[test]
    fn opaque_values_get_placeholder() {
        let value = DataValue::Opaque {
            type_name: "resource".to_string(),
        };
        assert_eq!(
            dump(&value, 3),
            "<span>resource</span> <em>(value dump not implemented)</em>"
        );
    }

    #[test]
    fn dump_is_deterministic() {
        let value = DataValue::Map(vec![
            (ArrayKey::Index(5), DataValue::Float(f64::NAN)),
            (
                ArrayKey::from("opaque"),
                DataValue::Opaque {
                    type_name: "closure".to_string(),
                },
            ),
        ]);
        assert_eq!(dump(&value, 2), dump(&value, 2));
    }

    #[test]
    fn non_finite_doubles_have_literals() {
        assert_eq!(scalar_literal(&DataValue::Float(f64::NAN)), "NAN");
        assert_eq!(scalar_literal(&DataValue::Float(f64::NEG_INFINITY)), "-INF");
    }
}
