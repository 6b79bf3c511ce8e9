// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::content::ContentItem;
use crate::extensions::ExtensionRegistry;
use crate::meta::PostDataDocument;
use crate::templates::{TemplateEngine, render_minijinja_template};
use crate::view::dump::dump;
use crate::view::sanitizer::DumpSanitizer;
use minijinja::context;
use serde::Serialize;

pub const META_BOX_TITLE: &str = "Post Meta View and Export (available only to superadmins)";

const CONTRIBUTOR_HINT: &str =
    "Most likely, it is caused by an incorrectly implemented data contributor.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelRow {
    pub key: String,
    pub value_html: String,
}

/// What the metadata table shows for a document.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelRows {
    /// A contributor dropped the `meta` section.
    Missing,
    /// A contributor replaced `meta` with something that is not a sequence.
    NotArray,
    Empty,
    Entries(Vec<PanelRow>),
}

impl PanelRows {
    fn state(&self) -> &'static str {
        match self {
            PanelRows::Missing => "missing",
            PanelRows::NotArray => "not_array",
            PanelRows::Empty => "empty",
            PanelRows::Entries(_) => "entries",
        }
    }
}

/// Computes the table rows; dump output is passed through the sanitizer.
pub fn panel_rows(document: &PostDataDocument, sanitizer: &DumpSanitizer) -> PanelRows {
    let Some(meta) = document.meta() else {
        return PanelRows::Missing;
    };
    let Some(entries) = meta.sequence_entries() else {
        return PanelRows::NotArray;
    };
    if entries.is_empty() {
        return PanelRows::Empty;
    }
    PanelRows::Entries(
        entries
            .into_iter()
            .map(|(key, value)| PanelRow {
                key: key.to_string(),
                value_html: sanitizer.clean(&dump(value, 0)),
            })
            .collect(),
    )
}

/// Renders the inline metadata panel of an item.
pub struct MetaPanel<'a> {
    pub templates: &'a dyn TemplateEngine,
    pub sanitizer: &'a DumpSanitizer,
    pub extensions: &'a ExtensionRegistry,
}

impl MetaPanel<'_> {
    pub fn render(
        &self,
        document: &PostDataDocument,
        item: &ContentItem,
        export_url: &str,
    ) -> Result<String, minijinja::Error> {
        let rows = panel_rows(document, self.sanitizer);
        match rows {
            PanelRows::Missing => {
                log::warn!("Item {} document has no meta section", item.id)
            }
            PanelRows::NotArray => {
                log::warn!("Item {} meta section is not a sequence", item.id)
            }
            _ => {}
        }
        let state = rows.state();
        let entries = match rows {
            PanelRows::Entries(entries) => entries,
            _ => Vec::new(),
        };

        let additional_actions = self.extensions.render_actions(document, item);
        let additional_data = self.extensions.render_views(document, item);

        render_minijinja_template(
            self.templates,
            "view/meta_panel.html",
            context! {
                export_url => export_url,
                export_label => format!("Export {}", item.item_type),
                additional_actions => additional_actions,
                state => state,
                contributor_hint => CONTRIBUTOR_HINT,
                rows => entries,
                additional_data => additional_data,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ItemId;
    use crate::extensions::ActionFn;
    use crate::meta::{ArrayKey, DataValue, META_SECTION};
    use crate::templates::MiniJinjaEngine;

    fn item() -> ContentItem {
        ContentItem::new(ItemId(42), "post", "Hello")
    }

    fn render(document: &PostDataDocument, extensions: &ExtensionRegistry) -> String {
        let engine = MiniJinjaEngine::new();
        let sanitizer = DumpSanitizer::new();
        MetaPanel {
            templates: &engine,
            sanitizer: &sanitizer,
            extensions,
        }
        .render(document, &item(), "/admin?export-id=42&token=abc")
        .expect("render panel")
    }

    #[test]
    fn rows_follow_document_order() {
        let document = PostDataDocument::with_meta(vec![
            ("_internal".to_string(), DataValue::Int(1)),
            ("color".to_string(), DataValue::from("red")),
        ]);
        let PanelRows::Entries(rows) = panel_rows(&document, &DumpSanitizer::new()) else {
            panic!("expected entries");
        };
        let keys: Vec<&str> = rows.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, vec!["_internal", "color"]);
        assert_eq!(rows[0].value_html, "<span>integer</span> 1");
    }

    #[test]
    fn degraded_states_are_detected() {
        let sanitizer = DumpSanitizer::new();
        let mut document = PostDataDocument::new();
        assert_eq!(panel_rows(&document, &sanitizer), PanelRows::Missing);

        document.set_section(META_SECTION, DataValue::from("oops"));
        assert_eq!(panel_rows(&document, &sanitizer), PanelRows::NotArray);

        document.set_section(META_SECTION, DataValue::empty_map());
        assert_eq!(panel_rows(&document, &sanitizer), PanelRows::Empty);
    }

    #[test]
    fn empty_meta_renders_single_no_data_row() {
        let html = render(&PostDataDocument::with_meta(Vec::new()), &ExtensionRegistry::new());
        assert_eq!(html.matches("No post meta data.").count(), 1);
        assert_eq!(html.matches("<td colspan=\"2\">").count(), 1);
    }

    #[test]
    fn missing_meta_renders_hint_instead_of_failing() {
        let html = render(&PostDataDocument::new(), &ExtensionRegistry::new());
        assert!(html.contains("Missing post meta data."));
        assert!(html.contains(CONTRIBUTOR_HINT));
    }

    #[test]
    fn keys_are_escaped_and_values_sanitized() {
        let document = PostDataDocument::with_meta(vec![(
            "<b>key</b>".to_string(),
            DataValue::Map(vec![(
                ArrayKey::from("x"),
                DataValue::from("<script>alert(1)</script>"),
            )]),
        )]);
        let html = render(&document, &ExtensionRegistry::new());
        assert!(html.contains("&lt;b&gt;key"));
        assert!(!html.contains("<b>key"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<span>array/1</span>"));
    }

    #[test]
    fn export_button_and_contributions_are_rendered() {
        let mut extensions = ExtensionRegistry::new();
        extensions
            .register_action(ActionFn(
                |_document: &PostDataDocument, _item: &ContentItem, out: &mut String| {
                    out.push_str(r#"<a class="button">Export XML</a>"#);
                },
            ))
            .register_view(
                |_document: &PostDataDocument, _item: &ContentItem, out: &mut String| {
                    out.push_str("<tr><td>orders</td><td>3</td></tr>");
                },
            );
        let html = render(&PostDataDocument::with_meta(Vec::new()), &extensions);
        assert!(html.contains("Export post"));
        assert!(html.contains("export-id=42&amp;token=abc"));
        assert!(html.contains(r#"<a class="button">Export XML</a>"#));

        let rows_end = html.find("No post meta data.").expect("no data row");
        let view = html.find("<tr><td>orders</td>").expect("view contribution");
        assert!(view > rows_end);
    }
}
