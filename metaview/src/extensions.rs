// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::content::ContentItem;
use crate::meta::PostDataDocument;
use std::sync::Arc;

/// Enriches the aggregated document of an item.
///
/// Contributors receive the document built so far and return the document to
/// pass on. They must keep the `meta` section and should add sections under
/// names unlikely to collide with other contributors.
pub trait DataContributor: Send + Sync {
    fn contribute(&self, document: PostDataDocument, item: &ContentItem) -> PostDataDocument;
}

/// Appends extra markup below the metadata rows of the inline panel.
pub trait ViewContributor: Send + Sync {
    fn render(&self, document: &PostDataDocument, item: &ContentItem, out: &mut String);
}

/// Appends extra controls next to the export button of the inline panel.
pub trait ActionContributor: Send + Sync {
    fn render(&self, document: &PostDataDocument, item: &ContentItem, out: &mut String);
}

impl<F> DataContributor for F
where
    F: Fn(PostDataDocument, &ContentItem) -> PostDataDocument + Send + Sync,
{
    fn contribute(&self, document: PostDataDocument, item: &ContentItem) -> PostDataDocument {
        self(document, item)
    }
}

impl<F> ViewContributor for F
where
    F: Fn(&PostDataDocument, &ContentItem, &mut String) + Send + Sync,
{
    fn render(&self, document: &PostDataDocument, item: &ContentItem, out: &mut String) {
        self(document, item, out)
    }
}

/// Wraps a closure as an [`ActionContributor`], keeping action closures
/// visibly distinct from view closures at registration sites.
pub struct ActionFn<F>(pub F);

impl<F> ActionContributor for ActionFn<F>
where
    F: Fn(&PostDataDocument, &ContentItem, &mut String) + Send + Sync,
{
    fn render(&self, document: &PostDataDocument, item: &ContentItem, out: &mut String) {
        (self.0)(document, item, out)
    }
}

/// Ordered set of contributors the host registers at startup.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    data: Vec<Arc<dyn DataContributor>>,
    views: Vec<Arc<dyn ViewContributor>>,
    actions: Vec<Arc<dyn ActionContributor>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_data(&mut self, contributor: impl DataContributor + 'static) -> &mut Self {
        self.data.push(Arc::new(contributor));
        self
    }

    pub fn register_view(&mut self, contributor: impl ViewContributor + 'static) -> &mut Self {
        self.views.push(Arc::new(contributor));
        self
    }

    pub fn register_action(
        &mut self,
        contributor: impl ActionContributor + 'static,
    ) -> &mut Self {
        self.actions.push(Arc::new(contributor));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.views.is_empty() && self.actions.is_empty()
    }

    /// Runs every data contributor in registration order.
    pub fn apply_data(&self, document: PostDataDocument, item: &ContentItem) -> PostDataDocument {
        self.data
            .iter()
            .fold(document, |document, contributor| {
                contributor.contribute(document, item)
            })
    }

    pub fn render_views(&self, document: &PostDataDocument, item: &ContentItem) -> String {
        let mut out = String::new();
        for contributor in &self.views {
            contributor.render(document, item, &mut out);
        }
        out
    }

    pub fn render_actions(&self, document: &PostDataDocument, item: &ContentItem) -> String {
        let mut out = String::new();
        for contributor in &self.actions {
            contributor.render(document, item, &mut out);
        }
        out
    }
}
