// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use minijinja::{Value, context};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct FatalPageContext {
    app_name: String,
    title: String,
    message: String,
}

impl FatalPageContext {
    pub fn new(app_name: &str, title: &str, message: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        context! {
            app_name => &self.app_name,
            title => &self.title,
            message => &self.message
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardItem {
    pub id: u64,
    pub item_type: String,
    pub title: String,
    pub edit_url: String,
}

#[derive(Debug, Clone)]
pub struct DashboardContext {
    app_name: String,
    actor_name: String,
    items: Vec<DashboardItem>,
}

impl DashboardContext {
    pub fn new(app_name: &str, actor_name: &str, items: Vec<DashboardItem>) -> Self {
        Self {
            app_name: app_name.to_string(),
            actor_name: actor_name.to_string(),
            items,
        }
    }

    pub fn to_value(&self) -> Value {
        context! {
            app_name => &self.app_name,
            actor_name => &self.actor_name,
            items => &self.items
        }
    }
}

#[derive(Debug, Clone)]
pub struct ItemEditContext {
    app_name: String,
    admin_path: String,
    item_id: u64,
    item_type: String,
    item_title: String,
    meta_box_title: String,
    meta_box: Option<String>,
}

impl ItemEditContext {
    pub fn new(
        app_name: &str,
        admin_path: &str,
        item_id: u64,
        item_type: &str,
        item_title: &str,
    ) -> Self {
        Self {
            app_name: app_name.to_string(),
            admin_path: admin_path.to_string(),
            item_id,
            item_type: item_type.to_string(),
            item_title: item_title.to_string(),
            meta_box_title: String::new(),
            meta_box: None,
        }
    }

    /// Attaches a rendered meta box below the item fields.
    pub fn with_meta_box(mut self, title: &str, html: String) -> Self {
        self.meta_box_title = title.to_string();
        self.meta_box = Some(html);
        self
    }

    pub fn to_value(&self) -> Value {
        context! {
            app_name => &self.app_name,
            admin_path => &self.admin_path,
            item_id => self.item_id,
            item_type => &self.item_type,
            item_title => &self.item_title,
            meta_box_title => &self.meta_box_title,
            meta_box => &self.meta_box
        }
    }
}
