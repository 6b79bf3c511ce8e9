// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::admin::error::AdminError;
use crate::admin::export::{EXPORT_NONCE_ACTION, export_url};
use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use crate::content::ItemId;
use crate::meta::aggregate;
use crate::security::ActorRequest;
use crate::templates::{
    DashboardContext, DashboardItem, ItemEditContext, render_minijinja_template,
};
use crate::view::{META_BOX_TITLE, MetaPanel};
use actix_web::{HttpRequest, HttpResponse, web};

pub async fn dashboard(
    req: HttpRequest,
    state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
) -> HttpResponse {
    respond(render_dashboard(&req, &state, &config), &state, &config)
}

pub async fn item_edit(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
) -> HttpResponse {
    respond(
        render_item_edit(&req, &path, &state, &config),
        &state,
        &config,
    )
}

fn respond(
    result: Result<String, AdminError>,
    state: &AppState,
    config: &ValidatedConfig,
) -> HttpResponse {
    match result {
        Ok(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
            .body(html),
        Err(err) => {
            match &err {
                AdminError::Forbidden | AdminError::PageNotFound => log::debug!("{}", err),
                _ => log::error!("Admin screen failed: {}", err),
            }
            err.render(&config.app.name, Some(state.templates.as_ref()))
        }
    }
}

fn render_dashboard(
    req: &HttpRequest,
    state: &AppState,
    config: &ValidatedConfig,
) -> Result<String, AdminError> {
    let actor = req.actor();
    let Some(actor_name) = actor.id() else {
        return Err(AdminError::Forbidden);
    };

    let items = state
        .store
        .list_items()?
        .into_iter()
        .map(|item| DashboardItem {
            id: item.id.0,
            edit_url: format!("{}/items/{}/edit", config.admin.path, item.id),
            item_type: item.item_type,
            title: item.title,
        })
        .collect();

    let context = DashboardContext::new(&config.app.name, actor_name, items);
    render_minijinja_template(
        state.templates.as_ref(),
        "admin/dashboard.html",
        context.to_value(),
    )
    .map_err(AdminError::from)
}

fn render_item_edit(
    req: &HttpRequest,
    raw_id: &str,
    state: &AppState,
    config: &ValidatedConfig,
) -> Result<String, AdminError> {
    let actor = req.actor();
    let Some(actor_id) = actor.id() else {
        return Err(AdminError::Forbidden);
    };

    let item_id = ItemId::parse_lenient(raw_id);
    let item = state
        .store
        .find_item(item_id)?
        .ok_or(AdminError::PageNotFound)?;

    let mut context = ItemEditContext::new(
        &config.app.name,
        &config.admin.path,
        item.id.0,
        &item.item_type,
        &item.title,
    );

    // The panel exists for super-admins only; everyone else sees the bare screen.
    if actor.is_super_admin() {
        let document = aggregate(state.store.as_ref(), &state.extensions, &item)?;
        let token = state.nonces.issue(actor_id, EXPORT_NONCE_ACTION);
        let url = export_url(config, item.id, &token);
        let panel = MetaPanel {
            templates: state.templates.as_ref(),
            sanitizer: &state.sanitizer,
            extensions: &state.extensions,
        };
        let html = panel.render(&document, &item, &url)?;
        context = context.with_meta_box(META_BOX_TITLE, html);
    }

    render_minijinja_template(
        state.templates.as_ref(),
        "admin/item_edit.html",
        context.to_value(),
    )
    .map_err(AdminError::from)
}
