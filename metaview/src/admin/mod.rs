// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod error;
mod export;
mod handlers;
mod init;

pub use error::{ACCESS_DENIED_MESSAGE, AdminError, EXPORT_LINK_EXPIRED_MESSAGE};
pub use export::{EXPORT_NONCE_ACTION, export_timestamp, export_url, handle_export};
pub use init::AdminInit;

use crate::config::ValidatedConfig;
use crate::security::ActorMiddleware;
use actix_web::web;
use std::sync::Arc;

/// Mounts the admin screens under the configured admin path.
pub fn configure(cfg: &mut web::ServiceConfig, config: &Arc<ValidatedConfig>) {
    cfg.service(
        web::scope(&config.admin.path)
            .wrap(AdminInit::new(config.clone()))
            .wrap(ActorMiddleware::new(config.clone()))
            .route("", web::get().to(handlers::dashboard))
            .route("/items/{id}/edit", web::get().to(handlers::item_edit)),
    );
}
