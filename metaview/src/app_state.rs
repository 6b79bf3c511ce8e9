// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::Arc;
use std::time::Duration;

use crate::content::MetaStore;
use crate::extensions::ExtensionRegistry;
use crate::security::NonceStore;
use crate::templates::{MiniJinjaEngine, TemplateEngine};
use crate::view::DumpSanitizer;

pub struct AppState {
    pub templates: Arc<dyn TemplateEngine>,
    pub sanitizer: DumpSanitizer,
    pub store: Arc<dyn MetaStore>,
    pub nonces: NonceStore,
    pub extensions: ExtensionRegistry,
}

impl AppState {
    pub fn new(
        store: Arc<dyn MetaStore>,
        extensions: ExtensionRegistry,
        link_lifetime: Duration,
    ) -> Self {
        Self {
            templates: Arc::new(MiniJinjaEngine::new()),
            sanitizer: DumpSanitizer::new(),
            store,
            nonces: NonceStore::new(link_lifetime),
            extensions,
        }
    }
}
