// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, web};
use metaview::admin::{self, EXPORT_NONCE_ACTION};
use metaview::app_state::AppState;
use metaview::config::ValidatedConfig;
use metaview::content::YamlItemStore;
use metaview::extensions::ExtensionRegistry;
use metaview::util::test_config::{TEST_MEMBER_TOKEN, TEST_SUPER_ADMIN_TOKEN, test_config};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const SUPER_ADMIN_NAME: &str = "root";

/// Item 42: a post with single and multi-valued meta.
pub const POST_ITEM_YAML: &str = "type: post\ntitle: \"Hello <world>\"\nmeta:\n  tags:\n    - a\n    - b\n  color:\n    - red\n  Zebra: stripes\n  _internal: \"1\"\n  apple: 3\n";

/// Item 7: a page without any meta.
pub const EMPTY_ITEM_YAML: &str = "type: page\ntitle: \"Empty\"\n";

pub struct TestHarness {
    pub items_dir: TempDir,
    pub config: Arc<ValidatedConfig>,
    pub app_state: Arc<AppState>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_extensions(ExtensionRegistry::new())
    }

    pub fn with_extensions(extensions: ExtensionRegistry) -> Self {
        Self::with_config(test_config(), extensions)
    }

    pub fn with_config(config: ValidatedConfig, extensions: ExtensionRegistry) -> Self {
        let items_dir = tempfile::Builder::new()
            .prefix("metaview-items")
            .tempdir()
            .expect("items dir");
        fs::write(items_dir.path().join("42.yaml"), POST_ITEM_YAML).expect("item 42");
        fs::write(items_dir.path().join("7.yaml"), EMPTY_ITEM_YAML).expect("item 7");

        let store = Arc::new(YamlItemStore::new(items_dir.path().to_path_buf()));
        let app_state = Arc::new(AppState::new(
            store,
            extensions,
            Duration::from_secs(3600),
        ));

        Self {
            items_dir,
            config: Arc::new(config),
            app_state,
        }
    }

    pub fn export_token(&self) -> String {
        self.app_state
            .nonces
            .issue(SUPER_ADMIN_NAME, EXPORT_NONCE_ACTION)
    }

    pub fn export_uri(&self, raw_id: &str, token: &str) -> String {
        format!(
            "{}?{}={}&{}={}",
            self.config.admin.path,
            self.config.export.id_param,
            raw_id,
            self.config.export.token_param,
            token
        )
    }
}

pub fn build_test_app(
    harness: &TestHarness,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody + use<>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let config_for_app = harness.config.clone();
    let config_for_admin = harness.config.clone();

    App::new()
        .app_data(web::Data::from(config_for_app))
        .app_data(web::Data::from(harness.app_state.clone()))
        .configure(move |cfg| admin::configure(cfg, &config_for_admin))
}

pub fn as_super_admin(req: actix_web::test::TestRequest) -> actix_web::test::TestRequest {
    req.insert_header((AUTHORIZATION, format!("Bearer {}", TEST_SUPER_ADMIN_TOKEN)))
}

pub fn as_member(req: actix_web::test::TestRequest) -> actix_web::test::TestRequest {
    req.insert_header((AUTHORIZATION, format!("Bearer {}", TEST_MEMBER_TOKEN)))
}

pub fn header<B>(resp: &ServiceResponse<B>, name: &str) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
