// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{
    ActorConfig, ActorRole, AdminConfig, AppConfig, LoggingConfig, ServerConfig, StorageConfig,
    ValidatedConfig, ValidatedExportConfig,
};
use chrono::FixedOffset;
use std::time::Duration;

pub const TEST_SUPER_ADMIN_TOKEN: &str = "super-admin-token";
pub const TEST_MEMBER_TOKEN: &str = "member-token";

#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: ValidatedConfig,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ValidatedConfig {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 5466,
                    workers: 1,
                },
                admin: AdminConfig {
                    path: "/admin".to_string(),
                },
                app: AppConfig {
                    name: "Test App".to_string(),
                },
                logging: LoggingConfig {
                    level: "info".to_string(),
                },
                storage: StorageConfig::default(),
                export: ValidatedExportConfig {
                    utc_offset: FixedOffset::east_opt(0),
                    ..ValidatedExportConfig::default()
                },
                actors: vec![
                    ActorConfig {
                        name: "root".to_string(),
                        token: TEST_SUPER_ADMIN_TOKEN.to_string(),
                        role: ActorRole::SuperAdmin,
                    },
                    ActorConfig {
                        name: "editor".to_string(),
                        token: TEST_MEMBER_TOKEN.to_string(),
                        role: ActorRole::Member,
                    },
                ],
            },
        }
    }

    pub fn with_admin_path(mut self, path: &str) -> Self {
        self.config.admin.path = path.to_string();
        self
    }

    pub fn with_export_params(mut self, id_param: &str, token_param: &str) -> Self {
        self.config.export.id_param = id_param.to_string();
        self.config.export.token_param = token_param.to_string();
        self
    }

    pub fn with_utc_offset(mut self, offset: Option<FixedOffset>) -> Self {
        self.config.export.utc_offset = offset;
        self
    }

    pub fn with_link_lifetime(mut self, lifetime: Duration) -> Self {
        self.config.export.link_lifetime = lifetime;
        self
    }

    pub fn with_actor(mut self, name: &str, token: &str, role: ActorRole) -> Self {
        self.config.actors.push(ActorConfig {
            name: name.to_string(),
            token: token.to_string(),
            role,
        });
        self
    }

    pub fn build(self) -> ValidatedConfig {
        self.config
    }
}

pub fn test_config() -> ValidatedConfig {
    TestConfigBuilder::new().build()
}
