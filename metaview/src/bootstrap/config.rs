// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use uuid::Uuid;

const DEFAULT_PORT: u16 = 7080;
const DEFAULT_WORKERS: u16 = 4;

/// Writes a default `config.yaml` with a freshly generated super-admin token.
/// Returns `false` when a config already exists.
pub fn ensure_config(root: &Path) -> Result<bool, BootstrapError> {
    let config_path = root.join("config.yaml");

    if config_path.exists() {
        return Ok(false);
    }

    let token = Uuid::new_v4().simple().to_string();
    let contents = default_config_yaml(&token);

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    log_action(format!(
        "created config.yaml (http {}); super-admin token is in actors[0].token",
        DEFAULT_PORT
    ));

    Ok(true)
}

fn default_config_yaml(super_admin_token: &str) -> String {
    format!(
        "server:\n  host: \"127.0.0.1\"\n  port: {port}\n  workers: {workers}\n\nadmin:\n  path: \"/admin\"\n\napp:\n  name: \"Metaview\"\n\nlogging:\n  level: \"info\"\n\nstorage:\n  items_dir: \"items\"\n\nexport:\n  id_param: \"export-id\"\n  token_param: \"token\"\n  link_lifetime_seconds: 86400\n\nactors:\n  - name: \"admin\"\n    token: \"{token}\"\n    role: \"super-admin\"\n",
        port = DEFAULT_PORT,
        workers = DEFAULT_WORKERS,
        token = super_admin_token,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn default_config_is_valid() {
        let yaml = default_config_yaml("secret");
        assert!(yaml.contains("port: 7080"));
        let config = Config::parse(&yaml)
            .expect("parse")
            .validate()
            .expect("valid");
        assert_eq!(config.actor_by_token("secret").map(|a| a.name.as_str()), Some("admin"));
    }
}
