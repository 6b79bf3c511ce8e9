// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub app: AppConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub actors: Vec<ActorConfig>,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub app: AppConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub export: ValidatedExportConfig,
    pub actors: Vec<ActorConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    4
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdminConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_items_dir")]
    pub items_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            items_dir: default_items_dir(),
        }
    }
}

fn default_items_dir() -> String {
    "items".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExportConfig {
    #[serde(default = "default_export_id_param")]
    pub id_param: String,
    #[serde(default = "default_export_token_param")]
    pub token_param: String,
    /// `+HH:MM` / `-HH:MM`; the host's local offset when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<String>,
    #[serde(default = "default_link_lifetime_seconds")]
    pub link_lifetime_seconds: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            id_param: default_export_id_param(),
            token_param: default_export_token_param(),
            utc_offset: None,
            link_lifetime_seconds: default_link_lifetime_seconds(),
        }
    }
}

fn default_export_id_param() -> String {
    "export-id".to_string()
}

fn default_export_token_param() -> String {
    "token".to_string()
}

fn default_link_lifetime_seconds() -> u64 {
    86400
}

#[derive(Debug, Clone)]
pub struct ValidatedExportConfig {
    pub id_param: String,
    pub token_param: String,
    pub utc_offset: Option<FixedOffset>,
    pub link_lifetime: Duration,
}

impl Default for ValidatedExportConfig {
    fn default() -> Self {
        Self {
            id_param: default_export_id_param(),
            token_param: default_export_token_param(),
            utc_offset: None,
            link_lifetime: Duration::from_secs(default_link_lifetime_seconds()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ActorRole {
    SuperAdmin,
    Member,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ActorConfig {
    pub name: String,
    pub token: String,
    pub role: ActorRole,
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("config.yaml");
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::parse(&config_content).map_err(|e| match e {
            ConfigError::LoadError(msg) => ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Loads and validates configuration at startup. If validation fails, the application should not start.
    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        Self::load(root)?.validate()
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        Self::validate_server(&self.server)?;
        Self::validate_admin(&self.admin)?;
        Self::validate_logging(&self.logging)?;
        Self::validate_storage(&self.storage)?;
        let export = Self::validate_export(&self.export)?;
        Self::validate_actors(&self.actors)?;

        if !self
            .actors
            .iter()
            .any(|actor| actor.role == ActorRole::SuperAdmin)
        {
            log::warn!("No super-admin actor configured; the meta panel and export stay hidden");
        }

        Ok(ValidatedConfig {
            server: self.server,
            admin: self.admin,
            app: self.app,
            logging: self.logging,
            storage: self.storage,
            export,
            actors: self.actors,
        })
    }

    fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
        if server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host cannot be empty".to_string(),
            ));
        }
        if server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_admin(admin: &AdminConfig) -> Result<(), ConfigError> {
        let path = admin.path.as_str();
        if !path.starts_with('/') || path.len() < 2 || path.ends_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "admin.path must start with '/' and must not end with '/', got: '{}'",
                path
            )));
        }
        Ok(())
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}, got: '{}'",
                LOG_LEVELS.join(", "),
                logging.level
            )));
        }
        Ok(())
    }

    fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
        if storage.items_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.items_dir cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_export(export: &ExportConfig) -> Result<ValidatedExportConfig, ConfigError> {
        for (label, name) in [
            ("export.id_param", &export.id_param),
            ("export.token_param", &export.token_param),
        ] {
            if name.is_empty()
                || !name
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
            {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be a non-empty query parameter name, got: '{}'",
                    label, name
                )));
            }
        }
        if export.id_param == export.token_param {
            return Err(ConfigError::ValidationError(
                "export.id_param and export.token_param must differ".to_string(),
            ));
        }
        if export.link_lifetime_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "export.link_lifetime_seconds must be greater than 0".to_string(),
            ));
        }

        let utc_offset = match export.utc_offset.as_deref() {
            Some(raw) => Some(parse_utc_offset(raw).ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "export.utc_offset must look like '+02:00' or '-0530', got: '{}'",
                    raw
                ))
            })?),
            None => None,
        };

        Ok(ValidatedExportConfig {
            id_param: export.id_param.clone(),
            token_param: export.token_param.clone(),
            utc_offset,
            link_lifetime: Duration::from_secs(export.link_lifetime_seconds),
        })
    }

    fn validate_actors(actors: &[ActorConfig]) -> Result<(), ConfigError> {
        let mut tokens = HashSet::new();
        let mut names = HashSet::new();
        for actor in actors {
            if actor.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "actors[].name cannot be empty".to_string(),
                ));
            }
            if actor.token.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "actor '{}' has an empty token",
                    actor.name
                )));
            }
            if !names.insert(actor.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "actor name '{}' is configured more than once",
                    actor.name
                )));
            }
            if !tokens.insert(actor.token.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "actor '{}' reuses another actor's token",
                    actor.name
                )));
            }
        }
        Ok(())
    }
}

/// Parses `Z`, `+HH`, `+HHMM` or `+HH:MM` (and the `-` forms).
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|ch| *ch != ':').collect();
    if !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl ValidatedConfig {
    pub fn actor_by_token(&self, token: &str) -> Option<&ActorConfig> {
        self.actors.iter().find(|actor| actor.token == token)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.logging.level.to_ascii_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        }
    }
}
