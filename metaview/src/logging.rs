// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use env_logger::Logger;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

/// `(target prefix, from, to)`: records of `target` logged at `from` are re-emitted at `to`.
pub type LevelRule = (String, Level, Level);

/// ammonia pulls in html5ever, whose debug output drowns ours.
pub fn default_level_rules() -> Vec<LevelRule> {
    vec![("html5ever".to_string(), Level::Debug, Level::Trace)]
}

struct LevelRewritingLogger {
    inner: Logger,
    rules: Vec<LevelRule>,
}

impl LevelRewritingLogger {
    fn rewritten_level(&self, target: &str, original: Level) -> Level {
        self.rules
            .iter()
            .find(|(prefix, from, _)| target.starts_with(prefix.as_str()) && *from == original)
            .map(|(_, _, to)| *to)
            .unwrap_or(original)
    }
}

impl Log for LevelRewritingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let rewritten = Metadata::builder()
            .level(self.rewritten_level(metadata.target(), metadata.level()))
            .target(metadata.target())
            .build();
        self.inner.enabled(&rewritten)
    }

    fn log(&self, record: &Record) {
        let level = self.rewritten_level(record.target(), record.level());
        let rewritten = Record::builder()
            .level(level)
            .target(record.target())
            .args(*record.args())
            .module_path(record.module_path())
            .file(record.file())
            .line(record.line())
            .build();
        if self.inner.enabled(rewritten.metadata()) {
            self.inner.log(&rewritten);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// `env_logger` with the server line format: `<UTC time> [LEVEL] target: message`.
pub fn build_logger(level: LevelFilter) -> Logger {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .build()
}

/// Installs the process-wide logger.
pub fn init_logging(level: LevelFilter, rules: Vec<LevelRule>) -> Result<(), SetLoggerError> {
    let logger = LevelRewritingLogger {
        inner: build_logger(level),
        rules,
    };
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}
