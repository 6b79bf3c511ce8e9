// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use crate::content::ItemId;
use crate::content::flat_storage::item_path;
use crate::runtime_paths::RuntimePaths;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

const SAMPLE_ITEM_ID: ItemId = ItemId(1);

const SAMPLE_ITEM_YAML: &str = "type: post\ntitle: \"Hello world\"\nmeta:\n  _edit_lock:\n    - \"1760000000:1\"\n  _thumbnail_id: 7\n  color: red\n  tags:\n    - news\n    - release\n  gallery:\n    - [1, 2, 3]\n  settings:\n    - layout: wide\n      sidebar: false\n";

/// Seeds an example item into an empty items directory.
pub fn ensure_sample_item(runtime_paths: &RuntimePaths) -> Result<bool, BootstrapError> {
    if has_items(&runtime_paths.items_dir)? {
        return Ok(false);
    }

    let path = item_path(&runtime_paths.items_dir, SAMPLE_ITEM_ID);
    if write_new_file(&path, SAMPLE_ITEM_YAML)? {
        log_action(format!("created sample item {}", path.display()));
        return Ok(true);
    }
    Ok(false)
}

fn has_items(items_dir: &Path) -> Result<bool, BootstrapError> {
    for entry in fs::read_dir(items_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            return Ok(true);
        }
    }
    Ok(false)
}

fn write_new_file(path: &Path, contents: &str) -> Result<bool, BootstrapError> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    Ok(true)
}
