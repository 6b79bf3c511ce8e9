// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

/// Allow-list cleaner for dump output: only bare `<em>` and `<span>` survive.
pub struct DumpSanitizer {
    cleaner: ammonia::Builder<'static>,
}

impl DumpSanitizer {
    pub fn new() -> Self {
        let mut cleaner = ammonia::Builder::empty();
        cleaner.strip_comments(true).add_tags(&["em", "span"]);
        Self { cleaner }
    }

    pub fn clean(&self, html: &str) -> String {
        self.cleaner.clean(html).to_string()
    }
}

impl Default for DumpSanitizer {
    fn default() -> Self {
        Self::new()
    }
}
