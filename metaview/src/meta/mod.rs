// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod aggregate;
mod document;
mod normalize;
mod value;

pub use aggregate::aggregate;
pub use document::{META_SECTION, PostDataDocument};
pub use normalize::{
    INTERNAL_KEY_MARKER, MetaEntry, compare_meta_keys, flatten_single_value, normalize_meta,
    sort_meta_keys,
};
pub use value::{ArrayKey, DataValue};
